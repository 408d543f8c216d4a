use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seeded_bloom::{generate_indices, MembershipSet};
use tracing::Level;

#[derive(Parser)]
#[command(name = "seeded-bloom", about = "Seeded hash indices and membership checks for words")]
struct Cli {
    /// Log construction details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the k indices in [0, m) for each word
    Indices {
        #[arg(long, default_value_t = 3)]
        k: usize,
        #[arg(long, default_value_t = 20)]
        m: usize,
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Add words to a fresh membership set, then query others against it
    Query {
        #[arg(long, default_value_t = 3)]
        k: usize,
        #[arg(long, default_value_t = 20)]
        m: usize,
        /// Words to add before querying
        #[arg(long, value_delimiter = ',')]
        add: Vec<String>,
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Cmd::Indices { k, m, words } => {
            for word in &words {
                let indices = generate_indices(word, k, m)
                    .with_context(|| format!("hashing {:?}", word))?;
                let joined: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                println!("{}: {}", word, joined.join(","));
            }
        }
        Cmd::Query { k, m, add, words } => {
            let mut set = MembershipSet::new(m, k).context("creating membership set")?;
            add.iter().for_each(|w| set.add(w));
            for word in &words {
                println!("{}: {}", word, set.contains(word));
            }
        }
    }
    Ok(())
}
