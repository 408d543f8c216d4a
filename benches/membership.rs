use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seeded_bloom::{generate_indices, AtomicMembershipSet, MembershipSet};

fn words() -> Vec<String> {
    (0..1000).map(|n| n.to_string()).collect()
}

fn indices(c: &mut Criterion) {
    for k in [1usize, 4, 7] {
        c.bench_function(&format!("generate_indices k{}", k), |b| {
            b.iter(|| generate_indices(black_box("hello"), k, 9586))
        });
    }
}

fn insert(c: &mut Criterion) {
    let words = words();
    c.bench_function("optimal insert 1000", |b| {
        b.iter(|| {
            let mut set = MembershipSet::optimal(1000, 0.001).unwrap();
            words.iter().for_each(|w| set.add(w));
        })
    });
    c.bench_function("atomic optimal insert 1000", |b| {
        b.iter(|| {
            let set = AtomicMembershipSet::optimal(1000, 0.001).unwrap();
            words.iter().for_each(|w| set.add(w));
        })
    });
}

fn get(c: &mut Criterion) {
    let words = words();
    for k in [1usize, 4, 7] {
        let mut set = MembershipSet::new(20_000, k).unwrap();
        words.iter().for_each(|w| set.add(w));
        c.bench_function(&format!("k{} get 1000", k), |b| {
            b.iter(|| words.iter().filter(|w| set.contains(w)).count())
        });
    }
}

criterion_group!(benches, indices, insert, get);
criterion_main!(benches);
