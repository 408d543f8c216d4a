//! A spectral Bloom filter: small saturating counters in place of bits, so the filter can
//! estimate how many times a word was inserted as well as whether it was.
//!
//! Counters are raised with the Minimum Increment rule from Cohen & Matias,
//! "Spectral Bloom Filters" (SIGMOD '03): only the counters currently holding the word's
//! minimum are incremented. This keeps estimates tight without ever underestimating.

use crate::error::{Error, Result};
use crate::hash32::{Hash32, Murmur3};
use crate::index_generator::IndexGenerator;
use crate::params::FilterParams;
use tracing::debug;

/// Counter width used when none is given. Counters saturate at 15.
pub const DEFAULT_COUNTER_BITS: u32 = 4;

/// Widest counter accepted. Counters saturate at 1023.
pub const MAX_COUNTER_BITS: u32 = 10;

#[derive(Debug, Clone)]
pub struct SpectralFilter<H = Murmur3> {
    counters: Vec<u16>,
    max_count: u16,
    generator: IndexGenerator<H>,
}

impl SpectralFilter<Murmur3> {
    /// `m` counters of [`DEFAULT_COUNTER_BITS`] bits, `k` MurmurHash3 indices per word.
    ///
    /// # Examples
    /// ```
    /// use seeded_bloom::SpectralFilter;
    /// let mut filter = SpectralFilter::new(200, 3).unwrap();
    /// filter.insert("dogs");
    /// filter.insert("dogs");
    /// assert_eq!(filter.estimate("dogs"), 2);
    /// assert_eq!(filter.estimate("cats"), 0);
    /// ```
    pub fn new(m: usize, k: usize) -> Result<Self> {
        Self::with_counter_bits(FilterParams::new(m, k)?, DEFAULT_COUNTER_BITS)
    }

    pub fn with_counter_bits(params: FilterParams, counter_bits: u32) -> Result<Self> {
        let generator = IndexGenerator::with_hasher(params.k(), params.m(), Murmur3)?;
        Self::with_generator(generator, counter_bits)
    }
}

impl<H: Hash32> SpectralFilter<H> {
    /// # Errors
    /// `InvalidArgument` unless `1 <= counter_bits <= MAX_COUNTER_BITS`.
    pub fn with_generator(generator: IndexGenerator<H>, counter_bits: u32) -> Result<Self> {
        if !(1..=MAX_COUNTER_BITS).contains(&counter_bits) {
            return Err(Error::invalid(
                "counter_bits",
                format!("{} is not between 1 and {}", counter_bits, MAX_COUNTER_BITS),
            ));
        }
        let max_count = (1u16 << counter_bits) - 1;
        debug!(
            m = generator.m(),
            k = generator.k(),
            counter_bits,
            "created spectral filter"
        );
        Ok(SpectralFilter {
            counters: vec![0; generator.m()],
            max_count,
            generator,
        })
    }

    pub fn num_counters(&self) -> usize {
        self.counters.len()
    }

    pub fn k(&self) -> usize {
        self.generator.k()
    }

    /// The value at which counters stop counting.
    pub fn max_count(&self) -> u32 {
        u32::from(self.max_count)
    }

    pub fn counters(&self) -> &[u16] {
        &self.counters
    }

    /// Records one more occurrence of `word`.
    ///
    /// Only the counters equal to the current minimum over the word's indices are raised,
    /// and an index that appears twice in the word's index set is raised once.
    pub fn insert(&mut self, word: impl AsRef<[u8]>) {
        let indices = self.generator.generate(word);
        let min = match indices.iter().map(|i| self.counters[*i]).min() {
            Some(min) => min,
            None => return,
        };
        if min == self.max_count {
            return;
        }
        for i in indices {
            if self.counters[i] == min {
                self.counters[i] = min + 1;
            }
        }
    }

    /// Upper bound on how many times `word` was inserted, capped at [`Self::max_count`].
    ///
    /// Never less than the true count (up to the cap). Zero means the word was never inserted.
    pub fn estimate(&self, word: impl AsRef<[u8]>) -> u32 {
        self.generator
            .indices(word.as_ref())
            .map(|i| u32::from(self.counters[i]))
            .min()
            .unwrap_or(0)
    }

    /// True if `word` may have been inserted at least once.
    pub fn contains(&self, word: impl AsRef<[u8]>) -> bool {
        self.generator
            .indices(word.as_ref())
            .all(|i| self.counters[i] > 0)
    }

    pub fn clear(&mut self) {
        debug!(m = self.num_counters(), "clearing spectral filter");
        self.counters.iter_mut().for_each(|c| *c = 0);
    }
}
