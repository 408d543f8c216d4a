use crate::error::Result;
use crate::hash32::{Hash32, Murmur3};
use crate::index_generator::IndexGenerator;
use crate::params::FilterParams;
use std::fmt::Debug;
use std::fmt::Error;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tracing::debug;

const WORD_BITS: usize = 64;

/// A variant of [`MembershipSet`](crate::MembershipSet) with the add method taking `&self`,
/// so it can be shared between threads (e.g. behind an `Arc`) without a lock.
///
/// # Notes
/// This is thread safe because:
/// 1. The bits live in a fixed number of `AtomicU64` words that are never reallocated.
/// 2. Setting a bit is a single `fetch_or`, so two threads setting bits in the same word
/// cannot clobber each other.
/// 3. The index generator is immutable, and produces the same indices on every call.
///
/// # Warning
/// A `contains` racing with the `add` of the same word may observe only some of that word's
/// bits and return false. Once `add` has returned and the querying thread has synchronized
/// with the adding one (a join, a channel receive, ...), `contains` always returns true.
pub struct AtomicMembershipSet<H = Murmur3> {
    words: Box<[AtomicU64]>,
    generator: IndexGenerator<H>,
}

impl<H> Debug for AtomicMembershipSet<H> {
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), Error> {
        let mut s = String::with_capacity(self.num_bits());
        (0..self.num_bits())
            .map(|i| self.bit(i))
            .for_each(|b| if b { s.push('1') } else { s.push('0') });
        write!(f, "bits: [{}]", s)
    }
}

impl AtomicMembershipSet<Murmur3> {
    /// Creates an empty set of `m` bits that hashes every word `k` times with MurmurHash3.
    ///
    /// # Examples
    /// ```
    /// use seeded_bloom::AtomicMembershipSet;
    /// use std::sync::Arc;
    /// let set = Arc::new(AtomicMembershipSet::new(1000, 4).unwrap());
    /// let writer = Arc::clone(&set);
    /// std::thread::spawn(move || writer.add("hello")).join().unwrap();
    /// assert!(set.contains("hello"));
    /// ```
    pub fn new(m: usize, k: usize) -> Result<Self> {
        Self::from_params(FilterParams::new(m, k)?)
    }

    pub fn from_params(params: FilterParams) -> Result<Self> {
        Self::with_hasher(params, Murmur3)
    }

    /// Sized for `n` words at a false positive rate of `p`.
    pub fn optimal(n: usize, p: f64) -> Result<Self> {
        Self::from_params(FilterParams::optimal(n, p)?)
    }
}

impl<H> AtomicMembershipSet<H> {
    /// Gets the number of bits (`m`) in the set.
    pub fn num_bits(&self) -> usize {
        self.generator.m()
    }

    /// Gets the number of indices (`k`) derived for each word.
    pub fn k(&self) -> usize {
        self.generator.k()
    }

    pub fn params(&self) -> FilterParams {
        self.generator.params()
    }

    #[inline]
    fn bit(&self, i: usize) -> bool {
        let mask = 1u64 << (i % WORD_BITS);
        self.words[i / WORD_BITS].load(Ordering::Acquire) & mask != 0
    }

    #[inline]
    fn set_bit(&self, i: usize) {
        let mask = 1u64 << (i % WORD_BITS);
        self.words[i / WORD_BITS].fetch_or(mask, Ordering::Release);
    }
}

impl<H: Hash32> AtomicMembershipSet<H> {
    pub fn with_hasher(params: FilterParams, hasher: H) -> Result<Self> {
        Ok(Self::with_generator(IndexGenerator::with_hasher(
            params.k(),
            params.m(),
            hasher,
        )?))
    }

    pub fn with_generator(generator: IndexGenerator<H>) -> Self {
        debug!(
            m = generator.m(),
            k = generator.k(),
            reduction = ?generator.reduction(),
            "created atomic membership set"
        );
        let len = (generator.m() + WORD_BITS - 1) / WORD_BITS;
        AtomicMembershipSet {
            words: (0..len).map(|_| AtomicU64::new(0)).collect(),
            generator,
        }
    }

    pub fn generator(&self) -> &IndexGenerator<H> {
        &self.generator
    }

    /// Sets the `k` bits belonging to `word`. Safe to call from many threads at once.
    ///
    /// # Arguments
    ///
    /// * `word` - The word to be hashed to create indices into the set.
    pub fn add(&self, word: impl AsRef<[u8]>) {
        self.generator
            .indices(word.as_ref())
            .for_each(|i| self.set_bit(i));
    }

    /// Tests whether `word` may have been added. Stops at the first unset bit.
    ///
    /// # Arguments
    ///
    /// * `word` - The word to be hashed to create indices into the set.
    /// These indices will be used to see if the word has been added.
    ///
    /// # Examples
    /// ```
    /// use seeded_bloom::AtomicMembershipSet;
    /// let set = AtomicMembershipSet::new(100_000, 3).unwrap();
    /// set.add("hello");
    /// set.add("there");
    /// assert!(set.contains("hello"));
    /// assert!(set.contains("there"));
    /// assert!(!set.contains("not here"));
    /// ```
    pub fn contains(&self, word: impl AsRef<[u8]>) -> bool {
        self.generator
            .indices(word.as_ref())
            .all(|i| self.bit(i))
    }

    /// Number of bits currently set. Only a snapshot while other threads are adding.
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    pub fn load_factor(&self) -> f64 {
        self.count_ones() as f64 / self.num_bits() as f64
    }

    /// See [`MembershipSet::estimated_false_positive_rate`](crate::MembershipSet::estimated_false_positive_rate).
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.load_factor().powf(self.k() as f64)
    }

    /// Unsets every bit. Takes `&mut self` so no add or lookup can be in flight.
    pub fn clear(&mut self) {
        debug!(m = self.num_bits(), "clearing atomic membership set");
        self.words.iter_mut().for_each(|w| *w.get_mut() = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership_set::MembershipSet;
    use std::sync::Arc;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("word-{}", i)).collect()
    }

    #[test]
    fn optimal_constructor() {
        let set = AtomicMembershipSet::optimal(1000, 0.01).unwrap();
        assert_eq!(set.num_bits(), 9586);
        assert_eq!(set.k(), 7)
    }

    #[test]
    fn matches_single_threaded_set() {
        let mut plain = MembershipSet::new(20, 3).unwrap();
        let atomic = AtomicMembershipSet::new(20, 3).unwrap();
        for w in &["My", "name", "is", "Mrunank"] {
            plain.add(w);
            atomic.add(w);
        }
        assert_eq!(format!("{:?}", plain), format!("{:?}", atomic));
        assert_eq!(plain.count_ones(), atomic.count_ones());
        assert!(atomic.contains("name"));
        assert!(!atomic.contains("unrelated-word-xyz"));
    }

    #[test]
    fn empty_set_contains_nothing() {
        let set = AtomicMembershipSet::new(130, 4).unwrap();
        assert!(words(200).iter().all(|w| !set.contains(w)));
    }

    #[test]
    fn bits_past_a_word_boundary() {
        let set = AtomicMembershipSet::with_hasher(
            FilterParams::new(130, 2).unwrap(),
            |_: &[u8], seed: u32| 63 + seed * 66,
        )
        .unwrap();
        set.add("x");
        assert_eq!(set.count_ones(), 2);
        let debug = format!("{:?}", set);
        assert_eq!(debug.len(), "bits: []".len() + 130);
        assert!(set.contains("y"));
    }

    #[test]
    fn concurrent_adds_lose_nothing() {
        let set = Arc::new(AtomicMembershipSet::new(4096, 5).unwrap());
        let all = words(2000);
        let (evens, odds): (Vec<_>, Vec<_>) = all.iter().enumerate().partition(|(i, _)| i % 2 == 0);

        crossbeam::scope(|scope| {
            for half in [&evens, &odds] {
                let set = Arc::clone(&set);
                scope.spawn(move |_| half.iter().for_each(|(_, w)| set.add(w)));
            }
        })
        .unwrap();

        let mut reference = MembershipSet::new(4096, 5).unwrap();
        all.iter().for_each(|w| reference.add(w));

        assert!(all.iter().all(|w| set.contains(w)));
        assert_eq!(format!("{:?}", reference), format!("{:?}", set));
    }

    #[test]
    fn clear_resets_all_words() {
        let mut set = AtomicMembershipSet::new(200, 3).unwrap();
        words(50).iter().for_each(|w| set.add(w));
        assert!(set.count_ones() > 0);
        set.clear();
        assert_eq!(set.count_ones(), 0);
        assert_eq!(set.estimated_false_positive_rate(), 0.0);
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AtomicMembershipSet>();
    }
}
