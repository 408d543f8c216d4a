use crate::error::Result;
use crate::hash32::{Hash32, Murmur3};
use crate::index_generator::IndexGenerator;
use crate::params::FilterParams;
use bit_vec::BitVec;
use std::fmt::Debug;
use std::fmt::Error;
use std::fmt::Formatter;
use tracing::debug;

/// A probabilistic set of words that can tell with complete accuracy if a word has _not_ been
/// added, but allows false positives when asked whether a word has been added.
///
/// Each word owns the `k` bits named by its [`IndexSet`](crate::IndexSet).
/// Bits only ever go from 0 to 1, except through [`MembershipSet::clear`].
///
/// Mutation needs `&mut self`. For concurrent use without a lock see
/// [`AtomicMembershipSet`](crate::AtomicMembershipSet).
#[derive(Clone)]
pub struct MembershipSet<H = Murmur3> {
    bits: BitVec,
    generator: IndexGenerator<H>,
}

impl<H> Debug for MembershipSet<H> {
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), Error> {
        let mut s = String::with_capacity(self.bits.len());
        self.bits
            .iter()
            .for_each(|b| if b { s.push('1') } else { s.push('0') });
        write!(f, "bits: [{}]", s)
    }
}

impl MembershipSet<Murmur3> {
    /// Creates an empty set of `m` bits that hashes every word `k` times with MurmurHash3.
    ///
    /// # Examples
    /// ```
    /// use seeded_bloom::MembershipSet;
    /// let mut set = MembershipSet::new(20, 3).unwrap();
    /// set.add("name");
    /// assert!(set.contains("name"));
    /// assert!(MembershipSet::new(20, 0).is_err());
    /// ```
    pub fn new(m: usize, k: usize) -> Result<Self> {
        Self::from_params(FilterParams::new(m, k)?)
    }

    pub fn from_params(params: FilterParams) -> Result<Self> {
        Self::with_hasher(params, Murmur3)
    }

    /// Sized for `n` words at a false positive rate of `p`.
    ///
    /// # Examples
    /// ```
    /// use seeded_bloom::MembershipSet;
    /// let set = MembershipSet::optimal(1000, 0.01).unwrap();
    /// assert_eq!(set.num_bits(), 9586);
    /// assert_eq!(set.k(), 7);
    /// ```
    pub fn optimal(n: usize, p: f64) -> Result<Self> {
        Self::from_params(FilterParams::optimal(n, p)?)
    }
}

impl<H: Hash32> MembershipSet<H> {
    pub fn with_hasher(params: FilterParams, hasher: H) -> Result<Self> {
        Ok(Self::with_generator(IndexGenerator::with_hasher(
            params.k(),
            params.m(),
            hasher,
        )?))
    }

    /// Uses an already validated generator, keeping its hasher and reduction.
    pub fn with_generator(generator: IndexGenerator<H>) -> Self {
        debug!(
            m = generator.m(),
            k = generator.k(),
            reduction = ?generator.reduction(),
            "created membership set"
        );
        MembershipSet {
            bits: BitVec::from_elem(generator.m(), false),
            generator,
        }
    }

    /// Gets the number of bits (`m`) in the set.
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Gets the number of indices (`k`) derived for each word.
    pub fn k(&self) -> usize {
        self.generator.k()
    }

    pub fn params(&self) -> FilterParams {
        self.generator.params()
    }

    pub fn generator(&self) -> &IndexGenerator<H> {
        &self.generator
    }

    /// Sets the `k` bits belonging to `word`.
    ///
    /// Bits that are already set stay set, so adding a word twice is the same as adding it once.
    pub fn add(&mut self, word: impl AsRef<[u8]>) {
        let bits = &mut self.bits;
        self.generator
            .indices(word.as_ref())
            .for_each(|i| bits.set(i, true));
    }

    /// Tests whether `word` may have been added.
    ///
    /// Always true for a word that was added. May also be true for a word that was not,
    /// when other words happen to cover all of its bits; that gets more likely as the set fills up.
    /// Stops hashing at the first unset bit.
    pub fn contains(&self, word: impl AsRef<[u8]>) -> bool {
        self.generator
            .indices(word.as_ref())
            .all(|i| self.bits[i])
    }

    /// Number of bits currently set.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|b| *b).count()
    }

    /// Fraction of bits set, in `[0, 1]`.
    pub fn load_factor(&self) -> f64 {
        self.count_ones() as f64 / self.num_bits() as f64
    }

    /// Chance that a word which was never added is reported as present, given the bits set now.
    ///
    /// # Note
    /// This assumes the hash spreads words uniformly. A poorly mixing hash will produce
    /// more false positives than this suggests.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.load_factor().powf(self.k() as f64)
    }

    /// Unsets every bit, forgetting all words. `m` and `k` are unchanged.
    pub fn clear(&mut self) {
        debug!(m = self.num_bits(), "clearing membership set");
        self.bits = BitVec::from_elem(self.num_bits(), false);
    }
}

/// Creates an empty [`MembershipSet`] of `m` bits with `k` MurmurHash3 indices per word.
pub fn new_membership_set(m: usize, k: usize) -> Result<MembershipSet> {
    MembershipSet::new(m, k)
}

/// Adds `word` to `set`.
pub fn add<H: Hash32>(set: &mut MembershipSet<H>, word: impl AsRef<[u8]>) {
    set.add(word)
}

/// Tests whether `word` may be in `set`.
pub fn contains<H: Hash32>(set: &MembershipSet<H>, word: impl AsRef<[u8]>) -> bool {
    set.contains(word)
}
