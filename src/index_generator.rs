use crate::error::{Error, Result};
use crate::hash32::{Hash32, Murmur3};
use crate::params::FilterParams;
use std::collections::HashSet;
use std::ops::Deref;
use tracing::{debug, trace};

/// How a 32-bit hash is mapped onto `[0, m)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Reduction {
    /// `hash % m`.
    /// Slightly favors the low indices when `m` is not a power of two.
    #[default]
    Modulo,
    /// `(hash * m) >> 32`, computed wide.
    /// Spreads the hash range evenly over `m` buckets without a division.
    MultiplyShift,
}

impl Reduction {
    /// Maps `hash` to an index below `m`. `m` must be non-zero.
    #[inline]
    pub fn reduce(self, hash: u32, m: usize) -> usize {
        match self {
            Reduction::Modulo => (u64::from(hash) % m as u64) as usize,
            Reduction::MultiplyShift => ((u128::from(hash) * m as u128) >> 32) as usize,
        }
    }
}

/// The ordered indices produced for one word, one per seed `0..k`.
///
/// Two seeds may land on the same index; both occurrences are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IndexSet(Vec<usize>);

impl IndexSet {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// The first index that appears a second time, scanning in seed order.
    pub fn first_duplicate(&self) -> Option<usize> {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.0.iter().copied().find(|i| !seen.insert(*i))
    }

    /// True if two or more seeds map to the same index.
    /// Such a word effectively uses fewer than `k` bits of the filter.
    pub fn has_duplicates(&self) -> bool {
        self.first_duplicate().is_some()
    }
}

impl Deref for IndexSet {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        IndexSet(iter.into_iter().collect())
    }
}

impl IntoIterator for IndexSet {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<IndexSet> for Vec<usize> {
    fn from(set: IndexSet) -> Self {
        set.0
    }
}

/// Checks `k >= 1`, `m >= 1`, and that every seed in `0..k` fits in a `u32`.
pub(crate) fn validate(k: usize, m: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::invalid("k", "must be at least 1"));
    }
    if m == 0 {
        return Err(Error::invalid("m", "must be at least 1"));
    }
    if u32::try_from(k - 1).is_err() {
        return Err(Error::invalid(
            "k",
            format!("seeds 0..{} do not fit in a u32", k),
        ));
    }
    Ok(())
}

fn seeded_indices<'a, H>(
    hasher: &'a H,
    word: &'a [u8],
    k: usize,
    m: usize,
    reduction: Reduction,
) -> impl ExactSizeIterator<Item = usize> + 'a
where
    H: Hash32 + ?Sized,
{
    (0..k).map(move |seed| reduction.reduce(hasher.hash32(word, seed as u32), m))
}

/// Produces `k` indices in `[0, m)` for `word` using MurmurHash3 seeded with `0..k`.
///
/// Index `i` of the result is `murmur3_x86_32(word, seed = i) % m`.
/// The word is hashed as raw bytes; pass a `&str` to hash its UTF-8 encoding.
/// Memory use of the result is linear in `k` and `k` is otherwise unbounded.
///
/// # Errors
/// `InvalidArgument` if `k` or `m` is zero.
///
/// # Examples
/// ```
/// use seeded_bloom::generate_indices;
/// let indices = generate_indices("dogs", 3, 200).unwrap();
/// assert_eq!(indices.as_slice(), &[133, 193, 69]);
/// assert!(generate_indices("dogs", 0, 200).is_err());
/// ```
pub fn generate_indices(word: impl AsRef<[u8]>, k: usize, m: usize) -> Result<IndexSet> {
    generate_indices_with(&Murmur3, word, k, m)
}

/// Like [`generate_indices`], with the hash primitive supplied by the caller.
pub fn generate_indices_with<H>(
    hasher: &H,
    word: impl AsRef<[u8]>,
    k: usize,
    m: usize,
) -> Result<IndexSet>
where
    H: Hash32 + ?Sized,
{
    validate(k, m)?;
    Ok(seeded_indices(hasher, word.as_ref(), k, m, Reduction::Modulo).collect())
}

/// `k`, `m`, a hash primitive and a reduction, validated once and reused for every word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGenerator<H = Murmur3> {
    k: usize,
    m: usize,
    reduction: Reduction,
    hasher: H,
}

impl IndexGenerator<Murmur3> {
    /// # Examples
    /// ```
    /// use seeded_bloom::IndexGenerator;
    /// let generator = IndexGenerator::new(5, 100).unwrap();
    /// assert_eq!(generator.generate("cats").as_slice(), &[66, 78, 4, 86, 26]);
    /// ```
    pub fn new(k: usize, m: usize) -> Result<Self> {
        Self::with_hasher(k, m, Murmur3)
    }
}

impl<H> IndexGenerator<H> {
    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn params(&self) -> FilterParams {
        FilterParams::validated(self.m, self.k)
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl<H: Hash32> IndexGenerator<H> {
    pub fn with_hasher(k: usize, m: usize, hasher: H) -> Result<Self> {
        validate(k, m)?;
        debug!(k, m, "created index generator");
        Ok(IndexGenerator {
            k,
            m,
            reduction: Reduction::Modulo,
            hasher,
        })
    }

    /// Lazily yields the indices for `word` in seed order.
    /// Stopping early skips the remaining hashes.
    pub fn indices<'a>(&'a self, word: &'a [u8]) -> impl ExactSizeIterator<Item = usize> + 'a {
        seeded_indices(&self.hasher, word, self.k, self.m, self.reduction)
    }

    pub fn generate(&self, word: impl AsRef<[u8]>) -> IndexSet {
        let set: IndexSet = self.indices(word.as_ref()).collect();
        trace!(k = self.k, m = self.m, indices = ?set.as_slice(), "generated indices");
        set
    }
}
