//! The seeded 32-bit hash that every index is derived from.

/// A deterministic, seeded 32-bit hash of a byte string.
///
/// Implementations must return the same value for the same `(data, seed)` pair on every call.
/// Cryptographic strength is not needed, but the output bits should be well mixed,
/// since the quality of the resulting indices depends on it.
pub trait Hash32 {
    fn hash32(&self, data: &[u8], seed: u32) -> u32;
}

/// Any `Fn(&[u8], u32) -> u32` can stand in for the hash primitive.
///
/// # Examples
/// ```
/// use seeded_bloom::generate_indices_with;
/// let constant = |_: &[u8], _: u32| 7u32;
/// let indices = generate_indices_with(&constant, "anything", 3, 5).unwrap();
/// assert_eq!(&*indices, &[2, 2, 2]);
/// ```
impl<F> Hash32 for F
where
    F: Fn(&[u8], u32) -> u32,
{
    #[inline]
    fn hash32(&self, data: &[u8], seed: u32) -> u32 {
        self(data, seed)
    }
}

/// MurmurHash3, x86 32-bit variant.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Murmur3;

impl Hash32 for Murmur3 {
    #[inline]
    fn hash32(&self, mut data: &[u8], seed: u32) -> u32 {
        match murmur3::murmur3_32(&mut data, seed) {
            Ok(hash) => hash,
            // Reading from an in-memory slice does not fail.
            Err(e) => unreachable!("murmur3 failed on a byte slice: {}", e),
        }
    }
}
