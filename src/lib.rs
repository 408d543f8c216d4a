//! Derives `k` table positions from a single word using one seeded 32-bit hash, and builds
//! Bloom-style membership sets on top of those positions.
//!
//! Index `i` of a word is `hash32(word, seed = i) % m` for `i` in `0..k`. Reseeding one hash
//! makes the `k` positions behave like the output of `k` independent hash functions.
//!
//! Bloom filters offer time and space efficient lookup with no false negatives,
//! and with a false positive rate dependent on the number of hashes (`k`), number of entries (`n`),
//! and number of bits in the filter (`m`).
//! The false positive rate will increase as `n` rises, and will fall as `k` and `m` rise.
//!
//! ```
//! use seeded_bloom::{generate_indices, MembershipSet};
//!
//! assert_eq!(generate_indices("name", 3, 20).unwrap().as_slice(), &[16, 0, 2]);
//!
//! let mut set = MembershipSet::new(20, 3).unwrap();
//! set.add("name");
//! assert!(set.contains("name"));
//! assert!(!set.contains("unrelated-word-xyz"));
//! ```

pub mod atomic_membership_set;
pub mod error;
pub mod hash32;
pub mod index_generator;
pub mod membership_set;
pub mod params;
pub mod spectral_filter;

pub use crate::atomic_membership_set::AtomicMembershipSet;
pub use crate::error::{Error, Result};
pub use crate::hash32::{Hash32, Murmur3};
pub use crate::index_generator::{
    generate_indices, generate_indices_with, IndexGenerator, IndexSet, Reduction,
};
pub use crate::membership_set::{add, contains, new_membership_set, MembershipSet};
pub use crate::params::FilterParams;
pub use crate::spectral_filter::SpectralFilter;

/// Calculates the ideal false positive rate.
/// If the hash used produces a non-uniform distribution of indices
/// then the actual false positive rate should be higher than stated.
///
/// k: number of hashes
/// n: number of elements
/// m: number of bits
pub fn false_positive_rate(k: usize, n: usize, m: usize) -> f64 {
    use std::f64::consts::E;
    (1.0 - E.powf(-((k * n) as f64) / m as f64)).powi(k as i32)
}

/// Gets the required number of bits (`m`) if given `k`, `n` and `p`.
///
/// # Note
/// This is useful if you want to choose `k` beforehand for performance reasons,
/// and you want to know how big the filter will need to be to achieve a desired false positive rate.
pub fn m_from_knp(k: usize, n: usize, p: f64) -> usize {
    -((k * n) as f64 / (1f64 - p.powf(1.0 / (k as f64))).ln()) as usize
}

/// Gets the required number of bits (`m`) assuming an optimal `k`, using `n` and `p`.
pub fn optimal_m(n: usize, p: f64) -> usize {
    // m = ceil((n * ln(p)) / ln(1 / 2^ln(2)))
    ((n as f64 * p.ln()) / (1.0 / 2f64.powf(2f64.ln())).ln()).ceil() as usize
}

/// Gets the optimal number of hashes (`k`) given `n` and `m`, never less than 1.
pub fn optimal_k(n: usize, m: usize) -> usize {
    ((m as f64 / n as f64) * 2f64.ln()).round().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needed_size1() {
        let m = optimal_m(2000, 0.001);
        assert_eq!(m, 28756)
    }

    #[test]
    fn optimal_k1() {
        let m = 28756;
        let k = optimal_k(2000, m);
        assert_eq!(k, 10)
    }

    #[test]
    fn optimal_k_is_at_least_one() {
        assert_eq!(optimal_k(1000, 1), 1)
    }

    #[test]
    fn solve_for_m() {
        let p = false_positive_rate(4, 1000, 10000);
        let m = m_from_knp(4, 1000, p);
        assert_eq!(m, 10000)
    }

    #[test]
    fn t_false_positive_rate() {
        let x = false_positive_rate(4, 10_000, 100_000);
        assert!(x < 0.012)
    }
}
