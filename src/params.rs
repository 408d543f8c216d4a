use crate::error::{Error, Result};
use crate::index_generator::validate;
use tracing::debug;

/// Size (`m`) and hash count (`k`) of a filter.
///
/// Both are fixed for the life of a filter. Changing either would move every
/// word to different bits, so filters take them once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFilterParams"))]
pub struct FilterParams {
    m: usize,
    k: usize,
}

impl FilterParams {
    /// # Errors
    /// `InvalidArgument` if `m` or `k` is zero.
    pub fn new(m: usize, k: usize) -> Result<Self> {
        validate(k, m)?;
        Ok(FilterParams { m, k })
    }

    /// For pairs that already went through `validate`.
    pub(crate) fn validated(m: usize, k: usize) -> Self {
        FilterParams { m, k }
    }

    /// Sizes a filter for `n` expected words at a false positive rate of `p`.
    ///
    /// # Arguments
    ///
    /// * `n` - Number of words expected to be added.
    /// * `p` - Desired false positive rate once `n` words are in, in `(0, 1)`.
    ///
    /// # Examples
    /// ```
    /// use seeded_bloom::FilterParams;
    /// let params = FilterParams::optimal(100, 0.1).unwrap();
    /// assert_eq!((params.m(), params.k()), (480, 3));
    /// ```
    pub fn optimal(n: usize, p: f64) -> Result<Self> {
        check_np(n, p)?;
        let m = crate::optimal_m(n, p);
        let k = crate::optimal_k(n, m);
        debug!(n, p, m, k, "sized filter");
        Self::new(m, k)
    }

    /// Keeps `k` fixed and picks the `m` needed to reach `p` at `n` words.
    ///
    /// Insert and lookup cost scale with `k`, not `m`, so this trades memory for speed.
    pub fn with_k(k: usize, n: usize, p: f64) -> Result<Self> {
        check_np(n, p)?;
        if k == 0 {
            return Err(Error::invalid("k", "must be at least 1"));
        }
        let m = crate::m_from_knp(k, n, p).max(1);
        debug!(n, p, m, k, "sized filter for fixed k");
        Self::new(m, k)
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawFilterParams {
    m: usize,
    k: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFilterParams> for FilterParams {
    type Error = Error;

    fn try_from(raw: RawFilterParams) -> Result<Self> {
        FilterParams::new(raw.m, raw.k)
    }
}

fn check_np(n: usize, p: f64) -> Result<()> {
    if n == 0 {
        return Err(Error::invalid("n", "must be at least 1"));
    }
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::invalid("p", format!("{} is not in (0, 1)", p)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_matches_known_sizes() {
        let params = FilterParams::optimal(100, 0.1).unwrap();
        assert_eq!((params.m(), params.k()), (480, 3));

        let params = FilterParams::optimal(2000, 0.001).unwrap();
        assert_eq!((params.m(), params.k()), (28756, 10));
    }

    #[test]
    fn fixed_k_reaches_rate() {
        let p = crate::false_positive_rate(4, 1000, 10_000);
        let params = FilterParams::with_k(4, 1000, p).unwrap();
        assert_eq!(params.k(), 4);
        assert_eq!(params.m(), 10_000);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert!(FilterParams::new(0, 3).is_err());
        assert!(FilterParams::new(20, 0).is_err());
        assert!(FilterParams::optimal(0, 0.1).is_err());
        assert!(FilterParams::optimal(10, 0.0).is_err());
        assert!(FilterParams::optimal(10, 1.0).is_err());
        assert!(FilterParams::optimal(10, f64::NAN).is_err());
        assert!(FilterParams::with_k(0, 10, 0.1).is_err());
    }

    #[test]
    fn high_rates_still_give_one_hash() {
        let params = FilterParams::optimal(1_000_000, 0.99).unwrap();
        assert!(params.k() >= 1);
        assert!(params.m() >= 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn round_trips_through_json() {
        let params = FilterParams::new(20, 3).unwrap();
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"m":20,"k":3}"#);
        let back: FilterParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
        assert!(serde_json::from_str::<FilterParams>(r#"{"m":0,"k":3}"#).is_err());
    }
}
