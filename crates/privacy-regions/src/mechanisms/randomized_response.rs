//! Randomized response over an alphabet `{1, ..., m}`
//!
//! Each symbol is kept with probability `p_ε = (e^ε − 1)/(e^ε + m − 1)` and
//! otherwise replaced by a uniformly random symbol (which may coincide with
//! the original). The output distribution then satisfies (ε, 0)-DP:
//!
//! ```text
//! P(y = x) / P(y = x') = (p_ε + (1 − p_ε)/m) / ((1 − p_ε)/m) = e^ε
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{rng_from_seed, Mechanism};
use crate::algebra::dp_region_unchecked;
use crate::error::{RegionError, Result};
use crate::region::Region;
use crate::validation::{validate_alphabet_size, validate_epsilon};

/// Randomized response on a finite alphabet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomizedResponse {
    epsilon: f64,
    alphabet_size: usize,
}

impl RandomizedResponse {
    /// Create the mechanism for alphabet size `m ≥ 2`
    pub fn new(epsilon: f64, alphabet_size: usize) -> Result<Self> {
        validate_epsilon(epsilon)?;
        validate_alphabet_size(alphabet_size)?;
        Ok(RandomizedResponse {
            epsilon,
            alphabet_size,
        })
    }

    /// Alphabet size `m`
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Probability `p_ε` of reporting the true symbol without a random draw
    pub fn keep_probability(&self) -> f64 {
        let m = self.alphabet_size as f64;
        // (e^ε − 1)/(e^ε + m − 1), written to stay finite for large ε
        let expm1 = self.epsilon.exp_m1();
        if expm1.is_finite() {
            expm1 / (expm1 + m)
        } else {
            1.0
        }
    }

    /// Utility proxy: probability that the output is a uniform random draw
    pub fn switch_probability(&self) -> f64 {
        1.0 - self.keep_probability()
    }

    /// The ε whose switch probability is `p`, for `p ∈ (0, 1]`
    pub fn epsilon_for_switch_probability(p: f64, alphabet_size: usize) -> Result<f64> {
        validate_alphabet_size(alphabet_size)?;
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return Err(RegionError::InvalidParameter {
                name: "switch_probability".to_string(),
                value: p,
                reason: "must lie in (0, 1]",
            });
        }
        let keep = 1.0 - p;
        let m = alphabet_size as f64;
        Ok((keep * m / p).ln_1p())
    }

    /// Randomize each symbol independently
    ///
    /// Symbols are expected in `1..=m`; replacements are drawn uniformly from
    /// the same range.
    pub fn apply(&self, symbols: &[usize], seed: Option<u64>) -> Vec<usize> {
        let mut rng = rng_from_seed(seed);
        let keep = self.keep_probability();
        symbols
            .iter()
            .map(|&s| {
                if rng.gen::<f64>() < keep {
                    s
                } else {
                    rng.gen_range(1..=self.alphabet_size)
                }
            })
            .collect()
    }
}

impl Mechanism for RandomizedResponse {
    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn delta(&self) -> f64 {
        0.0
    }

    fn tv(&self) -> f64 {
        self.keep_probability()
    }

    fn region_exact(&self) -> Region {
        dp_region_unchecked(self.epsilon, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_probability() {
        let rr = RandomizedResponse::new(2.0f64.ln(), 3).unwrap();
        // (2 − 1)/(2 + 3 − 1) = 1/4
        assert!((rr.keep_probability() - 0.25).abs() < 1e-15);
        assert!((rr.switch_probability() - 0.75).abs() < 1e-15);
        assert!((rr.tv() - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_zero_epsilon_always_switches() {
        let rr = RandomizedResponse::new(0.0, 4).unwrap();
        assert_eq!(rr.switch_probability(), 1.0);
    }

    #[test]
    fn test_large_epsilon_is_finite() {
        let rr = RandomizedResponse::new(1000.0, 4).unwrap();
        assert_eq!(rr.keep_probability(), 1.0);
    }

    #[test]
    fn test_epsilon_for_switch_probability_inverts() {
        for &(eps, m) in &[(0.1, 2usize), (1.0, 5), (3.0, 100)] {
            let rr = RandomizedResponse::new(eps, m).unwrap();
            let back =
                RandomizedResponse::epsilon_for_switch_probability(rr.switch_probability(), m)
                    .unwrap();
            assert!((back - eps).abs() < 1e-9, "eps = {}, back = {}", eps, back);
        }
        assert!(RandomizedResponse::epsilon_for_switch_probability(0.0, 5).is_err());
        assert_eq!(
            RandomizedResponse::epsilon_for_switch_probability(1.0, 5).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_rejects_small_alphabet() {
        assert!(RandomizedResponse::new(1.0, 1).is_err());
    }

    #[test]
    fn test_apply_stays_in_alphabet() {
        let rr = RandomizedResponse::new(0.5, 6).unwrap();
        let input: Vec<usize> = (0..500).map(|i| i % 6 + 1).collect();
        let out = rr.apply(&input, Some(3));
        assert_eq!(out.len(), input.len());
        assert!(out.iter().all(|&s| (1..=6).contains(&s)));
        assert_eq!(out, rr.apply(&input, Some(3)));
    }

    #[test]
    fn test_region_exact_is_pure_dp() {
        let rr = RandomizedResponse::new(0.8, 3).unwrap();
        assert_eq!(rr.region_exact().len(), 3);
        assert_eq!(rr.region_tv().len(), 4);
    }
}
