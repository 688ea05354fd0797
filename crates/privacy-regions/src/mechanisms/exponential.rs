//! Exponential mechanism for the median of data in `{1, ..., m}`
//!
//! Each candidate label `x` is scored by how unbalanced the data is around it,
//! `score(x) = −|Σᵢ sign(dataᵢ − x)|`, and drawn with probability
//! proportional to `exp(ε · score(x) / 4)`. The score has sensitivity 2, so
//! the mechanism is (ε, 0)-DP.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{rng_from_seed, Mechanism};
use crate::algebra::dp_region_unchecked;
use crate::error::Result;
use crate::region::Region;
use crate::validation::{validate_alphabet_size, validate_epsilon};

/// Median release through the exponential mechanism
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialMedian {
    epsilon: f64,
    alphabet_size: usize,
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl ExponentialMedian {
    /// Create the mechanism over labels `1..=alphabet_size`
    pub fn new(epsilon: f64, alphabet_size: usize) -> Result<Self> {
        validate_epsilon(epsilon)?;
        validate_alphabet_size(alphabet_size)?;
        Ok(ExponentialMedian {
            epsilon,
            alphabet_size,
        })
    }

    /// Number of candidate labels
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Median score of a label; 0 exactly at a median
    pub fn score(data: &[f64], label: f64) -> f64 {
        -data.iter().map(|&d| sign(d - label)).sum::<f64>().abs()
    }

    /// Sampling probability of each label `1..=m`
    pub fn probabilities(&self, data: &[f64]) -> Vec<f64> {
        let log_weights: Vec<f64> = (1..=self.alphabet_size)
            .map(|label| self.epsilon * Self::score(data, label as f64) / 4.0)
            .collect();
        // Scores are ≤ 0; shift by the maximum so the best label has weight 1
        let max = log_weights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = log_weights.iter().map(|w| (w - max).exp()).collect();
        let total: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }

    /// Draw a private median label
    pub fn apply(&self, data: &[f64], seed: Option<u64>) -> usize {
        let mut rng = rng_from_seed(seed);
        let probabilities = self.probabilities(data);
        let u: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (i, p) in probabilities.iter().enumerate() {
            cumulative += p;
            if u < cumulative {
                return i + 1;
            }
        }
        self.alphabet_size
    }

    /// Tail bound on the rank deviation: `P(deviation ≥ t) ≤ min(1, m·e^{−ε t/4})`
    pub fn rank_deviation_bound(&self, t: f64) -> f64 {
        let m = self.alphabet_size as f64;
        (m * (-self.epsilon * t / 4.0).exp()).min(1.0)
    }
}

impl Mechanism for ExponentialMedian {
    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn delta(&self) -> f64 {
        0.0
    }

    /// Largest total variation of an (ε, 0)-DP mechanism, `(e^ε − 1)/(e^ε + 1)`
    fn tv(&self) -> f64 {
        (self.epsilon / 2.0).tanh()
    }

    fn region_exact(&self) -> Region {
        dp_region_unchecked(self.epsilon, 0.0)
    }
}
