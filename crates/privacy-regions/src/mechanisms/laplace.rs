//! Laplace Mechanism
//!
//! Adds noise drawn from Laplace(0, b) with `b = Δ₁/ε` and satisfies
//! (ε, 0)-differential privacy.
//!
//! ```text
//! M(D) = f(D) + Lap(0, Δ₁/ε)
//! F(x) = 0.5 + 0.5 · sign(x) · (1 − e^(−|x|/b))
//! ```
//!
//! In unit-scale noise units the two neighbouring hypotheses are separated
//! by `Δ₁/b = ε`, so the trade-off curve depends on ε alone.

use serde::{Deserialize, Serialize};

use super::{additive_region_exact, AdditiveMechanism, Mechanism};
use crate::error::Result;
use crate::region::Region;
use crate::tradeoff::NoiseDistribution;
use crate::validation::{validate_positive_epsilon, validate_sensitivity};

/// Laplace mechanism for (ε, 0)-differential privacy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaplaceMechanism {
    epsilon: f64,
    l1_sensitivity: f64,
}

impl LaplaceMechanism {
    /// Create a Laplace mechanism for a query with the given L1 sensitivity
    pub fn new(epsilon: f64, l1_sensitivity: f64) -> Result<Self> {
        validate_positive_epsilon(epsilon)?;
        validate_sensitivity(l1_sensitivity)?;
        Ok(LaplaceMechanism {
            epsilon,
            l1_sensitivity,
        })
    }

    /// L1 sensitivity of the protected query
    pub fn l1_sensitivity(&self) -> f64 {
        self.l1_sensitivity
    }

    /// Compute the scale parameter for given sensitivity and epsilon
    ///
    /// scale = Δ₁ / ε
    pub fn noise_scale_for(epsilon: f64, l1_sensitivity: f64) -> f64 {
        l1_sensitivity / epsilon
    }
}

impl Mechanism for LaplaceMechanism {
    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn delta(&self) -> f64 {
        0.0
    }

    /// `1 − e^{−ε/2}`
    fn tv(&self) -> f64 {
        -(-self.epsilon / 2.0).exp_m1()
    }

    fn region_exact(&self) -> Region {
        additive_region_exact(self)
    }
}

impl AdditiveMechanism for LaplaceMechanism {
    fn distribution(&self) -> NoiseDistribution {
        NoiseDistribution::Laplace
    }

    fn shift(&self) -> f64 {
        self.epsilon
    }

    fn noise_scale(&self) -> f64 {
        Self::noise_scale_for(self.epsilon, self.l1_sensitivity)
    }
}
