//! Gaussian Mechanism
//!
//! Adds N(0, σ²) noise calibrated as
//!
//! ```text
//! σ = sqrt(2 ln(5/(4δ))) · Δ₂/ε
//! ```
//!
//! which gives (ε, δ)-differential privacy for δ ∈ (0, 1].

use serde::{Deserialize, Serialize};

use super::{additive_region_exact, AdditiveMechanism, Mechanism};
use crate::error::Result;
use crate::region::Region;
use crate::special::normal_cdf;
use crate::tradeoff::NoiseDistribution;
use crate::validation::{validate_gaussian_delta, validate_positive_epsilon, validate_sensitivity};

/// Gaussian mechanism for (ε, δ)-differential privacy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianMechanism {
    epsilon: f64,
    delta: f64,
    l2_sensitivity: f64,
}

// sqrt(2 ln(5/(4δ)))
fn calibration(delta: f64) -> f64 {
    (2.0 * (5.0 / (4.0 * delta)).ln()).sqrt()
}

impl GaussianMechanism {
    /// Create a Gaussian mechanism for a query with the given L2 sensitivity
    pub fn new(epsilon: f64, delta: f64, l2_sensitivity: f64) -> Result<Self> {
        validate_positive_epsilon(epsilon)?;
        validate_gaussian_delta(delta)?;
        validate_sensitivity(l2_sensitivity)?;
        Ok(GaussianMechanism {
            epsilon,
            delta,
            l2_sensitivity,
        })
    }

    /// L2 sensitivity of the protected query
    pub fn l2_sensitivity(&self) -> f64 {
        self.l2_sensitivity
    }

    /// Standard deviation for given parameters, without building a mechanism
    pub fn noise_scale_for(epsilon: f64, delta: f64, l2_sensitivity: f64) -> f64 {
        calibration(delta) * (l2_sensitivity / epsilon)
    }
}

impl Mechanism for GaussianMechanism {
    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn delta(&self) -> f64 {
        self.delta
    }

    /// `2Φ(shift/2) − 1`
    fn tv(&self) -> f64 {
        2.0 * normal_cdf(self.shift() / 2.0) - 1.0
    }

    fn region_exact(&self) -> Region {
        additive_region_exact(self)
    }
}

impl AdditiveMechanism for GaussianMechanism {
    fn distribution(&self) -> NoiseDistribution {
        NoiseDistribution::Gaussian
    }

    /// `ε / sqrt(2 ln(5/(4δ)))`, i.e. `Δ₂/σ`
    fn shift(&self) -> f64 {
        self.epsilon / calibration(self.delta)
    }

    fn noise_scale(&self) -> f64 {
        Self::noise_scale_for(self.epsilon, self.delta, self.l2_sensitivity)
    }
}
