//! Trade-off functions
//!
//! A trade-off function maps a false-positive rate to the smallest false-negative
//! rate any test can achieve against a mechanism. For additive noise with a
//! unit-scale distribution `F`, it has the closed form
//! `T(fp) = F(F⁻¹(1 − fp) − shift)`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::special::{normal_cdf, normal_quantile};

/// Unit-scale noise distributions with closed-form quantile and CDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseDistribution {
    /// Standard normal N(0, 1)
    Gaussian,
    /// Laplace(0, 1)
    Laplace,
}

impl NoiseDistribution {
    /// Quantile function F⁻¹(p); ±∞ at the endpoints
    pub fn quantile(&self, p: f64) -> f64 {
        match self {
            NoiseDistribution::Gaussian => normal_quantile(p),
            NoiseDistribution::Laplace => {
                if p.is_nan() || !(0.0..=1.0).contains(&p) {
                    return f64::NAN;
                }
                let centered = p - 0.5;
                if centered == 0.0 {
                    return 0.0;
                }
                -centered.signum() * (1.0 - 2.0 * centered.abs()).ln()
            }
        }
    }

    /// Variance of the unit-scale distribution
    pub fn unit_variance(&self) -> f64 {
        match self {
            NoiseDistribution::Gaussian => 1.0,
            NoiseDistribution::Laplace => 2.0,
        }
    }

    /// Cumulative distribution function F(x)
    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            NoiseDistribution::Gaussian => normal_cdf(x),
            NoiseDistribution::Laplace => {
                if x.is_nan() {
                    return f64::NAN;
                }
                if x == 0.0 {
                    return 0.5;
                }
                0.5 + 0.5 * x.signum() * -(-x.abs()).exp_m1()
            }
        }
    }
}

/// Function from false-positive rate to minimal false-negative rate
#[derive(Clone)]
pub enum TradeoffFunction {
    /// `fp ↦ F(F⁻¹(1 − fp) − shift)` for a unit-scale noise distribution
    Shifted {
        noise: NoiseDistribution,
        shift: f64,
    },
    /// Any other curve, supplied as a thread-safe closure
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl TradeoffFunction {
    /// Trade-off curve of additive noise shifted by `shift`
    pub fn shifted(noise: NoiseDistribution, shift: f64) -> Self {
        TradeoffFunction::Shifted { noise, shift }
    }

    /// Gaussian-DP curve `Φ(Φ⁻¹(1 − fp) − μ)`
    pub fn gaussian(mu: f64) -> Self {
        TradeoffFunction::shifted(NoiseDistribution::Gaussian, mu)
    }

    /// Wrap an arbitrary curve
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        TradeoffFunction::Custom(Arc::new(f))
    }

    /// Evaluate the curve at a false-positive rate
    pub fn evaluate(&self, fp: f64) -> f64 {
        match self {
            TradeoffFunction::Shifted { noise, shift } => {
                noise.cdf(noise.quantile(1.0 - fp) - shift)
            }
            TradeoffFunction::Custom(f) => f(fp),
        }
    }
}

impl fmt::Debug for TradeoffFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeoffFunction::Shifted { noise, shift } => f
                .debug_struct("Shifted")
                .field("noise", noise)
                .field("shift", shift)
                .finish(),
            TradeoffFunction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
