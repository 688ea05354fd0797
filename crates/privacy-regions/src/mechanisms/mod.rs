//! Mechanism models
//!
//! Randomization mechanisms expose a trade-off function and a total-variation
//! bound, from which they derive two privacy regions:
//!
//! - `region_exact()`: the f-DP region of the mechanism's own trade-off curve
//! - `region_tv()`: the (ε, δ)-DP region tightened by its total variation
//!
//! Additive-noise mechanisms (Laplace, Gaussian) share the
//! [`AdditiveMechanism`] capability set, whose trade-off curve is
//! `fp ↦ F(F⁻¹(1 − fp) − shift)` for the unit-scale noise distribution `F`.
//!
//! # Randomness
//!
//! `apply` takes an optional seed. `Some(seed)` gives a reproducible
//! `ChaCha20Rng` stream; `None` seeds from OS entropy.

mod exponential;
mod gaussian;
mod laplace;
mod randomized_response;

pub use exponential::ExponentialMedian;
pub use gaussian::GaussianMechanism;
pub use laplace::LaplaceMechanism;
pub use randomized_response::RandomizedResponse;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::algebra::{dp_tv_region_unchecked, region_from_f_dp};
use crate::region::Region;
use crate::tradeoff::{NoiseDistribution, TradeoffFunction};

/// Capabilities shared by every mechanism
pub trait Mechanism {
    /// Privacy parameter ε
    fn epsilon(&self) -> f64;

    /// Privacy parameter δ (0 for pure DP mechanisms)
    fn delta(&self) -> f64;

    /// Closed-form upper bound on the total variation distance
    fn tv(&self) -> f64;

    /// Region induced by the mechanism's exact trade-off function
    fn region_exact(&self) -> Region;

    /// (ε, δ)-DP region intersected with `fp + fn ≥ 1 − tv`
    fn region_tv(&self) -> Region {
        dp_tv_region_unchecked(self.epsilon(), self.delta(), self.tv())
    }
}

/// Mechanisms of the form `M(x) = f(x) + noise_scale · N` with `N` unit-scale
pub trait AdditiveMechanism: Mechanism {
    /// Unit-scale noise distribution
    fn distribution(&self) -> NoiseDistribution;

    /// Displacement between the two hypotheses in unit-scale noise units
    fn shift(&self) -> f64;

    /// Scale parameter of the injected noise
    fn noise_scale(&self) -> f64;

    /// Quantile of the unit-scale noise
    fn quantile(&self, p: f64) -> f64 {
        self.distribution().quantile(p)
    }

    /// CDF of the unit-scale noise
    fn cdf(&self, x: f64) -> f64 {
        self.distribution().cdf(x)
    }

    /// Trade-off curve `fp ↦ cdf(quantile(1 − fp) − shift)`
    fn tradeoff_function(&self) -> TradeoffFunction {
        TradeoffFunction::shifted(self.distribution(), self.shift())
    }

    /// Variance of the injected noise; the mean squared error of the release
    fn variance(&self) -> f64 {
        self.distribution().unit_variance() * self.noise_scale().powi(2)
    }

    /// Draw one noise sample
    fn sample_noise<R: Rng + ?Sized>(&self, rng: &mut R) -> f64
    where
        Self: Sized,
    {
        self.noise_scale() * self.distribution().quantile(open_unit(rng))
    }

    /// Privatize a single value
    fn apply(&self, value: f64, seed: Option<u64>) -> f64
    where
        Self: Sized,
    {
        let mut rng = rng_from_seed(seed);
        value + self.sample_noise(&mut rng)
    }

    /// Privatize every value independently from one random stream
    fn apply_all(&self, values: &[f64], seed: Option<u64>) -> Vec<f64>
    where
        Self: Sized,
    {
        let mut rng = rng_from_seed(seed);
        values
            .iter()
            .map(|v| v + self.sample_noise(&mut rng))
            .collect()
    }
}

/// f-DP region of an additive mechanism
pub(crate) fn additive_region_exact<M: AdditiveMechanism + ?Sized>(mechanism: &M) -> Region {
    region_from_f_dp(mechanism.tradeoff_function())
}

/// Reproducible stream for `Some(seed)`, OS entropy otherwise
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => ChaCha20Rng::from_entropy(),
    }
}

// Uniform on (0, 1): quantiles are infinite at 0
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u > 0.0 {
            return u;
        }
    }
}
