//! Input Validation for Privacy Parameters
//!
//! Every region constructor and mechanism checks its parameters here before
//! doing any work. Out-of-range values are rejected, never clamped.
//!
//! # Parameter Constraints
//!
//! ## Epsilon (ε)
//! - Must be finite and non-negative
//! - ε = 0 is allowed: it describes a perfectly private (useless) mechanism
//!
//! ## Delta (δ)
//! - Must lie in [0, 1]
//! - δ = 1 places no constraint at all beyond the probability simplex
//!
//! ## Sensitivity (Δf)
//! - Must be finite and positive

use crate::error::{RegionError, Result};

/// Validate epsilon parameter
///
/// # Constraints
/// - Must be finite
/// - Must be non-negative
pub fn validate_epsilon(epsilon: f64) -> Result<()> {
    if !epsilon.is_finite() {
        return Err(RegionError::InvalidEpsilon {
            value: epsilon,
            reason: "epsilon must be a finite number",
        });
    }

    if epsilon < 0.0 {
        return Err(RegionError::InvalidEpsilon {
            value: epsilon,
            reason: "epsilon must be non-negative",
        });
    }

    Ok(())
}

/// Validate epsilon for mechanisms that divide by it
pub fn validate_positive_epsilon(epsilon: f64) -> Result<()> {
    validate_epsilon(epsilon)?;
    if epsilon == 0.0 {
        return Err(RegionError::InvalidEpsilon {
            value: epsilon,
            reason: "mechanism noise is unbounded at epsilon = 0",
        });
    }
    Ok(())
}

/// Validate delta parameter
///
/// # Constraints
/// - Must be finite
/// - Must be in [0, 1]
pub fn validate_delta(delta: f64) -> Result<()> {
    if !delta.is_finite() {
        return Err(RegionError::InvalidDelta {
            value: delta,
            reason: "delta must be a finite number",
        });
    }

    if delta < 0.0 {
        return Err(RegionError::InvalidDelta {
            value: delta,
            reason: "delta must be non-negative",
        });
    }

    if delta > 1.0 {
        return Err(RegionError::InvalidDelta {
            value: delta,
            reason: "delta must not exceed 1",
        });
    }

    Ok(())
}

/// Validate delta for the Gaussian mechanism calibration, which takes `ln(1/δ)`
pub fn validate_gaussian_delta(delta: f64) -> Result<()> {
    validate_delta(delta)?;
    if delta == 0.0 {
        return Err(RegionError::InvalidDelta {
            value: delta,
            reason: "the Gaussian mechanism needs delta > 0",
        });
    }
    Ok(())
}

/// Validate a total-variation bound, which must lie in [0, 1]
pub fn validate_total_variation(eta: f64) -> Result<()> {
    if !eta.is_finite() || !(0.0..=1.0).contains(&eta) {
        return Err(RegionError::InvalidTotalVariation {
            value: eta,
            lower: 0.0,
            upper: 1.0,
        });
    }
    Ok(())
}

/// Validate a Gaussian-DP parameter
pub fn validate_mu(mu: f64) -> Result<()> {
    if !mu.is_finite() || mu < 0.0 {
        return Err(RegionError::InvalidMu { value: mu });
    }
    Ok(())
}

/// Validate the extra delta slack of the simplified composition theorem
pub fn validate_slack(delta_slack: f64) -> Result<()> {
    if !delta_slack.is_finite() || delta_slack <= 0.0 || delta_slack > 1.0 {
        return Err(RegionError::InvalidSlack { value: delta_slack });
    }
    Ok(())
}

/// Validate sensitivity parameter
///
/// # Constraints
/// - Must be positive (> 0)
/// - Must be finite
pub fn validate_sensitivity(sensitivity: f64) -> Result<()> {
    if !sensitivity.is_finite() || sensitivity <= 0.0 {
        return Err(RegionError::InvalidSensitivity { value: sensitivity });
    }
    Ok(())
}

/// Validate the alphabet size of randomized response and the median query
pub fn validate_alphabet_size(alphabet_size: usize) -> Result<()> {
    if alphabet_size < 2 {
        return Err(RegionError::InvalidAlphabetSize {
            value: alphabet_size,
        });
    }
    Ok(())
}

/// Validate all (ε, δ) parameters together
pub fn validate_dp_parameters(epsilon: f64, delta: f64) -> Result<()> {
    validate_epsilon(epsilon)?;
    validate_delta(delta)?;
    Ok(())
}
