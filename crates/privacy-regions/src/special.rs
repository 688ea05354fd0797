//! Numeric primitives
//!
//! Standard normal distribution, log-binomials and stable log-sum helpers used
//! by the composition theorems and the mechanism trade-off curves.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Standard normal CDF Φ(x)
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    0.5 * libm::erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal quantile Φ⁻¹(p)
///
/// Acklam's rational approximation refined with one Halley step against
/// `erfc`, which brings the relative error close to machine precision.
/// Returns ±∞ at p = 1 / p = 0 and NaN outside [0, 1].
pub fn normal_quantile(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549671010286750e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    let x = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    // Halley refinement
    let e = normal_cdf(x) - p;
    let u = e * (2.0 * PI).sqrt() * (x * x / 2.0).exp();
    let refined = x - u / (1.0 + x * u / 2.0);
    if refined.is_finite() {
        refined
    } else {
        x
    }
}

/// Natural log of the binomial coefficient C(n, k)
pub fn ln_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0 || k == n {
        return 0.0;
    }
    libm::lgamma(n as f64 + 1.0) - libm::lgamma(k as f64 + 1.0) - libm::lgamma((n - k) as f64 + 1.0)
}

/// `ln(1 + e^x)` without overflow for large x
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// `a · ln(b)` with the convention `0 · ln(0) = 0`, so that `b^a` with `a = 0` is 1
pub fn ln_pow(base: f64, exponent: u64) -> f64 {
    if exponent == 0 {
        0.0
    } else {
        exponent as f64 * base.ln()
    }
}

/// `e^x − e^y` for `x ≥ y`, scaled by `e^{−scale}`, computed as
/// `e^{x − scale}·(1 − e^{y − x})`
pub fn scaled_exp_difference(x: f64, y: f64, scale: f64) -> f64 {
    if x == y {
        return 0.0;
    }
    (x - scale).exp() * -(y - x).exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_cdf_reference_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
        assert!((normal_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-12);
        assert!((normal_cdf(-1.96) - 0.024_997_895_148_220_43).abs() < 1e-12);
        assert_eq!(normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(normal_cdf(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_normal_quantile_inverts_cdf() {
        for &p in &[1e-10, 1e-4, 0.01, 0.2, 0.5, 0.75, 0.975, 0.9999] {
            let x = normal_quantile(p);
            assert!(
                (normal_cdf(x) - p).abs() < 1e-12 * p.max(1e-3),
                "Φ(Φ⁻¹({})) = {}",
                p,
                normal_cdf(x)
            );
        }
        assert!((normal_quantile(0.975) - 1.959_963_984_540_054).abs() < 1e-9);
    }

    #[test]
    fn test_normal_quantile_edges() {
        assert_eq!(normal_quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(normal_quantile(1.0), f64::INFINITY);
        assert!(normal_quantile(1.5).is_nan());
        assert!(normal_quantile(-0.1).is_nan());
    }

    #[test]
    fn test_ln_binomial() {
        assert!((ln_binomial(5, 2) - 10f64.ln()).abs() < 1e-12);
        assert!((ln_binomial(10, 5) - 252f64.ln()).abs() < 1e-12);
        assert_eq!(ln_binomial(7, 0), 0.0);
        assert_eq!(ln_binomial(3, 4), f64::NEG_INFINITY);
        // Large arguments stay finite
        assert!(ln_binomial(10_000, 5_000).is_finite());
    }

    #[test]
    fn test_softplus_matches_naive_in_safe_range() {
        for &x in &[-20.0, -1.0, 0.0, 0.5, 3.0, 30.0] {
            let naive = (1.0 + f64::exp(x)).ln();
            assert!((softplus(x) - naive).abs() < 1e-12);
        }
        assert!((softplus(1000.0) - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_exp_difference() {
        let got = scaled_exp_difference(2.0, 1.0, 0.5);
        let expected = (2.0f64.exp() - 1.0f64.exp()) / 0.5f64.exp();
        assert!((got - expected).abs() < 1e-12);
        assert_eq!(scaled_exp_difference(3.0, 3.0, 0.0), 0.0);
    }
}
