//! Region algebra
//!
//! Pure constructors from privacy parameters to [`Region`]s, including the
//! composition theorems. Every constructor validates its parameters first and
//! fails with a domain error instead of clamping.
//!
//! Composition sums are evaluated in log space: a binomial-weighted difference
//! of exponentials `C(n, l)·(e^x − e^y)/(1 + e^ε)^n` becomes
//! `e^{x − s}(1 − e^{y − x})` with `s = n·ln(1 + e^ε) − ln C(n, l)`, which
//! saturates toward 0 or 1 instead of overflowing for large `k` or `ε`.

use tracing::trace;

use crate::error::{RegionError, Result};
pub use crate::region::intersect_regions;

use crate::region::{Constraint, Region};
use crate::special::{ln_binomial, ln_pow, scaled_exp_difference, softplus};
use crate::tradeoff::TradeoffFunction;
use crate::validation::{
    validate_dp_parameters, validate_mu, validate_slack, validate_total_variation,
};

/// (ε, δ)-DP region with the half-plane bound given directly as `1 − δ`
///
/// Composition theorems produce `1 − δ'` as a product, so handing it over
/// without the round trip through `δ'` keeps the k = 1 cases bit-exact.
fn dp_region_with_bound(eps: f64, bound: f64) -> Region {
    let exp_eps = eps.exp();
    Region::from_constraints(vec![
        Constraint::half_plane(1.0, exp_eps, bound),
        Constraint::half_plane(exp_eps, 1.0, bound),
        Constraint::simplex(),
    ])
}

// Callers have already validated (ε, δ)
pub(crate) fn dp_region_unchecked(eps: f64, delta: f64) -> Region {
    dp_region_with_bound(eps, 1.0 - delta)
}

pub(crate) fn dp_tv_region_unchecked(eps: f64, delta: f64, eta: f64) -> Region {
    let tv = Region::from_constraints(vec![Constraint::half_plane(1.0, 1.0, 1.0 - eta)]);
    intersect_regions(&[dp_region_unchecked(eps, delta), tv])
}

/// Region of (ε, δ)-differential privacy
///
/// `fp + e^ε·fn ≥ 1 − δ`, its mirror `fn + e^ε·fp ≥ 1 − δ`, and `fp + fn ≤ 1`.
pub fn region_from_dp_params(eps: f64, delta: f64) -> Result<Region> {
    validate_dp_parameters(eps, delta)?;
    Ok(dp_region_unchecked(eps, delta))
}

/// DP region further restricted by a total-variation bound `fp + fn ≥ 1 − η`
pub fn region_from_dp_tv_params(eps: f64, delta: f64, eta: f64) -> Result<Region> {
    validate_dp_parameters(eps, delta)?;
    validate_total_variation(eta)?;
    Ok(dp_tv_region_unchecked(eps, delta, eta))
}

/// Basic composition of `k` (ε, δ)-DP mechanisms: `(k·ε, min(1, k·δ))`
pub fn region_from_dp_composition_basic(eps: f64, delta: f64, k: u64) -> Result<Region> {
    validate_dp_parameters(eps, delta)?;
    let k = k as f64;
    let composed_delta = (k * delta).min(1.0);
    Ok(dp_region_with_bound(k * eps, 1.0 - composed_delta))
}

/// Exact composition of `k` identical (ε, δ)-DP mechanisms
///
/// Intersects the DP regions `(ε_i, δ_i)` for `i = 0 ..= ⌊k/2⌋` with
/// `ε_i = (k − 2i)·ε` and
/// `1 − δ_i = (1 − δ)^k · (1 − Σ_{l<i} C(k,l)(e^{(k−l)ε} − e^{(k−2i+l)ε}) / (1 + e^ε)^k)`.
pub fn region_from_dp_composition_exact(eps: f64, delta: f64, k: u64) -> Result<Region> {
    validate_dp_parameters(eps, delta)?;

    let kf = k as f64;
    let retained = (1.0 - delta).powf(kf);
    let ln_normalizer = kf * softplus(eps);

    // Grown one sub-region at a time; k comes from user input and may be huge
    let mut regions = Vec::new();
    for i in 0..=k / 2 {
        let eps_i = (k - 2 * i) as f64 * eps;
        let tail: f64 = (0..i)
            .map(|l| {
                let scale = ln_normalizer - ln_binomial(k, l);
                scaled_exp_difference(
                    (k - l) as f64 * eps,
                    (k - 2 * i + l) as f64 * eps,
                    scale,
                )
            })
            .sum();
        regions.push(dp_region_with_bound(eps_i, retained * (1.0 - tail.min(1.0))));
    }

    trace!(k, sub_regions = regions.len(), "exact composition");
    Ok(intersect_regions(&regions))
}

/// Simplified composition of heterogeneous (ε_i, δ_i)-DP mechanisms
///
/// `δ = 1 − (1 − δ_slack)·Π(1 − δ_i)` and `ε` is the smallest of the naive sum
/// and the two concentration bounds.
pub fn region_from_dp_composition_simplified(
    eps_list: &[f64],
    delta_list: &[f64],
    delta_slack: f64,
) -> Result<Region> {
    let (eps, delta) = dp_composition_simplified_params(eps_list, delta_list, delta_slack)?;
    region_from_dp_params(eps, delta)
}

/// Composed `(ε, δ)` of the simplified composition theorem
pub fn dp_composition_simplified_params(
    eps_list: &[f64],
    delta_list: &[f64],
    delta_slack: f64,
) -> Result<(f64, f64)> {
    if eps_list.len() != delta_list.len() {
        return Err(RegionError::LengthMismatch {
            epsilons: eps_list.len(),
            deltas: delta_list.len(),
        });
    }
    for (&eps, &delta) in eps_list.iter().zip(delta_list) {
        validate_dp_parameters(eps, delta)?;
    }
    validate_slack(delta_slack)?;

    let sum_eps: f64 = eps_list.iter().sum();
    let sum_eps_sq: f64 = eps_list.iter().map(|e| e * e).sum();
    // (e^ε − 1)/(e^ε + 1) = tanh(ε/2), finite for any ε
    let expected_loss: f64 = eps_list.iter().map(|&e| e * (e / 2.0).tanh()).sum();

    let delta = 1.0 - (1.0 - delta_slack) * delta_list.iter().map(|d| 1.0 - d).product::<f64>();

    let opt_naive = sum_eps;
    let opt_slack = expected_loss + (-2.0 * delta_slack.ln() * sum_eps_sq).sqrt();
    let opt_log = expected_loss
        + (2.0 * (std::f64::consts::E + sum_eps_sq.sqrt() / delta_slack).ln() * sum_eps_sq).sqrt();

    Ok((opt_naive.min(opt_slack).min(opt_log), delta))
}

/// Exact composition region together with a bound on the composed total variation
#[derive(Debug, Clone)]
pub struct TotalVariationComposition {
    /// Intersection of the `k + 1` sub-regions
    pub region: Region,
    /// Upper bound on the total variation of the composed mechanism
    pub total_variation: f64,
}

/// Interval of total-variation values compatible with (ε, δ)-DP
pub fn total_variation_bounds(eps: f64, delta: f64) -> Result<(f64, f64)> {
    validate_dp_parameters(eps, delta)?;
    Ok((delta, delta + (1.0 - delta) * (eps / 2.0).tanh()))
}

const TOTAL_VARIATION_SLACK_ULPS: f64 = 8.0;

/// Exact composition of `k` (ε, δ)-DP mechanisms that also have total variation `η`
pub fn region_from_dp_composition_exact_total_var(
    eps: f64,
    delta: f64,
    eta: f64,
    k: u64,
) -> Result<Region> {
    Ok(dp_composition_exact_total_var(eps, delta, eta, k)?.region)
}

/// Exact total-variation-aware composition
///
/// Requires `δ ≤ η ≤ δ + (e^ε − 1)(1 − δ)/(e^ε + 1)`. With
/// `α = 1 − (η − δ)(1 + e^ε)/((1 − δ)(e^ε − 1))`, the sub-region `j = 0 ..= k`
/// has `ε_j = j·ε` and
///
/// `1 − δ_j = (1 − δ)^k (1 − Σ_{a<k−j} C(k,a) α^a Σ_{l<⌈(k−j−a)/2⌉} C(k−a,l)
/// ((1 − α)/(1 + e^ε))^{k−a} (e^{(k−l−a)ε} − e^{(l+j)ε}))`.
///
/// `δ_0` bounds the total variation of the composition. At the upper end of
/// the `η` interval (`α = 0`) the even-parity sub-regions coincide with
/// [`region_from_dp_composition_exact`].
pub fn dp_composition_exact_total_var(
    eps: f64,
    delta: f64,
    eta: f64,
    k: u64,
) -> Result<TotalVariationComposition> {
    let (lower, upper) = total_variation_bounds(eps, delta)?;
    // The (e^ε − 1)/(e^ε + 1) form of the upper end rounds differently from
    // tanh(ε/2); accept values a few ulps outside and snap them back in
    let slack = TOTAL_VARIATION_SLACK_ULPS * f64::EPSILON * (1.0 + upper);
    if !eta.is_finite() || eta < lower - slack || eta > upper + slack {
        return Err(RegionError::InvalidTotalVariation {
            value: eta,
            lower,
            upper,
        });
    }
    let eta = eta.clamp(lower, upper);

    // η = δ forces α = 1; this also covers ε = 0 and δ = 1 where the ratio is 0/0
    let alpha = if eta == delta {
        1.0
    } else {
        (1.0 - (eta - delta) / ((1.0 - delta) * (eps / 2.0).tanh())).clamp(0.0, 1.0)
    };

    let kf = k as f64;
    let retained = (1.0 - delta).powf(kf);
    let ln_one_minus_alpha = (1.0 - alpha).ln();
    let ln_spread = softplus(eps);

    let mut regions = Vec::new();
    let mut total_variation = 1.0;
    let mut terms = 0usize;

    for j in 0..=k {
        let mut tail = 0.0;
        for a in 0..k - j {
            let n = k - a;
            let ln_weight = ln_binomial(k, a) + ln_pow(alpha, a)
                + if n == 0 { 0.0 } else { n as f64 * (ln_one_minus_alpha - ln_spread) };
            // l < ⌈(k − j − a)/2⌉
            let l_end = (k - j - a + 1) / 2;
            for l in 0..l_end {
                let scale = -(ln_weight + ln_binomial(n, l));
                tail += scaled_exp_difference(
                    (k - l - a) as f64 * eps,
                    (l + j) as f64 * eps,
                    scale,
                );
                terms += 1;
            }
        }

        let bound = retained * (1.0 - tail.min(1.0));
        if j == 0 {
            total_variation = 1.0 - bound;
        }
        regions.push(dp_region_with_bound(j as f64 * eps, bound));
    }

    trace!(k, alpha, terms, "total variation composition");
    Ok(TotalVariationComposition {
        region: intersect_regions(&regions),
        total_variation,
    })
}

/// f-DP region: on or above the trade-off curve and inside the simplex
pub fn region_from_f_dp(f: TradeoffFunction) -> Region {
    Region::from_constraints(vec![Constraint::simplex(), Constraint::above(f)])
}

/// μ-Gaussian-DP region, above `fp ↦ Φ(Φ⁻¹(1 − fp) − μ)`
pub fn region_from_gaussian_dp(mu: f64) -> Result<Region> {
    validate_mu(mu)?;
    Ok(region_from_f_dp(TradeoffFunction::gaussian(mu)))
}

/// Composition of Gaussian-DP mechanisms: `μ = ‖μ_list‖₂`
pub fn region_from_gaussian_dp_composition(mu_list: &[f64]) -> Result<Region> {
    for &mu in mu_list {
        validate_mu(mu)?;
    }
    let mu = mu_list.iter().map(|m| m * m).sum::<f64>().sqrt();
    region_from_gaussian_dp(mu)
}
