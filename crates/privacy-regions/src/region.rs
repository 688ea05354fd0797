//! Constraints and regions
//!
//! A [`Region`] is a conjunction of [`Constraint`]s over the (FP, FN) unit
//! square. Constraints are small tagged values evaluated by a dispatcher, so
//! they carry no captured state and are safe to evaluate from many threads.

use crate::error::{RegionError, Result};
use crate::tradeoff::TradeoffFunction;

/// A single feasibility condition on a (false-positive, false-negative) pair
#[derive(Debug, Clone)]
pub enum Constraint {
    /// `fp_weight·fp + fn_weight·fn ≥ bound`
    HalfPlane {
        fp_weight: f64,
        fn_weight: f64,
        bound: f64,
    },
    /// `fp + fn ≤ 1`: the probability simplex
    Simplex,
    /// `fn ≥ f(fp)`: on or above a trade-off curve
    AboveTradeoff(TradeoffFunction),
}

impl Constraint {
    /// `fp_weight·fp + fn_weight·fn ≥ bound`
    pub fn half_plane(fp_weight: f64, fn_weight: f64, bound: f64) -> Self {
        Constraint::HalfPlane {
            fp_weight,
            fn_weight,
            bound,
        }
    }

    /// The simplex bound `fp + fn ≤ 1`
    pub fn simplex() -> Self {
        Constraint::Simplex
    }

    /// On or above the given trade-off curve
    pub fn above(tradeoff: TradeoffFunction) -> Self {
        Constraint::AboveTradeoff(tradeoff)
    }

    /// Whether this is the simplex bound (dropped in outline rendering)
    pub fn is_simplex(&self) -> bool {
        matches!(self, Constraint::Simplex)
    }

    /// Evaluate at a single point
    #[inline]
    pub fn holds(&self, fp: f64, fn_: f64) -> bool {
        match self {
            Constraint::HalfPlane {
                fp_weight,
                fn_weight,
                bound,
            } => weighted(*fp_weight, fp) + weighted(*fn_weight, fn_) >= *bound,
            Constraint::Simplex => fp + fn_ <= 1.0,
            Constraint::AboveTradeoff(f) => fn_ >= f.evaluate(fp),
        }
    }

    /// Evaluate over two same-shaped coordinate arrays
    pub fn evaluate(&self, fp: &[f64], fn_: &[f64]) -> Vec<bool> {
        debug_assert_eq!(fp.len(), fn_.len(), "Coordinate grids must have same shape");
        fp.iter()
            .zip(fn_.iter())
            .map(|(&x, &y)| self.holds(x, y))
            .collect()
    }
}

// e^ε overflows to ∞ for large ε; a zero coordinate must still contribute 0.
#[inline]
fn weighted(weight: f64, value: f64) -> f64 {
    if value == 0.0 || weight == 0.0 {
        0.0
    } else {
        weight * value
    }
}

/// An immutable conjunction of constraints
#[derive(Debug, Clone, Default)]
pub struct Region {
    constraints: Vec<Constraint>,
}

impl Region {
    /// Build a region from at least one constraint
    pub fn new(constraints: Vec<Constraint>) -> Result<Self> {
        if constraints.is_empty() {
            return Err(RegionError::EmptyRegion);
        }
        Ok(Region { constraints })
    }

    // Constructors in this crate always supply at least one constraint
    pub(crate) fn from_constraints(constraints: Vec<Constraint>) -> Self {
        debug_assert!(!constraints.is_empty());
        Region { constraints }
    }

    /// The constraints, in construction order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of constraints
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// True only for the intersection of zero regions
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Whether a point satisfies every constraint
    pub fn contains(&self, fp: f64, fn_: f64) -> bool {
        self.constraints.iter().all(|c| c.holds(fp, fn_))
    }

    /// Intersect with another region
    pub fn intersect(&self, other: &Region) -> Region {
        intersect_regions(&[self.clone(), other.clone()])
    }
}

/// Intersect regions by concatenating their constraints
///
/// Intersecting zero regions yields the empty region. That value is only a
/// placeholder: rasterizing it is a usage error.
pub fn intersect_regions(regions: &[Region]) -> Region {
    let constraints = regions
        .iter()
        .flat_map(|r| r.constraints.iter().cloned())
        .collect();
    Region { constraints }
}
