//! Region catalog
//!
//! Registry of every region constructor as a (parameter schema, constructor)
//! pair. Front ends list the kinds, build parameter controls from the schema,
//! and turn parameter values into a serializable [`RegionSpec`].
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use privacy_regions::catalog::RegionKind;
//!
//! let kind: RegionKind = "dp_exact_composition".parse().unwrap();
//! let mut params = BTreeMap::new();
//! params.insert("k".to_string(), 3.0);
//!
//! let spec = kind.spec_with_defaults(&params).unwrap();
//! assert_eq!(spec.graph_label(), "DP exact comp. (ε: 0.60, δ: 0.10, k: 3)");
//! let region = spec.build().unwrap();
//! assert!(!region.is_empty());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algebra::{
    intersect_regions, region_from_dp_composition_basic, region_from_dp_composition_exact,
    region_from_dp_composition_exact_total_var, region_from_dp_composition_simplified,
    region_from_dp_params, region_from_dp_tv_params, region_from_gaussian_dp,
    region_from_gaussian_dp_composition,
};
use crate::error::{RegionError, Result};
use crate::mechanisms::{GaussianMechanism, LaplaceMechanism, Mechanism, RandomizedResponse};
use crate::region::Region;

/// Metadata for one numeric parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSchema {
    /// Key used in parameter maps and scene files
    pub key: &'static str,
    /// Human-readable name
    pub label: &'static str,
    /// Short symbol used in graph labels
    pub symbol: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    /// Only whole numbers are meaningful
    pub integer: bool,
    /// Controls should move on a logarithmic scale
    pub log_scale: bool,
}

impl ParamSchema {
    /// Check that `value` is usable for this parameter
    ///
    /// Counts must be whole numbers inside `min ..= max`; they size the
    /// parameter lists built from them. Real-valued limits are advisory for
    /// controls, and the constructors check the mathematical domain.
    pub fn check(&self, value: f64) -> Result<f64> {
        if !self.integer {
            return Ok(value);
        }
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(RegionError::InvalidParameter {
                name: self.key.to_string(),
                value,
                reason: "must be a whole number",
            });
        }
        if value < self.min || value > self.max {
            return Err(RegionError::InvalidParameter {
                name: self.key.to_string(),
                value,
                reason: "out of range",
            });
        }
        Ok(value)
    }

    fn format(&self, value: f64) -> String {
        if self.integer {
            format!("{}: {}", self.symbol, value as u64)
        } else {
            format!("{}: {:.2}", self.symbol, value)
        }
    }
}

const EPSILON: ParamSchema = ParamSchema {
    key: "epsilon",
    label: "Epsilon",
    symbol: "ε",
    default: 0.6,
    min: 0.001,
    max: 10.0,
    integer: false,
    log_scale: true,
};

const DELTA: ParamSchema = ParamSchema {
    key: "delta",
    label: "Delta",
    symbol: "δ",
    default: 0.1,
    min: 0.0,
    max: 1.0,
    integer: false,
    log_scale: false,
};

const GAUSSIAN_DELTA: ParamSchema = ParamSchema { min: 0.001, ..DELTA };

const K: ParamSchema = ParamSchema {
    key: "k",
    label: "Number of mechanisms",
    symbol: "k",
    default: 2.0,
    min: 1.0,
    max: 100.0,
    integer: true,
    log_scale: false,
};

const ETA: ParamSchema = ParamSchema {
    key: "eta",
    label: "Total variation",
    symbol: "η",
    default: 0.2,
    min: 0.0,
    max: 1.0,
    integer: false,
    log_scale: false,
};

const DELTA_SLACK: ParamSchema = ParamSchema {
    key: "delta_slack",
    label: "Delta slack",
    symbol: "δ'",
    default: 0.1,
    min: 0.001,
    max: 1.0,
    integer: false,
    log_scale: false,
};

const MU: ParamSchema = ParamSchema {
    key: "mu",
    label: "Mu",
    symbol: "μ",
    default: 1.0,
    min: 0.0,
    max: 10.0,
    integer: false,
    log_scale: false,
};

const SENSITIVITY: ParamSchema = ParamSchema {
    key: "sensitivity",
    label: "Sensitivity",
    symbol: "Δ",
    default: 1.0,
    min: 0.01,
    max: 20.0,
    integer: false,
    log_scale: false,
};

const ALPHABET_SIZE: ParamSchema = ParamSchema {
    key: "alphabet_size",
    label: "Alphabet size",
    symbol: "m",
    default: 5.0,
    min: 2.0,
    max: 100.0,
    integer: true,
    log_scale: false,
};

/// Every region constructor offered to front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Dp,
    DpTv,
    DpBasicComposition,
    DpExactComposition,
    DpSimplifiedComposition,
    DpTvComposition,
    GaussianDp,
    GaussianDpComposition,
    LaplaceExact,
    LaplaceTv,
    GaussianMechanismExact,
    GaussianMechanismTv,
    RandomizedResponse,
}

impl RegionKind {
    pub const ALL: [RegionKind; 13] = [
        RegionKind::Dp,
        RegionKind::DpTv,
        RegionKind::DpBasicComposition,
        RegionKind::DpExactComposition,
        RegionKind::DpSimplifiedComposition,
        RegionKind::DpTvComposition,
        RegionKind::GaussianDp,
        RegionKind::GaussianDpComposition,
        RegionKind::LaplaceExact,
        RegionKind::LaplaceTv,
        RegionKind::GaussianMechanismExact,
        RegionKind::GaussianMechanismTv,
        RegionKind::RandomizedResponse,
    ];

    /// Stable identifier, as used in scene files
    pub fn key(&self) -> &'static str {
        match self {
            RegionKind::Dp => "dp",
            RegionKind::DpTv => "dp_tv",
            RegionKind::DpBasicComposition => "dp_basic_composition",
            RegionKind::DpExactComposition => "dp_exact_composition",
            RegionKind::DpSimplifiedComposition => "dp_simplified_composition",
            RegionKind::DpTvComposition => "dp_tv_composition",
            RegionKind::GaussianDp => "gaussian_dp",
            RegionKind::GaussianDpComposition => "gaussian_dp_composition",
            RegionKind::LaplaceExact => "laplace_exact",
            RegionKind::LaplaceTv => "laplace_tv",
            RegionKind::GaussianMechanismExact => "gaussian_mechanism_exact",
            RegionKind::GaussianMechanismTv => "gaussian_mechanism_tv",
            RegionKind::RandomizedResponse => "randomized_response",
        }
    }

    /// Name shown when choosing a region to add
    pub fn display_name(&self) -> &'static str {
        match self {
            RegionKind::Dp => "DP region",
            RegionKind::DpTv => "DP region with total variation",
            RegionKind::DpBasicComposition => "DP basic composition region",
            RegionKind::DpExactComposition => "DP exact composition region",
            RegionKind::DpSimplifiedComposition => "DP simplified composition region",
            RegionKind::DpTvComposition => "DP exact composition region with total variation",
            RegionKind::GaussianDp => "Gaussian DP region",
            RegionKind::GaussianDpComposition => "Gaussian DP composition region",
            RegionKind::LaplaceExact => "Laplace mechanism region",
            RegionKind::LaplaceTv => "Laplace mechanism total variation region",
            RegionKind::GaussianMechanismExact => "Gaussian mechanism region",
            RegionKind::GaussianMechanismTv => "Gaussian mechanism total variation region",
            RegionKind::RandomizedResponse => "Randomized response region",
        }
    }

    /// Short name used in graph labels
    pub fn graph_name(&self) -> &'static str {
        match self {
            RegionKind::Dp => "DP",
            RegionKind::DpTv => "DP+TV",
            RegionKind::DpBasicComposition => "DP basic comp.",
            RegionKind::DpExactComposition => "DP exact comp.",
            RegionKind::DpSimplifiedComposition => "DP simplified comp.",
            RegionKind::DpTvComposition => "DP+TV exact comp.",
            RegionKind::GaussianDp => "GDP",
            RegionKind::GaussianDpComposition => "GDP comp.",
            RegionKind::LaplaceExact => "Laplace",
            RegionKind::LaplaceTv => "Laplace TV",
            RegionKind::GaussianMechanismExact => "Gaussian",
            RegionKind::GaussianMechanismTv => "Gaussian TV",
            RegionKind::RandomizedResponse => "Rand. response",
        }
    }

    /// Parameters in display order
    pub fn params(&self) -> &'static [ParamSchema] {
        match self {
            RegionKind::Dp => &[EPSILON, DELTA],
            RegionKind::DpTv => &[EPSILON, DELTA, ETA],
            RegionKind::DpBasicComposition | RegionKind::DpExactComposition => {
                &[EPSILON, DELTA, K]
            }
            RegionKind::DpSimplifiedComposition => &[EPSILON, DELTA, K, DELTA_SLACK],
            RegionKind::DpTvComposition => &[EPSILON, DELTA, ETA, K],
            RegionKind::GaussianDp => &[MU],
            RegionKind::GaussianDpComposition => &[MU, K],
            RegionKind::LaplaceExact | RegionKind::LaplaceTv => &[EPSILON, SENSITIVITY],
            RegionKind::GaussianMechanismExact | RegionKind::GaussianMechanismTv => {
                &[EPSILON, GAUSSIAN_DELTA, SENSITIVITY]
            }
            RegionKind::RandomizedResponse => &[EPSILON, ALPHABET_SIZE],
        }
    }

    /// Default value of every parameter
    pub fn defaults(&self) -> BTreeMap<String, f64> {
        self.params()
            .iter()
            .map(|p| (p.key.to_string(), p.default))
            .collect()
    }

    /// Build a spec from a complete parameter map
    pub fn spec(&self, params: &BTreeMap<String, f64>) -> Result<RegionSpec> {
        for key in params.keys() {
            if !self.params().iter().any(|p| p.key == key.as_str()) {
                return Err(RegionError::InvalidParameter {
                    name: key.clone(),
                    value: params[key],
                    reason: "not a parameter of this region kind",
                });
            }
        }
        let value = |schema: &ParamSchema| -> Result<f64> {
            let v = params
                .get(schema.key)
                .copied()
                .ok_or_else(|| RegionError::MissingParameter(schema.key.to_string()))?;
            schema.check(v)
        };

        let spec = match self {
            RegionKind::Dp => RegionSpec::Dp {
                epsilon: value(&EPSILON)?,
                delta: value(&DELTA)?,
            },
            RegionKind::DpTv => RegionSpec::DpTv {
                epsilon: value(&EPSILON)?,
                delta: value(&DELTA)?,
                eta: value(&ETA)?,
            },
            RegionKind::DpBasicComposition => RegionSpec::DpBasicComposition {
                epsilon: value(&EPSILON)?,
                delta: value(&DELTA)?,
                k: value(&K)? as u64,
            },
            RegionKind::DpExactComposition => RegionSpec::DpExactComposition {
                epsilon: value(&EPSILON)?,
                delta: value(&DELTA)?,
                k: value(&K)? as u64,
            },
            RegionKind::DpSimplifiedComposition => {
                let k = value(&K)? as usize;
                RegionSpec::DpSimplifiedComposition {
                    epsilons: vec![value(&EPSILON)?; k],
                    deltas: vec![value(&DELTA)?; k],
                    delta_slack: value(&DELTA_SLACK)?,
                }
            }
            RegionKind::DpTvComposition => RegionSpec::DpTvComposition {
                epsilon: value(&EPSILON)?,
                delta: value(&DELTA)?,
                eta: value(&ETA)?,
                k: value(&K)? as u64,
            },
            RegionKind::GaussianDp => RegionSpec::GaussianDp { mu: value(&MU)? },
            RegionKind::GaussianDpComposition => RegionSpec::GaussianDpComposition {
                mus: vec![value(&MU)?; value(&K)? as usize],
            },
            RegionKind::LaplaceExact => RegionSpec::LaplaceExact {
                epsilon: value(&EPSILON)?,
                sensitivity: value(&SENSITIVITY)?,
            },
            RegionKind::LaplaceTv => RegionSpec::LaplaceTv {
                epsilon: value(&EPSILON)?,
                sensitivity: value(&SENSITIVITY)?,
            },
            RegionKind::GaussianMechanismExact => RegionSpec::GaussianMechanismExact {
                epsilon: value(&EPSILON)?,
                delta: value(&GAUSSIAN_DELTA)?,
                sensitivity: value(&SENSITIVITY)?,
            },
            RegionKind::GaussianMechanismTv => RegionSpec::GaussianMechanismTv {
                epsilon: value(&EPSILON)?,
                delta: value(&GAUSSIAN_DELTA)?,
                sensitivity: value(&SENSITIVITY)?,
            },
            RegionKind::RandomizedResponse => RegionSpec::RandomizedResponse {
                epsilon: value(&EPSILON)?,
                alphabet_size: value(&ALPHABET_SIZE)? as usize,
            },
        };
        Ok(spec)
    }

    /// Build a spec, filling parameters that are not given with their defaults
    pub fn spec_with_defaults(&self, params: &BTreeMap<String, f64>) -> Result<RegionSpec> {
        let mut merged = self.defaults();
        for (key, value) in params {
            merged.insert(key.clone(), *value);
        }
        self.spec(&merged)
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RegionKind {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self> {
        RegionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| RegionError::UnknownKind(s.to_string()))
    }
}

/// Serializable description of a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionSpec {
    Dp {
        epsilon: f64,
        delta: f64,
    },
    DpTv {
        epsilon: f64,
        delta: f64,
        eta: f64,
    },
    DpBasicComposition {
        epsilon: f64,
        delta: f64,
        k: u64,
    },
    DpExactComposition {
        epsilon: f64,
        delta: f64,
        k: u64,
    },
    DpSimplifiedComposition {
        epsilons: Vec<f64>,
        deltas: Vec<f64>,
        delta_slack: f64,
    },
    DpTvComposition {
        epsilon: f64,
        delta: f64,
        eta: f64,
        k: u64,
    },
    GaussianDp {
        mu: f64,
    },
    GaussianDpComposition {
        mus: Vec<f64>,
    },
    LaplaceExact {
        epsilon: f64,
        sensitivity: f64,
    },
    LaplaceTv {
        epsilon: f64,
        sensitivity: f64,
    },
    GaussianMechanismExact {
        epsilon: f64,
        delta: f64,
        sensitivity: f64,
    },
    GaussianMechanismTv {
        epsilon: f64,
        delta: f64,
        sensitivity: f64,
    },
    RandomizedResponse {
        epsilon: f64,
        alphabet_size: usize,
    },
    Intersection {
        regions: Vec<RegionSpec>,
    },
}

impl RegionSpec {
    /// Catalog entry this spec was built from; `None` for intersections
    pub fn kind(&self) -> Option<RegionKind> {
        let kind = match self {
            RegionSpec::Dp { .. } => RegionKind::Dp,
            RegionSpec::DpTv { .. } => RegionKind::DpTv,
            RegionSpec::DpBasicComposition { .. } => RegionKind::DpBasicComposition,
            RegionSpec::DpExactComposition { .. } => RegionKind::DpExactComposition,
            RegionSpec::DpSimplifiedComposition { .. } => RegionKind::DpSimplifiedComposition,
            RegionSpec::DpTvComposition { .. } => RegionKind::DpTvComposition,
            RegionSpec::GaussianDp { .. } => RegionKind::GaussianDp,
            RegionSpec::GaussianDpComposition { .. } => RegionKind::GaussianDpComposition,
            RegionSpec::LaplaceExact { .. } => RegionKind::LaplaceExact,
            RegionSpec::LaplaceTv { .. } => RegionKind::LaplaceTv,
            RegionSpec::GaussianMechanismExact { .. } => RegionKind::GaussianMechanismExact,
            RegionSpec::GaussianMechanismTv { .. } => RegionKind::GaussianMechanismTv,
            RegionSpec::RandomizedResponse { .. } => RegionKind::RandomizedResponse,
            RegionSpec::Intersection { .. } => return None,
        };
        Some(kind)
    }

    /// Construct the region
    pub fn build(&self) -> Result<Region> {
        match self {
            RegionSpec::Dp { epsilon, delta } => region_from_dp_params(*epsilon, *delta),
            RegionSpec::DpTv {
                epsilon,
                delta,
                eta,
            } => region_from_dp_tv_params(*epsilon, *delta, *eta),
            RegionSpec::DpBasicComposition { epsilon, delta, k } => {
                region_from_dp_composition_basic(*epsilon, *delta, *k)
            }
            RegionSpec::DpExactComposition { epsilon, delta, k } => {
                region_from_dp_composition_exact(*epsilon, *delta, *k)
            }
            RegionSpec::DpSimplifiedComposition {
                epsilons,
                deltas,
                delta_slack,
            } => region_from_dp_composition_simplified(epsilons, deltas, *delta_slack),
            RegionSpec::DpTvComposition {
                epsilon,
                delta,
                eta,
                k,
            } => region_from_dp_composition_exact_total_var(*epsilon, *delta, *eta, *k),
            RegionSpec::GaussianDp { mu } => region_from_gaussian_dp(*mu),
            RegionSpec::GaussianDpComposition { mus } => region_from_gaussian_dp_composition(mus),
            RegionSpec::LaplaceExact {
                epsilon,
                sensitivity,
            } => Ok(LaplaceMechanism::new(*epsilon, *sensitivity)?.region_exact()),
            RegionSpec::LaplaceTv {
                epsilon,
                sensitivity,
            } => Ok(LaplaceMechanism::new(*epsilon, *sensitivity)?.region_tv()),
            RegionSpec::GaussianMechanismExact {
                epsilon,
                delta,
                sensitivity,
            } => Ok(GaussianMechanism::new(*epsilon, *delta, *sensitivity)?.region_exact()),
            RegionSpec::GaussianMechanismTv {
                epsilon,
                delta,
                sensitivity,
            } => Ok(GaussianMechanism::new(*epsilon, *delta, *sensitivity)?.region_tv()),
            RegionSpec::RandomizedResponse {
                epsilon,
                alphabet_size,
            } => Ok(RandomizedResponse::new(*epsilon, *alphabet_size)?.region_exact()),
            RegionSpec::Intersection { regions } => {
                if regions.is_empty() {
                    return Err(RegionError::EmptyRegion);
                }
                let built = regions
                    .iter()
                    .map(RegionSpec::build)
                    .collect::<Result<Vec<_>>>()?;
                Ok(intersect_regions(&built))
            }
        }
    }

    /// Label for legends, e.g. `DP (ε: 0.60, δ: 0.10)`
    pub fn graph_label(&self) -> String {
        let (kind, values): (RegionKind, Vec<String>) = match self {
            RegionSpec::Dp { epsilon, delta } => {
                (RegionKind::Dp, vec![EPSILON.format(*epsilon), DELTA.format(*delta)])
            }
            RegionSpec::DpTv {
                epsilon,
                delta,
                eta,
            } => (
                RegionKind::DpTv,
                vec![EPSILON.format(*epsilon), DELTA.format(*delta), ETA.format(*eta)],
            ),
            RegionSpec::DpBasicComposition { epsilon, delta, k } => (
                RegionKind::DpBasicComposition,
                vec![EPSILON.format(*epsilon), DELTA.format(*delta), K.format(*k as f64)],
            ),
            RegionSpec::DpExactComposition { epsilon, delta, k } => (
                RegionKind::DpExactComposition,
                vec![EPSILON.format(*epsilon), DELTA.format(*delta), K.format(*k as f64)],
            ),
            RegionSpec::DpSimplifiedComposition {
                epsilons,
                delta_slack,
                ..
            } => (
                RegionKind::DpSimplifiedComposition,
                vec![
                    K.format(epsilons.len() as f64),
                    DELTA_SLACK.format(*delta_slack),
                ],
            ),
            RegionSpec::DpTvComposition {
                epsilon,
                delta,
                eta,
                k,
            } => (
                RegionKind::DpTvComposition,
                vec![
                    EPSILON.format(*epsilon),
                    DELTA.format(*delta),
                    ETA.format(*eta),
                    K.format(*k as f64),
                ],
            ),
            RegionSpec::GaussianDp { mu } => (RegionKind::GaussianDp, vec![MU.format(*mu)]),
            RegionSpec::GaussianDpComposition { mus } => (
                RegionKind::GaussianDpComposition,
                vec![K.format(mus.len() as f64)],
            ),
            RegionSpec::LaplaceExact {
                epsilon,
                sensitivity,
            }
            | RegionSpec::LaplaceTv {
                epsilon,
                sensitivity,
            } => (
                self.kind().unwrap_or(RegionKind::LaplaceExact),
                vec![EPSILON.format(*epsilon), SENSITIVITY.format(*sensitivity)],
            ),
            RegionSpec::GaussianMechanismExact {
                epsilon,
                delta,
                sensitivity,
            }
            | RegionSpec::GaussianMechanismTv {
                epsilon,
                delta,
                sensitivity,
            } => (
                self.kind().unwrap_or(RegionKind::GaussianMechanismExact),
                vec![
                    EPSILON.format(*epsilon),
                    DELTA.format(*delta),
                    SENSITIVITY.format(*sensitivity),
                ],
            ),
            RegionSpec::RandomizedResponse {
                epsilon,
                alphabet_size,
            } => (
                RegionKind::RandomizedResponse,
                vec![
                    EPSILON.format(*epsilon),
                    ALPHABET_SIZE.format(*alphabet_size as f64),
                ],
            ),
            RegionSpec::Intersection { regions } => {
                return regions
                    .iter()
                    .map(RegionSpec::graph_label)
                    .collect::<Vec<_>>()
                    .join(" ∩ ");
            }
        };
        format!("{} ({})", kind.graph_name(), values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_builds_from_defaults() {
        for kind in RegionKind::ALL {
            let spec = kind.spec(&kind.defaults()).unwrap();
            assert_eq!(spec.kind(), Some(kind));
            let region = spec.build().unwrap_or_else(|e| panic!("{}: {}", kind, e));
            assert!(!region.is_empty());
        }
    }

    #[test]
    fn test_kind_keys_round_trip() {
        for kind in RegionKind::ALL {
            assert_eq!(kind.key().parse::<RegionKind>().unwrap(), kind);
        }
        assert_eq!(
            "nope".parse::<RegionKind>().unwrap_err(),
            RegionError::UnknownKind("nope".to_string())
        );
    }

    #[test]
    fn test_graph_label() {
        let spec = RegionSpec::Dp {
            epsilon: 0.6,
            delta: 0.1,
        };
        assert_eq!(spec.graph_label(), "DP (ε: 0.60, δ: 0.10)");

        let both = RegionSpec::Intersection {
            regions: vec![spec.clone(), RegionSpec::GaussianDp { mu: 1.0 }],
        };
        assert_eq!(both.graph_label(), "DP (ε: 0.60, δ: 0.10) ∩ GDP (μ: 1.00)");
    }

    #[test]
    fn test_spec_parameter_errors() {
        let mut params = BTreeMap::new();
        params.insert("epsilon".to_string(), 1.0);
        assert_eq!(
            RegionKind::Dp.spec(&params).unwrap_err(),
            RegionError::MissingParameter("delta".to_string())
        );

        params.insert("bogus".to_string(), 1.0);
        assert!(matches!(
            RegionKind::Dp.spec_with_defaults(&params).unwrap_err(),
            RegionError::InvalidParameter { .. }
        ));

        let mut fractional = BTreeMap::new();
        fractional.insert("k".to_string(), 2.5);
        assert!(RegionKind::DpExactComposition
            .spec_with_defaults(&fractional)
            .is_err());
    }

    #[test]
    fn test_counts_outside_range_rejected() {
        for kind in [
            RegionKind::DpExactComposition,
            RegionKind::DpSimplifiedComposition,
            RegionKind::GaussianDpComposition,
        ] {
            for k in [0.0, 101.0, 1e30] {
                let mut params = BTreeMap::new();
                params.insert("k".to_string(), k);
                let err = kind.spec_with_defaults(&params).unwrap_err();
                assert!(
                    matches!(err, RegionError::InvalidParameter { ref name, .. } if name == "k"),
                    "{kind:?} k={k}: {err:?}"
                );
            }
        }

        let mut params = BTreeMap::new();
        params.insert("alphabet_size".to_string(), 1.0);
        assert!(RegionKind::RandomizedResponse
            .spec_with_defaults(&params)
            .is_err());

        // real-valued limits stay advisory
        assert_eq!(EPSILON.check(50.0), Ok(50.0));
        assert_eq!(K.check(100.0), Ok(100.0));
    }

    #[test]
    fn test_spec_serde_tagged() {
        let spec = RegionSpec::DpExactComposition {
            epsilon: 0.3,
            delta: 0.05,
            k: 4,
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "dp_exact_composition");
        assert_eq!(json["k"], 4);
        let parsed: RegionSpec = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_empty_intersection_spec_rejected() {
        let spec = RegionSpec::Intersection { regions: vec![] };
        assert_eq!(spec.build().unwrap_err(), RegionError::EmptyRegion);
    }
}
