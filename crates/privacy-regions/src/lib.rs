//! Privacy Regions - Differential Privacy Feasibility Sets
//!
//! Turns privacy guarantees into regions of the (false-positive,
//! false-negative) plane, rasterizes them on a grid and composites several
//! regions into one layered image.
//!
//! # Features
//!
//! - (ε, δ)-DP, total-variation, f-DP and Gaussian-DP regions
//! - Basic, exact, simplified and total-variation-aware composition theorems
//! - Laplace, Gaussian, randomized-response and exponential mechanisms
//! - Grid rasterization with an optional boundary-outline mode
//! - Containment-ordered compositing with a colour-blind-safe palette
//!
//! # Example
//!
//! ```rust
//! use privacy_regions::{
//!     region_from_dp_composition_exact, region_from_dp_params, Compositor, GridConfig,
//! };
//!
//! let mut compositor = Compositor::new(GridConfig::default().with_resolution(100)).unwrap();
//! let single = compositor.add(region_from_dp_params(0.5, 0.05).unwrap(), "single").unwrap();
//! compositor
//!     .add(region_from_dp_composition_exact(0.5, 0.05, 4).unwrap(), "4-fold")
//!     .unwrap();
//!
//! let rendering = compositor.render("Composition", None, true).unwrap();
//! // The single mechanism's region lies inside the composed one and is drawn on top
//! assert_eq!(rendering.layers[0].id, single);
//! ```

pub mod algebra;
pub mod catalog;
pub mod compositor;
pub mod error;
pub mod grid;
pub mod mechanisms;
pub mod palette;
pub mod queries;
pub mod region;
pub mod special;
pub mod tradeoff;
pub mod validation;

// Re-export commonly used types for convenience
pub use algebra::{
    dp_composition_exact_total_var, dp_composition_simplified_params, intersect_regions,
    region_from_dp_composition_basic, region_from_dp_composition_exact,
    region_from_dp_composition_exact_total_var, region_from_dp_composition_simplified,
    region_from_dp_params, region_from_dp_tv_params, region_from_f_dp, region_from_gaussian_dp,
    region_from_gaussian_dp_composition, total_variation_bounds, TotalVariationComposition,
};
pub use catalog::{ParamSchema, RegionKind, RegionSpec};
pub use compositor::{Compositor, CompositorState, Layer, LabelledRegion, LegendEntry, Rendering};
pub use error::{ErrorKind, RegionError, Result};
pub use grid::{GridConfig, Mask, Rasterizer};
pub use mechanisms::{
    AdditiveMechanism, ExponentialMedian, GaussianMechanism, LaplaceMechanism, Mechanism,
    RandomizedResponse,
};
pub use palette::{Palette, Rgba};
pub use queries::{HistogramQuery, MeanQuery, MedianQuery};
pub use region::{Constraint, Region};
pub use tradeoff::{NoiseDistribution, TradeoffFunction};
