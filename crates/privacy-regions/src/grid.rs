//! Grid rasterization
//!
//! Regions are sampled on an `R × R` grid built from `linspace(start, stop, R)`.
//! The false-positive rate varies along columns and the false-negative rate
//! along rows, so cell `(row, col)` samples `(fp, fn) = (d[col], d[row])`.
//!
//! # Example
//!
//! ```rust
//! use privacy_regions::grid::{GridConfig, Rasterizer};
//! use privacy_regions::algebra::region_from_dp_params;
//!
//! let config = GridConfig::default().with_resolution(50);
//! let rasterizer = Rasterizer::new(config).unwrap();
//!
//! let region = region_from_dp_params(0.5, 0.1).unwrap();
//! let mask = rasterizer.rasterize(&region).unwrap();
//! assert_eq!(mask.resolution(), 50);
//! assert!(mask.count() > 0);
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RegionError, Result};
use crate::region::{Constraint, Region};

/// Default number of samples per axis
pub const DEFAULT_RESOLUTION: usize = 600;

/// Default outline thickness in cells
pub const DEFAULT_OUTLINE_THICKNESS: usize = 3;

/// Configuration for rasterization
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Smallest sampled coordinate
    pub start: f64,
    /// Largest sampled coordinate
    pub stop: f64,
    /// Samples per axis
    pub resolution: usize,
    /// Draw only a boundary band of this many cells instead of the filled region
    pub outline: Option<usize>,
    /// Rasterize several regions in parallel
    pub parallel: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            start: 0.0,
            stop: 1.0,
            resolution: DEFAULT_RESOLUTION,
            outline: None,
            parallel: true,
        }
    }
}

impl GridConfig {
    /// Set the sampled interval
    pub fn with_bounds(mut self, start: f64, stop: f64) -> Self {
        self.start = start;
        self.stop = stop;
        self
    }

    /// Set samples per axis
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Enable outline mode with the given thickness, or disable it with `None`
    pub fn with_outline(mut self, thickness: Option<usize>) -> Self {
        self.outline = thickness;
        self
    }

    /// Enable/disable parallel rasterization
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Check that the configuration describes a usable grid
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(RegionError::InvalidGrid(
                "resolution must be at least 1".to_string(),
            ));
        }
        if !self.start.is_finite() || !self.stop.is_finite() || self.stop <= self.start {
            return Err(RegionError::InvalidGrid(format!(
                "bounds [{}, {}] must be finite and increasing",
                self.start, self.stop
            )));
        }
        if self.outline == Some(0) {
            return Err(RegionError::InvalidGrid(
                "outline thickness must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `num` evenly spaced samples over `[start, stop]`, endpoints included
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Square boolean raster, row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mask {
    resolution: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Mask with every cell set to `value`
    pub fn filled(resolution: usize, value: bool) -> Self {
        Mask {
            resolution,
            cells: vec![value; resolution * resolution],
        }
    }

    /// Build from row-major cells; the length must be a perfect square
    pub fn from_cells(resolution: usize, cells: Vec<bool>) -> Result<Self> {
        if cells.len() != resolution * resolution {
            return Err(RegionError::InvalidGrid(format!(
                "{} cells do not form a {}x{} mask",
                cells.len(),
                resolution,
                resolution
            )));
        }
        Ok(Mask { resolution, cells })
    }

    /// Samples per axis
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Row-major cells
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Cell at `(row, col)`; false outside the grid
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.resolution && col < self.resolution && self.cells[row * self.resolution + col]
    }

    /// Set the cell at `(row, col)`; ignored outside the grid
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        if row < self.resolution && col < self.resolution {
            self.cells[row * self.resolution + col] = value;
        }
    }

    /// Iterate rows
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.resolution.max(1))
    }

    /// Number of covered cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Covered fraction of the grid
    pub fn area(&self) -> f64 {
        if self.cells.is_empty() {
            0.0
        } else {
            self.count() as f64 / self.cells.len() as f64
        }
    }

    /// Every covered cell of `self` is covered in `other`
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.resolution == other.resolution
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(&a, &b)| !a || b)
    }

    /// Pointwise AND
    pub fn and(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a && b)
    }

    /// Pointwise OR
    pub fn or(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a || b)
    }

    fn zip_with(&self, other: &Mask, f: impl Fn(bool, bool) -> bool) -> Mask {
        debug_assert_eq!(self.resolution, other.resolution);
        Mask {
            resolution: self.resolution,
            cells: self
                .cells
                .iter()
                .zip(&other.cells)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Keep only the first `thickness` covered cells of each row and of each column
    pub fn outline(&self, thickness: usize) -> Mask {
        let n = self.resolution;
        let mut line = vec![false; self.cells.len()];

        for row in 0..n {
            let mut seen = 0;
            for col in 0..n {
                let i = row * n + col;
                if self.cells[i] {
                    seen += 1;
                    if seen <= thickness {
                        line[i] = true;
                    }
                }
            }
        }

        for col in 0..n {
            let mut seen = 0;
            for row in 0..n {
                let i = row * n + col;
                if self.cells[i] {
                    seen += 1;
                    if seen <= thickness {
                        line[i] = true;
                    }
                }
            }
        }

        Mask {
            resolution: n,
            cells: line,
        }
    }
}

/// Evaluates regions on a fixed coordinate grid
///
/// Coordinates are computed once and shared read-only by every rasterization.
#[derive(Clone, Debug)]
pub struct Rasterizer {
    config: GridConfig,
    fp: Vec<f64>,
    fn_: Vec<f64>,
}

impl Rasterizer {
    /// Build the coordinate grid
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let axis = linspace(config.start, config.stop, config.resolution);
        let n = config.resolution;
        let mut fp = Vec::with_capacity(n * n);
        let mut fn_ = Vec::with_capacity(n * n);
        for &y in &axis {
            for &x in &axis {
                fp.push(x);
                fn_.push(y);
            }
        }
        Ok(Rasterizer { config, fp, fn_ })
    }

    /// Grid configuration
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Samples per axis
    pub fn resolution(&self) -> usize {
        self.config.resolution
    }

    /// Row-major false-positive coordinates
    pub fn fp(&self) -> &[f64] {
        &self.fp
    }

    /// Row-major false-negative coordinates
    pub fn fn_(&self) -> &[f64] {
        &self.fn_
    }

    /// Evaluate a region into a mask
    ///
    /// In outline mode the simplex bound is dropped and the filled mask is
    /// thinned to a boundary band.
    pub fn rasterize(&self, region: &Region) -> Result<Mask> {
        if region.is_empty() {
            return Err(RegionError::EmptyRegion);
        }
        let started = Instant::now();

        let outline = self.config.outline;
        let constraints: Vec<&Constraint> = region
            .constraints()
            .iter()
            .filter(|c| outline.is_none() || !c.is_simplex())
            .collect();

        let mut cells = vec![true; self.fp.len()];
        for constraint in &constraints {
            for (i, cell) in cells.iter_mut().enumerate() {
                if *cell {
                    *cell = constraint.holds(self.fp[i], self.fn_[i]);
                }
            }
        }

        let filled = Mask {
            resolution: self.config.resolution,
            cells,
        };
        let mask = match outline {
            Some(thickness) => filled.outline(thickness),
            None => filled,
        };

        debug!(
            resolution = self.config.resolution,
            constraints = constraints.len(),
            covered = mask.count(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "rasterized region"
        );
        Ok(mask)
    }

    /// Rasterize several regions, in parallel when enabled; output order matches input
    pub fn rasterize_all(&self, regions: &[&Region]) -> Result<Vec<Mask>> {
        if self.config.parallel {
            self.rasterize_parallel(regions)
        } else {
            regions.iter().map(|r| self.rasterize(r)).collect()
        }
    }

    #[cfg(feature = "parallel")]
    fn rasterize_parallel(&self, regions: &[&Region]) -> Result<Vec<Mask>> {
        use rayon::prelude::*;

        regions.par_iter().map(|r| self.rasterize(r)).collect()
    }

    /// Fallback when parallel feature is disabled
    #[cfg(not(feature = "parallel"))]
    fn rasterize_parallel(&self, regions: &[&Region]) -> Result<Vec<Mask>> {
        regions.iter().map(|r| self.rasterize(r)).collect()
    }
}
