//! Private queries and their utility
//!
//! Each query pairs a sensitivity with the mechanism that privatizes it and
//! reports a utility figure next to the mechanism's privacy regions.

use serde::{Deserialize, Serialize};

use crate::error::{RegionError, Result};
use crate::mechanisms::{AdditiveMechanism, ExponentialMedian, GaussianMechanism, LaplaceMechanism};

fn positive_count(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(RegionError::InvalidParameter {
            name: name.to_string(),
            value: 0.0,
            reason: "must be at least 1",
        });
    }
    Ok(())
}

/// Mean of `size` records whose values span `diameter`, in `dimensions` dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanQuery {
    pub diameter: f64,
    pub size: usize,
    pub dimensions: usize,
}

impl MeanQuery {
    pub fn new(diameter: f64, size: usize, dimensions: usize) -> Result<Self> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(RegionError::InvalidParameter {
                name: "diameter".to_string(),
                value: diameter,
                reason: "must be finite and positive",
            });
        }
        positive_count("size", size)?;
        positive_count("dimensions", dimensions)?;
        Ok(MeanQuery {
            diameter,
            size,
            dimensions,
        })
    }

    /// Replacing one record moves the mean by at most `diameter / size`
    pub fn sensitivity(&self) -> f64 {
        self.diameter / self.size as f64
    }

    /// Gaussian mechanism calibrated to this query
    pub fn mechanism(&self, epsilon: f64, delta: f64) -> Result<GaussianMechanism> {
        GaussianMechanism::new(epsilon, delta, self.sensitivity())
    }

    /// Utility figure `2 · dimensions · σ`
    pub fn utility(&self, epsilon: f64, delta: f64) -> Result<f64> {
        let mechanism = self.mechanism(epsilon, delta)?;
        Ok(2.0 * self.dimensions as f64 * mechanism.noise_scale())
    }

    /// Private mean of a one-dimensional dataset
    pub fn apply(&self, data: &[f64], epsilon: f64, delta: f64, seed: Option<u64>) -> Result<f64> {
        let mechanism = self.mechanism(epsilon, delta)?;
        if data.is_empty() {
            return Err(RegionError::InvalidParameter {
                name: "data".to_string(),
                value: 0.0,
                reason: "cannot take the mean of no records",
            });
        }
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        Ok(mechanism.apply(mean, seed))
    }
}

/// Histogram with a fixed number of bins
///
/// Replacing one record moves one count down and another up, so the L1
/// sensitivity is 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramQuery {
    pub bins: usize,
}

impl HistogramQuery {
    pub const L1_SENSITIVITY: f64 = 2.0;

    pub fn new(bins: usize) -> Result<Self> {
        positive_count("bins", bins)?;
        Ok(HistogramQuery { bins })
    }

    pub fn mechanism(&self, epsilon: f64) -> Result<LaplaceMechanism> {
        LaplaceMechanism::new(epsilon, Self::L1_SENSITIVITY)
    }

    /// Expected squared error summed over all bins, `bins · 2b²`
    pub fn utility(&self, epsilon: f64) -> Result<f64> {
        Ok(self.bins as f64 * self.mechanism(epsilon)?.variance())
    }

    /// Count values into bins `0..bins` and add Laplace noise to each count
    ///
    /// Values outside the bin range are ignored.
    pub fn apply(&self, values: &[usize], epsilon: f64, seed: Option<u64>) -> Result<Vec<f64>> {
        let mechanism = self.mechanism(epsilon)?;
        let mut counts = vec![0.0; self.bins];
        for &v in values {
            if let Some(count) = counts.get_mut(v) {
                *count += 1.0;
            }
        }
        Ok(mechanism.apply_all(&counts, seed))
    }
}

/// Median of data drawn from `{1, ..., alphabet_size}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedianQuery {
    pub alphabet_size: usize,
}

impl MedianQuery {
    pub fn new(alphabet_size: usize) -> Result<Self> {
        crate::validation::validate_alphabet_size(alphabet_size)?;
        Ok(MedianQuery { alphabet_size })
    }

    pub fn mechanism(&self, epsilon: f64) -> Result<ExponentialMedian> {
        ExponentialMedian::new(epsilon, self.alphabet_size)
    }

    /// Probability that the released label is off by `rank_deviation` or more
    pub fn utility(&self, epsilon: f64, rank_deviation: f64) -> Result<f64> {
        Ok(self.mechanism(epsilon)?.rank_deviation_bound(rank_deviation))
    }

    pub fn apply(&self, data: &[f64], epsilon: f64, seed: Option<u64>) -> Result<usize> {
        Ok(self.mechanism(epsilon)?.apply(data, seed))
    }
}
