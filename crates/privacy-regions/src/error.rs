//! Error types for region construction, rasterization and compositing

use thiserror::Error;

/// Broad classification of a [`RegionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A parameter is outside the range the theorem or mechanism is defined on
    Domain,
    /// The API was called in a way that cannot produce a meaningful result
    Usage,
}

/// Errors that can occur while building, rasterizing or compositing regions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    /// Epsilon must be finite and non-negative
    #[error("Invalid epsilon {value}: {reason}")]
    InvalidEpsilon { value: f64, reason: &'static str },

    /// Delta must lie in [0, 1]
    #[error("Invalid delta {value}: {reason}")]
    InvalidDelta { value: f64, reason: &'static str },

    /// Total variation outside the interval allowed by (ε, δ)
    #[error("Invalid total variation {value}: must lie in [{lower}, {upper}]")]
    InvalidTotalVariation { value: f64, lower: f64, upper: f64 },

    /// Gaussian-DP parameter must be finite and non-negative
    #[error("Invalid mu {value}: must be finite and non-negative")]
    InvalidMu { value: f64 },

    /// Delta slack must lie in (0, 1]
    #[error("Invalid delta slack {value}: must lie in (0, 1]")]
    InvalidSlack { value: f64 },

    /// Sensitivity must be finite and positive
    #[error("Invalid sensitivity {value}: must be finite and positive")]
    InvalidSensitivity { value: f64 },

    /// Alphabet must have at least two symbols
    #[error("Invalid alphabet size {value}: need at least 2 symbols")]
    InvalidAlphabetSize { value: usize },

    /// Per-mechanism parameter lists have different lengths
    #[error("Parameter lists differ in length: {epsilons} epsilons, {deltas} deltas")]
    LengthMismatch { epsilons: usize, deltas: usize },

    /// A generic out-of-range parameter (query and catalog parameters)
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: &'static str,
    },

    /// No catalog entry with this key
    #[error("Unknown region kind: {0}")]
    UnknownKind(String),

    /// A required parameter was not supplied
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// A region with no constraints was used where one is required
    #[error("Region has no constraints")]
    EmptyRegion,

    /// Grid configuration cannot produce a raster
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Palette needs a background entry plus at least one colour
    #[error("Palette needs at least 2 entries, got {0}")]
    PaletteTooSmall(usize),

    /// No region was ever issued with this id
    #[error("Unknown region id {0}")]
    UnknownRegion(usize),

    /// The region with this id has already been removed
    #[error("Region {0} was already removed")]
    RegionRemoved(usize),
}

impl RegionError {
    /// Classify the error as a domain or usage error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegionError::InvalidEpsilon { .. }
            | RegionError::InvalidDelta { .. }
            | RegionError::InvalidTotalVariation { .. }
            | RegionError::InvalidMu { .. }
            | RegionError::InvalidSlack { .. }
            | RegionError::InvalidSensitivity { .. }
            | RegionError::InvalidAlphabetSize { .. }
            | RegionError::LengthMismatch { .. }
            | RegionError::InvalidParameter { .. } => ErrorKind::Domain,
            RegionError::MissingParameter(_)
            | RegionError::UnknownKind(_)
            | RegionError::EmptyRegion
            | RegionError::InvalidGrid(_)
            | RegionError::PaletteTooSmall(_)
            | RegionError::UnknownRegion(_)
            | RegionError::RegionRemoved(_) => ErrorKind::Usage,
        }
    }

    /// True for precondition violations on numeric parameters
    pub fn is_domain_error(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, RegionError>;
