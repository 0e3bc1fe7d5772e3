//! Error types for frame sampling.

use thiserror::Error;

use crate::dataset::ZoneId;

/// Errors raised while building direction sets or sampling frames.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// A vector with (near-)zero magnitude was used where a direction is required.
    #[error("degenerate vector: norm {norm:e} is too small to define a direction")]
    DegenerateVector { norm: f64 },

    /// A direction set, parameter block or index list is unusable.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The zone directory has no entry for the requested zone.
    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),
}

pub type Result<T> = std::result::Result<T, SamplingError>;
