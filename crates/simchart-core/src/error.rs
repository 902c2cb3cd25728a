// File: crates/simchart-core/src/error.rs
// Summary: Error taxonomy for configuration and precondition violations.

use thiserror::Error;

use crate::transform::Orientation;

/// Every variant describes a caller bug (invalid configuration or a violated
/// precondition); none of them are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),

    #[error("major spacing {major} must exceed minor spacing {minor} and be an integer multiple of it")]
    IncompatibleSpacing { major: f64, minor: f64 },

    #[error("at least one spacing must be used")]
    MissingSpacing,

    #[error("{orientation:?} range [{min}, {max}] cannot be mapped: span must be finite and non-zero")]
    NonInvertible { orientation: Orientation, min: f64, max: f64 },

    #[error("view size {width}x{height} must be positive and finite")]
    InvalidViewSize { width: f64, height: f64 },

    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("count mismatch: {left} values but {right} colors")]
    CountMismatch { left: usize, right: usize },

    #[error("cannot drag cursor: no data recorded")]
    NoData,

    #[error("cannot drag cursor while it is hidden")]
    CursorHidden,
}

pub type Result<T> = std::result::Result<T, ChartError>;
