//! Error types for the detection engine

use thiserror::Error;

/// Errors surfaced by the carbonwatch engine
#[derive(Error, Debug)]
pub enum CarbonError {
    /// Request parameters outside their allowed ranges
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Segment identifier not in the fixed industry set
    #[error("Unknown segment: {0}")]
    UnknownSegment(String),

    /// No registry entry for the segment; call initialize first
    #[error("Models not initialized for segment '{0}'")]
    NotInitialized(String),

    /// A structurally required detector failed
    #[error("Detector failure: {0}")]
    DetectorFailure(String),

    /// Data processing error
    #[error("Data error: {0}")]
    DataError(String),

    /// Matrix shape mismatch
    #[error("Shape mismatch: {0}")]
    ShapeError(String),
}

/// Result type alias for carbonwatch operations
pub type Result<T> = std::result::Result<T, CarbonError>;
