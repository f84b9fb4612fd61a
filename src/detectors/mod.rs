//! Batch anomaly detectors
//!
//! Three independent detectors run over one in-memory batch:
//! - [`IsolationForest`] — density-based tree ensemble, refit every call
//! - [`AutoEncoder`] — reconstruction-error scoring against a batch quantile
//! - [`ZScoreDetector`] — per-column statistical outlier scan
//!
//! Each produces one boolean verdict per observation; the fusion step
//! combines them into weighted anomaly scores.

mod autoencoder;
mod isolation_forest;
mod statistical;

pub use autoencoder::{AutoEncoder, ENCODING_DIM};
pub use isolation_forest::IsolationForest;
pub use statistical::{ZScoreDetector, Z_SCORE_CUTOFF};

/// Per-observation verdicts of the three detectors, in evaluation order
#[derive(Debug, Clone)]
pub struct DetectorVerdicts {
    /// Density-based (isolation forest) flags
    pub density: Vec<bool>,
    /// Reconstruction-error (autoencoder) flags
    pub reconstruction: Vec<bool>,
    /// Statistical (z-score) flags
    pub statistical: Vec<bool>,
}
