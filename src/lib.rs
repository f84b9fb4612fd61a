//! carbonwatch - Ensemble anomaly detection for emission time series
//!
//! Analyzes per-segment (industry) daily multivariate emission series,
//! flags anomalous observations with a three-detector ensemble, grades
//! segment-level risk, and derives recommendations plus a statistical
//! summary.
//!
//! # Modules
//!
//! ## Core pipeline
//! - [`series`] - Synthetic daily series generation per segment
//! - [`detectors`] - Isolation forest, autoencoder, and z-score detectors
//! - [`fusion`] - Weighted verdict fusion into scored anomaly records
//! - [`risk`] - Segment-level risk aggregation and summary statistics
//! - [`recommend`] - Risk- and pattern-driven recommendations
//!
//! ## Infrastructure
//! - [`engine`] - The detection engine and its request/report boundary
//! - [`registry`] - Per-segment model lifecycle and lock discipline
//! - [`preprocessing`] - Batch feature standardization
//! - [`segment`] - The fixed industry segment set and baselines
//!
//! # Example
//!
//! ```
//! use carbonwatch::prelude::*;
//!
//! let engine = AnomalyEngine::new().with_seed(42);
//! engine.initialize(Segment::Energy)?;
//!
//! let request = DetectionRequest::new(Segment::Energy, 30).with_threshold(0.95);
//! let report = engine.detect(&request)?;
//! assert!(!report.recommendations.is_empty());
//! # Ok::<(), carbonwatch::CarbonError>(())
//! ```

pub mod error;

pub mod segment;
pub mod series;

pub mod detectors;
pub mod fusion;
pub mod preprocessing;
pub mod recommend;
pub mod risk;

pub mod engine;
pub mod registry;

pub use error::{CarbonError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{CarbonError, Result};

    pub use crate::segment::{Segment, SegmentBaseline};
    pub use crate::series::{Observation, SeriesGenerator, SyntheticSeries, N_FEATURES};

    pub use crate::detectors::{AutoEncoder, DetectorVerdicts, IsolationForest, ZScoreDetector};
    pub use crate::fusion::{AnomalyRecord, Severity};
    pub use crate::preprocessing::StandardScaler;
    pub use crate::recommend::recommendations;
    pub use crate::risk::{RiskLevel, StatisticalSummary};

    pub use crate::engine::{AnomalyEngine, DetectionReport, DetectionRequest};
    pub use crate::registry::ModelRegistry;
}
