//! Detection engine
//!
//! Orchestrates one detection call: validate the request, synthesize the
//! segment's series, run the three detectors over the batch, fuse their
//! verdicts, and aggregate risk, recommendations, and summary statistics.

use crate::detectors::{DetectorVerdicts, ZScoreDetector};
use crate::error::{CarbonError, Result};
use crate::fusion::{fuse, AnomalyRecord};
use crate::recommend::recommendations;
use crate::registry::{ModelRegistry, SegmentModels};
use crate::risk::{assess_risk, summarize, RiskLevel, StatisticalSummary};
use crate::segment::Segment;
use crate::series::SeriesGenerator;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Smallest accepted detection window, in days
pub const MIN_DAY_COUNT: usize = 7;
/// Largest accepted detection window, in days
pub const MAX_DAY_COUNT: usize = 365;
/// Inclusive bounds for the reconstruction quantile threshold
pub const THRESHOLD_RANGE: (f64, f64) = (0.5, 0.99);
/// Default reconstruction quantile threshold
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// Model seed used when the engine is not explicitly seeded
const DEFAULT_MODEL_SEED: u64 = 42;

/// One detection request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRequest {
    pub segment: Segment,
    /// Detection window in days, 7 to 365 inclusive
    pub day_count: usize,
    /// Reconstruction-error quantile, 0.5 to 0.99 inclusive
    pub quantile_threshold: f64,
}

impl DetectionRequest {
    pub fn new(segment: Segment, day_count: usize) -> Self {
        Self {
            segment,
            day_count,
            quantile_threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the reconstruction quantile threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.quantile_threshold = threshold;
        self
    }

    /// Reject out-of-range parameters before any computation begins
    pub fn validate(&self) -> Result<()> {
        if self.day_count < MIN_DAY_COUNT || self.day_count > MAX_DAY_COUNT {
            return Err(CarbonError::ValidationError(format!(
                "day_count {} for segment '{}' outside [{MIN_DAY_COUNT}, {MAX_DAY_COUNT}]",
                self.day_count, self.segment
            )));
        }
        let (lo, hi) = THRESHOLD_RANGE;
        if self.quantile_threshold < lo || self.quantile_threshold > hi {
            return Err(CarbonError::ValidationError(format!(
                "quantile_threshold {} for segment '{}' outside [{lo}, {hi}]",
                self.quantile_threshold, self.segment
            )));
        }
        Ok(())
    }
}

/// Result of one detection call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub segment: Segment,
    pub anomalies: Vec<AnomalyRecord>,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub statistical_summary: StatisticalSummary,
}

/// Ensemble anomaly detection engine
///
/// Owns the per-segment model registry; may be shared across threads. A
/// detection call holds its segment's lock for the full call so refits of
/// the scaler and forest never interleave.
#[derive(Debug, Default)]
pub struct AnomalyEngine {
    registry: ModelRegistry,
    seed: Option<u64>,
}

impl AnomalyEngine {
    pub fn new() -> Self {
        Self {
            registry: ModelRegistry::new(),
            seed: None,
        }
    }

    /// Seed series generation and model initialization for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initialize (or re-initialize) one segment's models. Idempotent.
    pub fn initialize(&self, segment: Segment) -> Result<()> {
        self.registry.initialize(segment, self.model_seed(segment));
        Ok(())
    }

    /// Initialize every segment
    pub fn initialize_all(&self) -> Result<()> {
        for segment in Segment::ALL {
            self.initialize(segment)?;
        }
        Ok(())
    }

    /// True iff at least one segment has initialized models
    pub fn is_ready(&self) -> bool {
        self.registry.is_ready()
    }

    /// Run the full detection pipeline for one segment
    pub fn detect(&self, request: &DetectionRequest) -> Result<DetectionReport> {
        request.validate()?;

        let entry = self.registry.get(request.segment)?;
        let mut models = entry.lock();

        let mut generator = SeriesGenerator::new();
        if let Some(seed) = self.seed {
            generator = generator.with_seed(seed);
        }
        let series = generator.generate(request.segment, request.day_count)?;
        let x = series.feature_matrix();
        let n = series.len();

        // Structurally required: a forest failure fails the call
        let density = models.forest.fit_predict(&x)?;

        // Designed soft failure: degrade to no signal from this detector
        let reconstruction =
            match reconstruction_verdicts(&mut models, &x, request.quantile_threshold) {
                Ok(flags) => flags,
                Err(e) => {
                    warn!(
                        segment = %request.segment,
                        error = %e,
                        "reconstruction detector failed, treating as no signal"
                    );
                    vec![false; n]
                }
            };

        let statistical = ZScoreDetector::new().detect(&x);

        let verdicts = DetectorVerdicts {
            density,
            reconstruction,
            statistical,
        };
        let anomalies = fuse(&series.observations, &verdicts)?;
        let risk_level = assess_risk(&anomalies);
        let recommendations = recommendations(&anomalies, risk_level);
        let statistical_summary = summarize(&anomalies, n);

        info!(
            segment = %request.segment,
            days = n,
            anomalies = anomalies.len(),
            risk = risk_level.as_str(),
            "detection complete"
        );

        Ok(DetectionReport {
            segment: request.segment,
            anomalies,
            risk_level,
            recommendations,
            statistical_summary,
        })
    }

    fn model_seed(&self, segment: Segment) -> u64 {
        self.seed
            .unwrap_or(DEFAULT_MODEL_SEED)
            .wrapping_add(segment as u64)
    }
}

/// Refit the scaler on the batch, then score reconstruction errors against
/// the threshold quantile. Errors here are absorbed by the caller.
fn reconstruction_verdicts(
    models: &mut SegmentModels,
    x: &Array2<f64>,
    threshold: f64,
) -> Result<Vec<bool>> {
    let scaled = models.scaler.fit_transform(x)?;
    models.autoencoder.detect(&scaled, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_count_out_of_range_rejected() {
        let engine = AnomalyEngine::new().with_seed(42);
        engine.initialize(Segment::Energy).unwrap();

        for days in [0usize, 6, 366] {
            let request = DetectionRequest::new(Segment::Energy, days);
            assert!(matches!(
                engine.detect(&request),
                Err(CarbonError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let engine = AnomalyEngine::new().with_seed(42);
        engine.initialize(Segment::Energy).unwrap();

        for threshold in [0.49, 0.991, 1.5] {
            let request = DetectionRequest::new(Segment::Energy, 30).with_threshold(threshold);
            assert!(matches!(
                engine.detect(&request),
                Err(CarbonError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_uninitialized_segment_is_not_ready() {
        let engine = AnomalyEngine::new().with_seed(42);
        assert!(!engine.is_ready());

        let request = DetectionRequest::new(Segment::Mining, 30);
        assert!(matches!(
            engine.detect(&request),
            Err(CarbonError::NotInitialized(_))
        ));
    }

    #[test]
    fn test_initialize_all_covers_every_segment() {
        let engine = AnomalyEngine::new().with_seed(42);
        engine.initialize_all().unwrap();
        assert!(engine.is_ready());

        for segment in Segment::ALL {
            let request = DetectionRequest::new(segment, 14);
            assert!(engine.detect(&request).is_ok());
        }
    }

    #[test]
    fn test_boundary_parameters_accepted() {
        let engine = AnomalyEngine::new().with_seed(42);
        engine.initialize(Segment::Services).unwrap();

        for (days, threshold) in [(7usize, 0.5), (365, 0.99)] {
            let request = DetectionRequest::new(Segment::Services, days).with_threshold(threshold);
            assert!(engine.detect(&request).is_ok());
        }
    }
}
