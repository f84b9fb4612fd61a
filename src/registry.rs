//! Per-segment model registry
//!
//! Holds each segment's scaler, isolation forest configuration, and
//! autoencoder. Entries are created through a single initialization path
//! and guarded by a per-segment lock so concurrent detection calls for
//! the same segment cannot interleave a refit of shared state.

use crate::detectors::{AutoEncoder, IsolationForest, ENCODING_DIM};
use crate::error::{CarbonError, Result};
use crate::preprocessing::StandardScaler;
use crate::segment::Segment;
use crate::series::N_FEATURES;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Contamination fraction used by every segment's isolation forest
pub const CONTAMINATION: f64 = 0.10;

/// One segment's model state.
///
/// The scaler and forest are refit on every detection batch; only the
/// autoencoder's weights persist across calls.
#[derive(Debug)]
pub struct SegmentModels {
    pub scaler: StandardScaler,
    pub forest: IsolationForest,
    pub autoencoder: AutoEncoder,
}

impl SegmentModels {
    fn new(seed: u64) -> Self {
        Self {
            scaler: StandardScaler::new(),
            forest: IsolationForest::new()
                .with_contamination(CONTAMINATION)
                .with_seed(seed),
            autoencoder: AutoEncoder::new(N_FEATURES, ENCODING_DIM, seed),
        }
    }
}

/// Registry of per-segment model entries
#[derive(Debug, Default)]
pub struct ModelRegistry {
    entries: RwLock<HashMap<Segment, Arc<Mutex<SegmentModels>>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create (or re-create) the entry for a segment. Idempotent: repeated
    /// calls simply replace the entry with freshly initialized models.
    pub fn initialize(&self, segment: Segment, seed: u64) {
        let models = Arc::new(Mutex::new(SegmentModels::new(seed)));
        self.entries.write().insert(segment, models);
        info!(segment = %segment, "initialized detection models");
    }

    /// Fetch the entry for a segment, or fail with `NotInitialized`
    pub fn get(&self, segment: Segment) -> Result<Arc<Mutex<SegmentModels>>> {
        self.entries
            .read()
            .get(&segment)
            .cloned()
            .ok_or_else(|| CarbonError::NotInitialized(segment.as_str().to_string()))
    }

    /// True iff at least one segment has an entry
    pub fn is_ready(&self) -> bool {
        !self.entries.read().is_empty()
    }

    /// Number of initialized segments
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
