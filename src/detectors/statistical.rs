//! Statistical outlier detection via per-column z-scores

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Fixed z-score cutoff. Deliberately independent of the caller-supplied
/// quantile threshold, which only drives the reconstruction detector.
pub const Z_SCORE_CUTOFF: f64 = 2.5;

/// Flags an observation when any feature column deviates from its column
/// mean by more than [`Z_SCORE_CUTOFF`] population standard deviations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZScoreDetector {
    cutoff: f64,
}

impl ZScoreDetector {
    pub fn new() -> Self {
        Self {
            cutoff: Z_SCORE_CUTOFF,
        }
    }

    /// Scan the batch; returns one flag per row. Columns with zero variance
    /// carry no signal and are skipped.
    pub fn detect(&self, x: &Array2<f64>) -> Vec<bool> {
        let n = x.nrows();
        let mut flags = vec![false; n];
        if n == 0 {
            return flags;
        }

        for column in x.columns() {
            let mean = column.sum() / n as f64;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
            let std = variance.sqrt();

            if std <= 1e-12 {
                continue;
            }

            for (i, value) in column.iter().enumerate() {
                if ((value - mean) / std).abs() > self.cutoff {
                    flags[i] = true;
                }
            }
        }

        flags
    }
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self::new()
    }
}
