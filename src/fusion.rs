//! Ensemble fusion and per-observation scoring
//!
//! Merges the three detectors' verdicts into weighted anomaly scores,
//! severity buckets, and human-readable trigger reasons.

use crate::detectors::DetectorVerdicts;
use crate::error::{CarbonError, Result};
use crate::series::Observation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weight contributed by the density-based detector
pub const DENSITY_WEIGHT: f64 = 0.4;
/// Weight contributed by the reconstruction detector
pub const RECONSTRUCTION_WEIGHT: f64 = 0.4;
/// Weight contributed by the statistical detector
pub const STATISTICAL_WEIGHT: f64 = 0.2;

/// Trigger explanation per detector, in evaluation order
pub const REASON_DENSITY: &str = "isolation forest detected an unusual feature pattern";
pub const REASON_RECONSTRUCTION: &str = "autoencoder reconstruction error above threshold";
pub const REASON_STATISTICAL: &str = "statistical indicators outside the normal range";

/// Severity bucket derived from the fused anomaly score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Fixed score thresholds: >= 0.8 critical, >= 0.6 high, >= 0.4 medium
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Severity::Critical
        } else if score >= 0.6 {
            Severity::High
        } else if score >= 0.4 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// One flagged observation with its fused score and context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub date: NaiveDate,
    /// Sum of the agreeing detectors' weights, rounded to 3 decimals
    pub anomaly_score: f64,
    /// One explanation per agreeing detector, in evaluation order
    /// density -> reconstruction -> statistical
    pub reasons: Vec<String>,
    pub severity: Severity,
    /// Feature values consumed by the recommendation rules
    pub emission: f64,
    pub energy_consumption: f64,
    pub temperature: f64,
}

/// Fuse per-row verdicts into anomaly records. A row becomes a record iff
/// at least one detector flagged it.
pub fn fuse(observations: &[Observation], verdicts: &DetectorVerdicts) -> Result<Vec<AnomalyRecord>> {
    let n = observations.len();
    if verdicts.density.len() != n
        || verdicts.reconstruction.len() != n
        || verdicts.statistical.len() != n
    {
        return Err(CarbonError::ShapeError(format!(
            "verdict lengths ({}, {}, {}) do not match {} observations",
            verdicts.density.len(),
            verdicts.reconstruction.len(),
            verdicts.statistical.len(),
            n
        )));
    }

    let mut records = Vec::new();
    for (i, obs) in observations.iter().enumerate() {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if verdicts.density[i] {
            score += DENSITY_WEIGHT;
            reasons.push(REASON_DENSITY.to_string());
        }
        if verdicts.reconstruction[i] {
            score += RECONSTRUCTION_WEIGHT;
            reasons.push(REASON_RECONSTRUCTION.to_string());
        }
        if verdicts.statistical[i] {
            score += STATISTICAL_WEIGHT;
            reasons.push(REASON_STATISTICAL.to_string());
        }

        if reasons.is_empty() {
            continue;
        }

        let anomaly_score = (score * 1000.0).round() / 1000.0;
        records.push(AnomalyRecord {
            date: obs.date,
            anomaly_score,
            reasons,
            severity: Severity::from_score(anomaly_score),
            emission: obs.emission,
            energy_consumption: obs.energy_consumption,
            temperature: obs.temperature,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(day: u32) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            emission: 100.0,
            energy_consumption: 200.0,
            temperature: 20.0,
            humidity: 50.0,
            pressure: 1013.0,
            wind_speed: 3.0,
            gdp: 1000.0,
            policy_factor: 1.0,
        }
    }

    #[test]
    fn test_triple_agreement_scores_one_and_is_critical() {
        let observations = vec![obs(1)];
        let verdicts = DetectorVerdicts {
            density: vec![true],
            reconstruction: vec![true],
            statistical: vec![true],
        };

        let records = fuse(&observations, &verdicts).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].anomaly_score, 1.0);
        assert_eq!(records[0].severity, Severity::Critical);
        assert_eq!(
            records[0].reasons,
            vec![
                REASON_DENSITY.to_string(),
                REASON_RECONSTRUCTION.to_string(),
                REASON_STATISTICAL.to_string(),
            ]
        );
    }

    #[test]
    fn test_unflagged_rows_produce_no_record() {
        let observations = vec![obs(1), obs(2)];
        let verdicts = DetectorVerdicts {
            density: vec![false, false],
            reconstruction: vec![false, false],
            statistical: vec![false, false],
        };
        assert!(fuse(&observations, &verdicts).unwrap().is_empty());
    }

    #[test]
    fn test_single_detector_weights() {
        let observations = vec![obs(1), obs(2), obs(3)];
        let verdicts = DetectorVerdicts {
            density: vec![true, false, false],
            reconstruction: vec![false, true, false],
            statistical: vec![false, false, true],
        };

        let records = fuse(&observations, &verdicts).unwrap();
        assert_eq!(records[0].anomaly_score, 0.4);
        assert_eq!(records[0].severity, Severity::Medium);
        assert_eq!(records[1].anomaly_score, 0.4);
        assert_eq!(records[2].anomaly_score, 0.2);
        assert_eq!(records[2].severity, Severity::Low);
    }

    #[test]
    fn test_density_plus_statistical_is_high() {
        let observations = vec![obs(4)];
        let verdicts = DetectorVerdicts {
            density: vec![true],
            reconstruction: vec![false],
            statistical: vec![true],
        };
        let records = fuse(&observations, &verdicts).unwrap();
        assert_eq!(records[0].anomaly_score, 0.6);
        assert_eq!(records[0].severity, Severity::High);
    }

    #[test]
    fn test_length_mismatch_is_shape_error() {
        let observations = vec![obs(1), obs(2)];
        let verdicts = DetectorVerdicts {
            density: vec![true],
            reconstruction: vec![false, false],
            statistical: vec![false, false],
        };
        assert!(matches!(
            fuse(&observations, &verdicts),
            Err(CarbonError::ShapeError(_))
        ));
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::from_score(1.0), Severity::Critical);
        assert_eq!(Severity::from_score(0.8), Severity::Critical);
        assert_eq!(Severity::from_score(0.6), Severity::High);
        assert_eq!(Severity::from_score(0.4), Severity::Medium);
        assert_eq!(Severity::from_score(0.2), Severity::Low);
    }
}
