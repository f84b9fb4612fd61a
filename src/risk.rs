//! Segment-level risk aggregation and statistical summary

use crate::fusion::{AnomalyRecord, Severity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Segment-wide risk level derived from all anomaly records of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// First and last anomaly dates in the batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Aggregate statistics over one detection call's anomaly records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub total_anomalies: usize,
    /// Count of records per severity bucket
    pub severity_distribution: HashMap<Severity, usize>,
    /// Count of records per "YYYY-MM" month
    pub monthly_distribution: BTreeMap<String, usize>,
    /// Percentage of observations flagged
    pub anomaly_rate: f64,
    pub date_range: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reduce the anomaly records to one risk level. Rules are evaluated in
/// order; the first match wins. An empty record set is always low risk.
pub fn assess_risk(records: &[AnomalyRecord]) -> RiskLevel {
    if records.is_empty() {
        return RiskLevel::Low;
    }

    let mean_score =
        records.iter().map(|r| r.anomaly_score).sum::<f64>() / records.len() as f64;
    let critical_count = records
        .iter()
        .filter(|r| r.severity == Severity::Critical)
        .count();
    let high_count = records
        .iter()
        .filter(|r| r.severity == Severity::High)
        .count();

    if critical_count > 0 || mean_score > 0.8 {
        RiskLevel::Critical
    } else if high_count > 2 || mean_score > 0.6 {
        RiskLevel::High
    } else if high_count > 0 || mean_score > 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Build the statistical summary for the batch
pub fn summarize(records: &[AnomalyRecord], total_observations: usize) -> StatisticalSummary {
    if records.is_empty() {
        return StatisticalSummary {
            total_anomalies: 0,
            severity_distribution: HashMap::new(),
            monthly_distribution: BTreeMap::new(),
            anomaly_rate: 0.0,
            date_range: None,
            message: Some("no anomalies detected".to_string()),
        };
    }

    let mut severity_distribution = HashMap::new();
    let mut monthly_distribution = BTreeMap::new();
    for record in records {
        *severity_distribution.entry(record.severity).or_insert(0) += 1;
        let month = record.date.format("%Y-%m").to_string();
        *monthly_distribution.entry(month).or_insert(0) += 1;
    }

    let start = records.iter().map(|r| r.date).min();
    let end = records.iter().map(|r| r.date).max();
    let date_range = match (start, end) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        _ => None,
    };

    let anomaly_rate = if total_observations > 0 {
        100.0 * records.len() as f64 / total_observations as f64
    } else {
        0.0
    };

    StatisticalSummary {
        total_anomalies: records.len(),
        severity_distribution,
        monthly_distribution,
        anomaly_rate,
        date_range,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(year: i32, month: u32, day: u32, score: f64) -> AnomalyRecord {
        AnomalyRecord {
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            anomaly_score: score,
            reasons: vec!["test".to_string()],
            severity: Severity::from_score(score),
            emission: 100.0,
            energy_consumption: 200.0,
            temperature: 20.0,
        }
    }

    #[test]
    fn test_empty_records_are_low_risk() {
        assert_eq!(assess_risk(&[]), RiskLevel::Low);
        let summary = summarize(&[], 100);
        assert_eq!(summary.total_anomalies, 0);
        assert_eq!(summary.anomaly_rate, 0.0);
        assert!(summary.date_range.is_none());
        assert!(summary.message.is_some());
    }

    #[test]
    fn test_single_critical_record_escalates() {
        let records = vec![record(2026, 1, 1, 1.0), record(2026, 1, 2, 0.2)];
        assert_eq!(assess_risk(&records), RiskLevel::Critical);
    }

    #[test]
    fn test_three_high_records_escalate_to_high() {
        let records = vec![
            record(2026, 1, 1, 0.6),
            record(2026, 1, 2, 0.6),
            record(2026, 1, 3, 0.6),
            record(2026, 1, 4, 0.2),
        ];
        assert_eq!(assess_risk(&records), RiskLevel::High);
    }

    #[test]
    fn test_one_high_record_is_medium() {
        let records = vec![record(2026, 2, 1, 0.6), record(2026, 2, 2, 0.2)];
        assert_eq!(assess_risk(&records), RiskLevel::Medium);
    }

    #[test]
    fn test_low_scores_stay_low() {
        let records = vec![record(2026, 2, 1, 0.2), record(2026, 2, 2, 0.2)];
        assert_eq!(assess_risk(&records), RiskLevel::Low);
    }

    #[test]
    fn test_summary_histograms() {
        let records = vec![
            record(2026, 1, 5, 1.0),
            record(2026, 1, 20, 0.4),
            record(2026, 2, 3, 0.4),
        ];
        let summary = summarize(&records, 60);

        assert_eq!(summary.total_anomalies, 3);
        assert_eq!(summary.severity_distribution[&Severity::Critical], 1);
        assert_eq!(summary.severity_distribution[&Severity::Medium], 2);
        assert_eq!(summary.monthly_distribution["2026-01"], 2);
        assert_eq!(summary.monthly_distribution["2026-02"], 1);
        assert!((summary.anomaly_rate - 5.0).abs() < 1e-12);

        let range = summary.date_range.unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 2, 3).unwrap());
    }

    #[test]
    fn test_severity_counts_sum_to_record_count() {
        let records = vec![
            record(2026, 3, 1, 1.0),
            record(2026, 3, 2, 0.6),
            record(2026, 3, 3, 0.4),
            record(2026, 3, 4, 0.2),
        ];
        let summary = summarize(&records, 30);
        let total: usize = summary.severity_distribution.values().sum();
        assert_eq!(total, records.len());
    }
}
