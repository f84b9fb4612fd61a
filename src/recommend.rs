//! Recommended actions derived from risk level and anomaly patterns

use crate::fusion::AnomalyRecord;
use crate::risk::RiskLevel;

/// Emission value above which an equipment check is recommended
pub const EMISSION_ALERT_LIMIT: f64 = 1000.0;
/// Energy consumption above which an efficiency review is recommended
pub const ENERGY_ALERT_LIMIT: f64 = 5000.0;

/// Build the recommendation list: a fixed base list per risk level, plus
/// pattern-specific additions. Entries are appended in order and never
/// deduplicated.
pub fn recommendations(records: &[AnomalyRecord], risk_level: RiskLevel) -> Vec<String> {
    let base: &[&str] = match risk_level {
        RiskLevel::Critical => &[
            "activate the emergency response plan immediately",
            "halt related production activities",
            "dispatch an expert team for on-site investigation",
            "increase real-time monitoring frequency",
        ],
        RiskLevel::High => &[
            "increase sampling frequency",
            "inspect equipment operating status",
            "analyze anomalous data patterns",
            "prepare preventive measures",
        ],
        RiskLevel::Medium => &[
            "watch anomalous data trends",
            "check system status regularly",
            "streamline data collection",
        ],
        RiskLevel::Low => &[
            "continue routine monitoring",
            "maintain the detection system regularly",
        ],
    };

    let mut actions: Vec<String> = base.iter().map(|s| s.to_string()).collect();

    if records.iter().any(|r| r.emission > EMISSION_ALERT_LIMIT) {
        actions.push("inspect emission control equipment".to_string());
    }
    if records.iter().any(|r| r.energy_consumption > ENERGY_ALERT_LIMIT) {
        actions.push("improve energy use efficiency".to_string());
    }

    actions
}
