use serde::{Deserialize, Serialize};

use crate::domain::insight::Severity;

/// Multipliers applied to confidence when ranking insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self { critical: 4, high: 3, medium: 2, low: 1 }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// How the normalizer picks the "current" month out of a monthly ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentMonthRule {
    /// Latest calendar month among keys that name a month.
    #[default]
    LatestCalendarMonth,
    /// Last key in document order, regardless of what it names.
    LastKey,
}

impl std::str::FromStr for CurrentMonthRule {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "latest_calendar_month" => Ok(Self::LatestCalendarMonth),
            "last_key" => Ok(Self::LastKey),
            other => Err(format!(
                "unsupported current month rule `{other}` (expected latest_calendar_month|last_key)"
            )),
        }
    }
}

/// Thresholds shared by the analyzers and the ranking step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsSettings {
    /// z-score above which a record is anomalous (default: 2.5)
    pub anomaly_threshold: f64,
    /// z-score above which an anomaly is critical (default: 3.0)
    pub critical_z_score: f64,
    /// Projected/yearly-target ratio that triggers a forecast (default: 1.1)
    pub forecast_overshoot_ratio: f64,
    /// Sales/target ratio below which an employee is at risk (default: 0.8)
    pub risk_ratio: f64,
    /// Shortfall percent above which a risk is critical (default: 30)
    pub risk_critical_percent: f64,
    /// Territory/overall mean ratio that marks a strong territory (default: 1.2)
    pub territory_uplift_ratio: f64,
    pub min_territory_size: usize,
    pub current_month_rule: CurrentMonthRule,
    pub severity_weights: SeverityWeights,
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            anomaly_threshold: 2.5,
            critical_z_score: 3.0,
            forecast_overshoot_ratio: 1.1,
            risk_ratio: 0.8,
            risk_critical_percent: 30.0,
            territory_uplift_ratio: 1.2,
            min_territory_size: 2,
            current_month_rule: CurrentMonthRule::default(),
            severity_weights: SeverityWeights::default(),
        }
    }
}

impl InsightsSettings {
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("insights.anomaly_threshold", self.anomaly_threshold),
            ("insights.critical_z_score", self.critical_z_score),
            ("insights.forecast_overshoot_ratio", self.forecast_overshoot_ratio),
            ("insights.territory_uplift_ratio", self.territory_uplift_ratio),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{key} must be a positive number"));
            }
        }

        if !self.risk_ratio.is_finite() || self.risk_ratio <= 0.0 || self.risk_ratio > 1.0 {
            return Err("insights.risk_ratio must be in range (0, 1]".to_string());
        }

        if !(0.0..=100.0).contains(&self.risk_critical_percent) {
            return Err("insights.risk_critical_percent must be in range 0..=100".to_string());
        }

        if self.min_territory_size == 0 {
            return Err("insights.min_territory_size must be greater than zero".to_string());
        }

        let weights = self.severity_weights;
        if weights.critical == 0 || weights.high == 0 || weights.medium == 0 || weights.low == 0 {
            return Err("insights.severity_weights must all be greater than zero".to_string());
        }

        Ok(())
    }
}
