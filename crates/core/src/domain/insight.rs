use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::employee::EmployeeId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Anomaly,
    Prediction,
    Recommendation,
    Alert,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anomaly => "anomaly",
            Self::Prediction => "prediction",
            Self::Recommendation => "recommendation",
            Self::Alert => "alert",
        }
    }
}

impl std::str::FromStr for InsightType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "anomaly" => Ok(Self::Anomaly),
            "prediction" => Ok(Self::Prediction),
            "recommendation" => Ok(Self::Recommendation),
            "alert" => Ok(Self::Alert),
            other => Err(DomainError::InvariantViolation(format!(
                "unsupported insight type `{other}` (expected anomaly|prediction|recommendation|alert)"
            ))),
        }
    }
}

/// Ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
}

/// Revenue forecast for one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPrediction {
    /// 1-based calendar month.
    pub month: u8,
    pub month_name: String,
    pub predicted_revenue: f64,
    pub confidence: u8,
    pub seasonality_factor: f64,
    pub key_drivers: Vec<String>,
}

/// Figures behind an insight, kept for drill-down views.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightData {
    #[default]
    Empty,
    Anomaly {
        z_score: f64,
        mean: f64,
        actual: f64,
    },
    Forecast {
        predicted_value: f64,
        yearly_target: f64,
        trend: Trend,
    },
    Shortfall {
        shortfall: f64,
        shortfall_percent: f64,
        current_sales: f64,
        target: f64,
    },
    Territory {
        avg_sales: f64,
        overall_avg: f64,
        territory: String,
    },
    TopPerformer {
        top_performer: String,
        sales: f64,
    },
    SeasonalOutlook {
        predictions: Vec<MonthlyPrediction>,
        key_drivers: Vec<String>,
        suggested_actions: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesInsight {
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub impact: u8,
    pub confidence: u8,
    pub actionable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    pub timeframe: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub data: InsightData,
}
