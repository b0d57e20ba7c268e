use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::insight::{InsightType, SalesInsight, Severity};
use crate::insights::settings::SeverityWeights;

/// Stable sort, highest `severity weight * confidence` first.
pub fn rank_insights(insights: &mut [SalesInsight], weights: &SeverityWeights) {
    insights.sort_by_key(|insight| std::cmp::Reverse(score(insight, weights)));
}

fn score(insight: &SalesInsight, weights: &SeverityWeights) -> u64 {
    u64::from(weights.weight(insight.severity)) * u64::from(insight.confidence)
}

/// Dashboard tab selection; displays and parses as `all` or an insight type name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InsightFilter {
    #[default]
    All,
    Only(InsightType),
}

impl InsightFilter {
    pub fn matches(&self, insight: &SalesInsight) -> bool {
        match self {
            Self::All => true,
            Self::Only(insight_type) => insight.insight_type == *insight_type,
        }
    }
}

impl fmt::Display for InsightFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => formatter.write_str("all"),
            Self::Only(insight_type) => formatter.write_str(insight_type.as_str()),
        }
    }
}

impl std::str::FromStr for InsightFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse::<InsightType>().map(Self::Only).map_err(|error| error.to_string())
    }
}

/// Keeps matching insights in their ranked order.
pub fn filter_insights(insights: &[SalesInsight], filter: InsightFilter) -> Vec<SalesInsight> {
    insights.iter().filter(|insight| filter.matches(insight)).cloned().collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub total: usize,
    pub critical: usize,
    pub actionable: usize,
    /// Rounded mean confidence; 0 for an empty list.
    pub average_confidence: u8,
}

impl InsightSummary {
    pub fn from_insights(insights: &[SalesInsight]) -> Self {
        let total = insights.len();
        if total == 0 {
            return Self::default();
        }
        let confidence_sum: u32 = insights.iter().map(|insight| u32::from(insight.confidence)).sum();
        let average_confidence = (f64::from(confidence_sum) / total as f64).round() as u8;

        Self {
            total,
            critical: insights.iter().filter(|insight| insight.severity == Severity::Critical).count(),
            actionable: insights.iter().filter(|insight| insight.actionable).count(),
            average_confidence,
        }
    }
}
