//! Orchestrates one insights run: fetch, normalize, analyze, rank.

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::employee::EmployeeData;
use crate::domain::insight::{InsightData, InsightType, SalesInsight, Severity};
use crate::errors::ApplicationError;
use crate::insights::analyzers::{with_failure_isolation, ANALYZERS};
use crate::insights::normalizer::Normalizer;
use crate::insights::ranking::rank_insights;
use crate::insights::settings::InsightsSettings;
use crate::source::EmployeeSource;

pub struct InsightsEngine<S> {
    source: S,
    settings: InsightsSettings,
    normalizer: Normalizer,
}

impl<S> InsightsEngine<S>
where
    S: EmployeeSource,
{
    pub fn new(source: S, settings: InsightsSettings) -> Self {
        let normalizer = Normalizer::new(settings.current_month_rule);
        Self { source, settings, normalizer }
    }

    /// Ranked insights for the current source contents.
    ///
    /// Never fails and never returns an empty list: a source failure, or a
    /// source with no valid records, yields [`fallback_insights`].
    pub async fn generate_insights(&self) -> Vec<SalesInsight> {
        info!(event_name = "insights.engine.started", source = self.source.name(), "generating insights");

        match self.load_records().await {
            Ok(records) if records.is_empty() => {
                warn!(
                    event_name = "insights.engine.fallback",
                    source = self.source.name(),
                    reason = "no_records",
                    "no sales data available; using fallback insights"
                );
                fallback_insights()
            }
            Ok(records) => {
                let insights = self.analyze_records(&records);
                info!(
                    event_name = "insights.engine.completed",
                    record_count = records.len(),
                    insight_count = insights.len(),
                    "insights generated"
                );
                insights
            }
            Err(error) => {
                warn!(
                    event_name = "insights.engine.fallback",
                    source = self.source.name(),
                    reason = error.error_class(),
                    error = %error,
                    "insight generation failed; using fallback insights"
                );
                fallback_insights()
            }
        }
    }

    /// Fetches every document from the source and keeps the valid ones.
    pub async fn load_records(&self) -> Result<Vec<EmployeeData>, ApplicationError> {
        let documents = self.source.fetch_documents().await?;
        Ok(self.normalizer.normalize_all(&documents))
    }

    /// Runs every analyzer over `records` and ranks the combined output.
    pub fn analyze_records(&self, records: &[EmployeeData]) -> Vec<SalesInsight> {
        let mut insights: Vec<SalesInsight> = ANALYZERS
            .iter()
            .flat_map(|analyzer| with_failure_isolation(analyzer, records, &self.settings))
            .collect();
        rank_insights(&mut insights, &self.settings.severity_weights);
        insights
    }
}

/// Canned insights shown when there is nothing to analyze.
pub fn fallback_insights() -> Vec<SalesInsight> {
    let created_at = Utc::now();
    vec![
        SalesInsight {
            id: "1".to_string(),
            insight_type: InsightType::Prediction,
            severity: Severity::High,
            title: "Peak Profitability Months Identified".to_string(),
            description: "November, December, March are predicted to be the most profitable months".to_string(),
            impact: 35,
            confidence: 84,
            actionable: true,
            employee_id: None,
            territory: None,
            timeframe: "Next 12 months".to_string(),
            created_at,
            data: InsightData::Empty,
        },
        SalesInsight {
            id: "2".to_string(),
            insight_type: InsightType::Recommendation,
            severity: Severity::Medium,
            title: "Data Collection Recommended".to_string(),
            description: "Connect real sales data to unlock personalized AI insights".to_string(),
            impact: 50,
            confidence: 100,
            actionable: true,
            employee_id: None,
            territory: None,
            timeframe: "Immediate".to_string(),
            created_at,
            data: InsightData::Empty,
        },
    ]
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::insights::normalizer::RawEmployeeDocument;
    use crate::insights::settings::SeverityWeights;
    use crate::source::{InMemoryEmployeeSource, SourceError};

    struct BrokenSource;

    #[async_trait]
    impl EmployeeSource for BrokenSource {
        async fn fetch_documents(&self) -> Result<Vec<RawEmployeeDocument>, SourceError> {
            Err(SourceError::Unavailable("document store offline".to_string()))
        }
    }

    fn fallback_ids(insights: &[SalesInsight]) -> Vec<&str> {
        insights.iter().map(|insight| insight.id.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_source_yields_fallback() {
        let engine = InsightsEngine::new(InMemoryEmployeeSource::default(), InsightsSettings::default());

        let insights = engine.generate_insights().await;

        assert_eq!(fallback_ids(&insights), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn source_failure_yields_fallback() {
        let engine = InsightsEngine::new(BrokenSource, InsightsSettings::default());

        assert!(matches!(engine.load_records().await, Err(ApplicationError::Source(_))));
        assert_eq!(fallback_ids(&engine.generate_insights().await), vec!["1", "2"]);
    }

    fn blank_id_document() -> RawEmployeeDocument {
        RawEmployeeDocument { id: "  ".to_string(), ..RawEmployeeDocument::default() }
    }

    #[tokio::test]
    async fn only_blank_ids_yield_fallback() {
        let source = InMemoryEmployeeSource::new(vec![blank_id_document()]);
        let engine = InsightsEngine::new(source, InsightsSettings::default());

        assert_eq!(engine.load_records().await, Ok(Vec::new()));
        assert_eq!(fallback_ids(&engine.generate_insights().await), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn blank_id_is_skipped_alongside_valid_documents() {
        let source = InMemoryEmployeeSource::from_json(
            r#"[
                { "id": "rep-1", "first_name": "Ada", "location": { "state": "NC" },
                  "sales": { "monthly": { "june": { "sold": 500, "target": 1000 } } } },
                { "id": "  " }
            ]"#,
        )
        .expect("documents should parse");
        let engine = InsightsEngine::new(source, InsightsSettings::default());

        let records = engine.load_records().await.expect("records");
        assert_eq!(records.len(), 1);

        let insights = engine.generate_insights().await;
        assert_ne!(fallback_ids(&insights), vec!["1", "2"]);
        assert!(insights.iter().any(|insight| insight.title == "Target Miss Risk"));
    }

    #[tokio::test]
    async fn oversized_severity_weights_rank_without_overflow() {
        let source = InMemoryEmployeeSource::from_json(
            r#"[{ "id": "rep-1", "sales": { "monthly": { "june": { "sold": 100, "target": 1000 } } } }]"#,
        )
        .expect("documents should parse");
        let settings = InsightsSettings {
            severity_weights: SeverityWeights { critical: u32::MAX, ..SeverityWeights::default() },
            ..InsightsSettings::default()
        };
        assert_eq!(settings.validate(), Ok(()));

        let insights = InsightsEngine::new(source, settings).generate_insights().await;

        assert_eq!(insights[0].severity, Severity::Critical);
    }

    #[test]
    fn fallback_is_prediction_then_recommendation() {
        let insights = fallback_insights();

        assert_eq!(insights[0].insight_type, InsightType::Prediction);
        assert_eq!(insights[0].confidence, 84);
        assert_eq!(insights[1].title, "Data Collection Recommended");
        assert_eq!(insights[1].timeframe, "Immediate");
    }
}
