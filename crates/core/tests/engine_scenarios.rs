use std::sync::Arc;

use salespulse_core::insights::CurrentMonthRule;
use salespulse_core::{
    filter_insights, InMemoryEmployeeSource, InsightFilter, InsightSummary, InsightType,
    InsightsEngine, InsightsSettings, SalesInsight, Severity,
};
use serde_json::{json, Value};

fn document(id: &str, state: &str, sold: f64, target: f64) -> Value {
    json!({
        "id": id,
        "first_name": format!("Rep-{id}"),
        "last_name": "Smith",
        "role": "Sales - Tier 1",
        "location": { "city": "Raleigh", "state": state },
        "sales": { "monthly": { "june": { "sold": sold, "target": target } } }
    })
}

fn engine_for(documents: Vec<Value>) -> InsightsEngine<InMemoryEmployeeSource> {
    let raw = Value::Array(documents).to_string();
    let source = InMemoryEmployeeSource::from_json(&raw).expect("documents should parse");
    InsightsEngine::new(source, InsightsSettings::default())
}

fn titles(insights: &[SalesInsight]) -> Vec<&str> {
    insights.iter().map(|insight| insight.title.as_str()).collect()
}

#[tokio::test]
async fn empty_source_returns_the_two_fallback_insights() {
    let insights = engine_for(Vec::new()).generate_insights().await;

    let ids: Vec<&str> = insights.iter().map(|insight| insight.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(insights[0].insight_type, InsightType::Prediction);
    assert_eq!(insights[1].insight_type, InsightType::Recommendation);
}

#[tokio::test]
async fn strong_territory_is_identified_end_to_end() {
    let engine = engine_for(vec![
        document("nc-1", "NC", 3000.0, 0.0),
        document("nc-2", "NC", 3000.0, 0.0),
        document("sc-1", "SC", 1000.0, 0.0),
        document("ga-1", "GA", 1000.0, 0.0),
    ]);

    let insights = engine.generate_insights().await;
    let territories: Vec<&SalesInsight> =
        insights.iter().filter(|insight| insight.territory.is_some()).collect();

    assert_eq!(territories.len(), 1);
    assert_eq!(territories[0].territory.as_deref(), Some("NC"));
    assert_eq!(territories[0].title, "High-Performing Territory Identified");
    assert!(territories[0].id.starts_with("optimization-"));
}

#[tokio::test]
async fn combined_output_is_ranked_by_weighted_confidence() {
    let mut documents: Vec<Value> =
        (0..11).map(|index| document(&format!("rep-{index}"), "NC", 100.0, 0.0)).collect();
    documents.push(document("star", "NC", 1000.0, 0.0));

    let insights = engine_for(documents).generate_insights().await;

    assert_eq!(
        titles(&insights),
        vec![
            "Exceptional Performance Detected",
            "Peak Profitability Months Identified",
            "Challenging Months Forecast",
            "Top Performer Best Practices",
        ]
    );
    assert_eq!(insights[0].severity, Severity::Critical);

    let weights = InsightsSettings::default().severity_weights;
    let scores: Vec<u32> = insights
        .iter()
        .map(|insight| weights.weight(insight.severity) * u32::from(insight.confidence))
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn ids_are_stable_across_runs() {
    let engine = engine_for(vec![
        document("nc-1", "NC", 500.0, 1000.0),
        document("nc-2", "NC", 1500.0, 1000.0),
        document("sc-1", "SC", 900.0, 1000.0),
    ]);

    let first = engine.generate_insights().await;
    let second = engine.generate_insights().await;

    let first_ids: Vec<&str> = first.iter().map(|insight| insight.id.as_str()).collect();
    let second_ids: Vec<&str> = second.iter().map(|insight| insight.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
    assert!(!first_ids.is_empty());
}

#[tokio::test]
async fn risk_and_forecast_alerts_come_from_targets() {
    let engine = engine_for(vec![
        document("behind", "NC", 500.0, 1000.0),
        document("ahead", "SC", 1500.0, 1000.0),
    ]);

    let insights = engine.generate_insights().await;

    let alerts = filter_insights(&insights, InsightFilter::Only(InsightType::Alert));
    let risk: Vec<&SalesInsight> =
        alerts.iter().filter(|insight| insight.title == "Target Miss Risk").collect();
    assert_eq!(risk.len(), 1);
    assert_eq!(risk[0].employee_id.as_ref().map(|id| id.as_str()), Some("behind"));
    assert_eq!(risk[0].severity, Severity::Critical);

    let forecasts = filter_insights(&insights, InsightFilter::Only(InsightType::Prediction));
    assert!(forecasts.iter().any(|insight| insight.title == "Sales Forecast: Increasing Trend"));

    let summary = InsightSummary::from_insights(&insights);
    assert_eq!(summary.total, insights.len());
    assert!(summary.critical >= 1);
}

#[tokio::test]
async fn shared_source_and_last_key_rule_are_supported() {
    let raw = json!([{
        "id": "rep-1",
        "first_name": "Ada",
        "location": { "state": "NC" },
        "sales": { "monthly": {
            "december": { "sold": 100.0, "target": 1000.0 },
            "january": { "sold": 2000.0, "target": 1000.0 }
        } }
    }])
    .to_string();
    let source = Arc::new(InMemoryEmployeeSource::from_json(&raw).expect("documents should parse"));

    let calendar = InsightsEngine::new(Arc::clone(&source), InsightsSettings::default());
    let last_key = InsightsEngine::new(
        source,
        InsightsSettings { current_month_rule: CurrentMonthRule::LastKey, ..InsightsSettings::default() },
    );

    let calendar_records = calendar.load_records().await.expect("records");
    let last_key_records = last_key.load_records().await.expect("records");

    assert_eq!(calendar_records[0].monthly_sales, 100.0);
    assert_eq!(last_key_records[0].monthly_sales, 2000.0);
    assert_eq!(calendar_records[0].yearly_sales, 2100.0);
}

#[tokio::test]
async fn current_month_crosses_the_year_boundary() {
    let raw = json!([{
        "id": "rep-1",
        "sales": { "monthly": {
            "2023-12": { "sold": 100.0 },
            "2024-01": { "sold": 2000.0 }
        } }
    }])
    .to_string();
    let source = InMemoryEmployeeSource::from_json(&raw).expect("documents should parse");

    let records = InsightsEngine::new(source, InsightsSettings::default())
        .load_records()
        .await
        .expect("records");

    assert_eq!(records[0].monthly_sales, 2000.0);
}
