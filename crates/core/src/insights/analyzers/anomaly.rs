use crate::domain::employee::EmployeeData;
use crate::domain::insight::{InsightData, InsightType, SalesInsight, Severity};
use crate::errors::DomainError;
use crate::insights::builder::InsightBuilder;
use crate::insights::settings::InsightsSettings;
use crate::insights::stats::{format_currency, group_by_employee, percent_of, StatisticalMetrics};

pub const PREFIX: &str = "anomaly";

/// Flags employees whose current-month sales sit more than `anomaly_threshold`
/// standard deviations away from the team mean.
pub fn analyze(
    records: &[EmployeeData],
    settings: &InsightsSettings,
) -> Result<Vec<SalesInsight>, DomainError> {
    let sales: Vec<f64> = records.iter().map(EmployeeData::sales_value).collect();
    let Some(stats) = StatisticalMetrics::from_values(&sales) else {
        return Ok(Vec::new());
    };

    let mut insights = Vec::new();
    for (_, group) in group_by_employee(records) {
        let Some(record) = group.first() else {
            continue;
        };
        let sales = record.sales_value();
        let z_score = stats.z_score(sales);
        if z_score > settings.anomaly_threshold {
            insights.push(anomaly_insight(record, sales, stats.mean, z_score, settings)?);
        }
    }

    Ok(insights)
}

fn anomaly_insight(
    record: &EmployeeData,
    sales: f64,
    mean: f64,
    z_score: f64,
    settings: &InsightsSettings,
) -> Result<SalesInsight, DomainError> {
    let is_positive = sales > mean;
    let percent_diff = percent_of((sales - mean).abs(), mean);
    let (label, verb) = if is_positive { ("Exceptional", "exceeded") } else { ("Concerning", "fell short of") };
    let severity = if z_score > settings.critical_z_score { Severity::Critical } else { Severity::High };

    InsightBuilder::new(PREFIX)
        .with_type(InsightType::Anomaly)
        .with_severity(severity)
        .with_title(format!("{label} Performance Detected"))
        .with_description(format!(
            "{} {verb} expected sales by {percent_diff}% ({} vs expected {})",
            record.full_name(),
            format_currency(sales),
            format_currency(mean),
        ))
        .with_impact((z_score * 20.0).round())
        .with_confidence((z_score * 25.0).round())
        .with_actionable(!is_positive)
        .with_employee_id(record.employee_id().clone())
        .with_timeframe("This month")
        .with_data(InsightData::Anomaly { z_score, mean, actual: sales })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::fixtures::employee;

    fn team(regular: usize, regular_sales: f64, outlier_sales: f64) -> Vec<EmployeeData> {
        let mut records: Vec<EmployeeData> =
            (0..regular).map(|index| employee(&format!("e-{index}"), "NC", regular_sales, 0.0)).collect();
        records.push(employee("outlier", "NC", outlier_sales, 0.0));
        records
    }

    #[test]
    fn equal_sales_produce_no_anomalies() {
        let records = team(5, 250.0, 250.0);

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert!(insights.is_empty());
    }

    #[test]
    fn single_outlier_among_five_stays_below_threshold() {
        // Population std-dev puts a lone outlier at z = sqrt(n - 1) = 2.0 here.
        let records = team(4, 100.0, 1000.0);

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert!(insights.is_empty());
    }

    #[test]
    fn outlier_among_nine_is_high_severity() {
        let records = team(8, 100.0, 1000.0);

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.severity, Severity::High);
        assert_eq!(insight.title, "Exceptional Performance Detected");
        assert_eq!(insight.impact, 57);
        assert_eq!(insight.confidence, 71);
        assert!(!insight.actionable);
        assert_eq!(insight.employee_id.as_ref().map(|id| id.as_str()), Some("outlier"));
        assert!(insight.id.starts_with("anomaly-"));
        assert!(insight.description.contains("exceeded expected sales by 400% ($1,000 vs expected $200)"));
    }

    #[test]
    fn outlier_among_twelve_is_critical() {
        let records = team(11, 100.0, 1000.0);

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Critical);
        assert_eq!(insights[0].impact, 66);
        assert_eq!(insights[0].confidence, 83);
    }

    #[test]
    fn low_outlier_is_concerning_and_actionable() {
        let records = team(11, 1000.0, 0.0);

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Concerning Performance Detected");
        assert!(insights[0].actionable);
        assert!(insights[0].description.contains("fell short of"));
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(analyze(&[], &InsightsSettings::default()).expect("analyze").is_empty());
    }
}
