use crate::domain::employee::EmployeeData;
use crate::domain::insight::{InsightData, InsightType, SalesInsight, Severity, Trend};
use crate::errors::DomainError;
use crate::insights::builder::InsightBuilder;
use crate::insights::settings::InsightsSettings;
use crate::insights::stats::{format_currency, percent_over};

pub const PREFIX: &str = "prediction";

/// Projects the current month over a full year and flags employees headed
/// past their annual target by more than the overshoot ratio.
pub fn analyze(
    records: &[EmployeeData],
    settings: &InsightsSettings,
) -> Result<Vec<SalesInsight>, DomainError> {
    let mut insights = Vec::new();

    for record in records.iter().filter(|record| record.has_target()) {
        let projected = record.sales_value() * 12.0;
        let yearly_target = if record.yearly_target > 0.0 && record.yearly_target.is_finite() {
            record.yearly_target
        } else {
            record.target_value() * 12.0
        };

        if projected > yearly_target * settings.forecast_overshoot_ratio {
            insights.push(forecast_insight(record, projected, yearly_target)?);
        }
    }

    Ok(insights)
}

fn forecast_insight(
    record: &EmployeeData,
    projected: f64,
    yearly_target: f64,
) -> Result<SalesInsight, DomainError> {
    let overshoot = percent_over(projected, yearly_target);

    InsightBuilder::new(PREFIX)
        .with_type(InsightType::Prediction)
        .with_severity(Severity::Medium)
        .with_title("Sales Forecast: Increasing Trend")
        .with_description(format!(
            "{} is on track to exceed annual target by {overshoot}% (projected {} vs target {})",
            record.full_name(),
            format_currency(projected),
            format_currency(yearly_target),
        ))
        .with_impact(overshoot)
        .with_confidence(75.0)
        .with_actionable(false)
        .with_employee_id(record.employee_id().clone())
        .with_timeframe("Year-end projection")
        .with_data(InsightData::Forecast { predicted_value: projected, yearly_target, trend: Trend::Increasing })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::fixtures::employee;

    #[test]
    fn overshooting_employee_gets_a_forecast() {
        let records = vec![employee("e-1", "NC", 1500.0, 1000.0)];

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.insight_type, InsightType::Prediction);
        assert_eq!(insight.severity, Severity::Medium);
        assert_eq!(insight.impact, 50);
        assert_eq!(insight.confidence, 75);
        assert!(!insight.actionable);
        assert_eq!(
            insight.data,
            InsightData::Forecast { predicted_value: 18_000.0, yearly_target: 12_000.0, trend: Trend::Increasing }
        );
        assert!(insight.description.contains("(projected $18,000 vs target $12,000)"));
    }

    #[test]
    fn stored_yearly_target_takes_precedence() {
        let mut record = employee("e-1", "NC", 1500.0, 1000.0);
        record.yearly_target = 20_000.0;

        let insights = analyze(&[record], &InsightsSettings::default()).expect("analyze");

        assert!(insights.is_empty());
    }

    #[test]
    fn overshoot_ratio_is_strict() {
        // 1100 * 12 == 12000 * 1.1 exactly, which is not "more than".
        let records = vec![employee("e-1", "NC", 1100.0, 1000.0), employee("e-2", "NC", 5000.0, 0.0)];

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert!(insights.is_empty());
    }
}
