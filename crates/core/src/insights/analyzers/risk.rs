use crate::domain::employee::EmployeeData;
use crate::domain::insight::{InsightData, InsightType, SalesInsight, Severity};
use crate::errors::DomainError;
use crate::insights::builder::InsightBuilder;
use crate::insights::settings::InsightsSettings;
use crate::insights::stats::{format_currency, percent_of};

pub const PREFIX: &str = "risk";

pub fn analyze(
    records: &[EmployeeData],
    settings: &InsightsSettings,
) -> Result<Vec<SalesInsight>, DomainError> {
    records
        .iter()
        .filter(|record| record.has_target())
        .filter(|record| record.sales_value() < record.target_value() * settings.risk_ratio)
        .map(|record| shortfall_insight(record, settings))
        .collect()
}

fn shortfall_insight(record: &EmployeeData, settings: &InsightsSettings) -> Result<SalesInsight, DomainError> {
    let current_sales = record.sales_value();
    let target = record.target_value();
    let shortfall = target - current_sales;
    let shortfall_percent = percent_of(shortfall, target);
    let severity =
        if shortfall_percent > settings.risk_critical_percent { Severity::Critical } else { Severity::High };

    InsightBuilder::new(PREFIX)
        .with_type(InsightType::Alert)
        .with_severity(severity)
        .with_title("Target Miss Risk")
        .with_description(format!(
            "{} is {shortfall_percent}% below monthly target ({} shortfall)",
            record.full_name(),
            format_currency(shortfall),
        ))
        .with_impact(shortfall_percent)
        .with_confidence(85.0)
        .with_actionable(true)
        .with_employee_id(record.employee_id().clone())
        .with_timeframe("This month")
        .with_data(InsightData::Shortfall { shortfall, shortfall_percent, current_sales, target })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::fixtures::employee;

    #[test]
    fn exactly_eighty_percent_is_not_at_risk() {
        let records = vec![employee("e-1", "NC", 800.0, 1000.0)];

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert!(insights.is_empty());
    }

    #[test]
    fn one_unit_below_the_line_is_flagged_high() {
        let records = vec![employee("e-1", "NC", 799.0, 1000.0)];

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.insight_type, InsightType::Alert);
        assert_eq!(insight.severity, Severity::High);
        assert_eq!(insight.impact, 20);
        assert_eq!(insight.confidence, 85);
        assert!(insight.actionable);
        assert!(insight.description.ends_with("is 20% below monthly target ($201 shortfall)"));
    }

    #[test]
    fn deep_shortfall_is_critical() {
        let records = vec![employee("e-1", "NC", 500.0, 1000.0)];

        let insights = analyze(&records, &InsightsSettings::default()).expect("analyze");

        assert_eq!(insights[0].severity, Severity::Critical);
        assert_eq!(
            insights[0].data,
            InsightData::Shortfall { shortfall: 500.0, shortfall_percent: 50.0, current_sales: 500.0, target: 1000.0 }
        );
    }

    #[test]
    fn employees_without_targets_are_skipped() {
        let records = vec![employee("e-1", "NC", 0.0, 0.0)];

        assert!(analyze(&records, &InsightsSettings::default()).expect("analyze").is_empty());
    }
}
