use crate::domain::employee::EmployeeData;
use crate::domain::insight::{InsightData, InsightType, SalesInsight, Severity};
use crate::errors::DomainError;
use crate::insights::builder::InsightBuilder;
use crate::insights::settings::InsightsSettings;
use crate::insights::stats::{format_currency, group_by_territory, mean_sales, percent_over};

pub const PREFIX: &str = "optimization";

/// Territory recommendations followed by a single top-performer recommendation.
pub fn analyze(
    records: &[EmployeeData],
    settings: &InsightsSettings,
) -> Result<Vec<SalesInsight>, DomainError> {
    let mut insights = territory_insights(records, settings)?;
    insights.extend(top_performer_insight(records)?);
    Ok(insights)
}

fn territory_insights(
    records: &[EmployeeData],
    settings: &InsightsSettings,
) -> Result<Vec<SalesInsight>, DomainError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let everyone: Vec<&EmployeeData> = records.iter().collect();
    let overall_avg = mean_sales(&everyone);

    let mut insights = Vec::new();
    for (territory, members) in group_by_territory(records) {
        if members.len() < settings.min_territory_size {
            continue;
        }
        let avg_sales = mean_sales(&members);
        if avg_sales <= overall_avg * settings.territory_uplift_ratio {
            continue;
        }

        let uplift = percent_over(avg_sales, overall_avg);
        insights.push(
            InsightBuilder::new(PREFIX)
                .with_type(InsightType::Recommendation)
                .with_severity(Severity::Medium)
                .with_title("High-Performing Territory Identified")
                .with_description(format!(
                    "{territory} territory is outperforming average by {uplift}% ({} vs {}). \
                     Consider expanding presence here",
                    format_currency(avg_sales),
                    format_currency(overall_avg),
                ))
                .with_impact(uplift)
                .with_confidence(80.0)
                .with_actionable(true)
                .with_territory(territory)
                .with_timeframe("Next quarter")
                .with_data(InsightData::Territory { avg_sales, overall_avg, territory: territory.to_string() })
                .build()?,
        );
    }

    Ok(insights)
}

fn top_performer_insight(records: &[EmployeeData]) -> Result<Option<SalesInsight>, DomainError> {
    // first record wins a tie
    let Some(top) = records.iter().reduce(|best, record| {
        if record.sales_value() > best.sales_value() {
            record
        } else {
            best
        }
    }) else {
        return Ok(None);
    };

    let name = top.full_name();
    let sales = top.sales_value();
    InsightBuilder::new(PREFIX)
        .with_type(InsightType::Recommendation)
        .with_severity(Severity::Low)
        .with_title("Top Performer Best Practices")
        .with_description(format!(
            "{name} leads with {}. Consider sharing their strategies team-wide",
            format_currency(sales)
        ))
        .with_impact(30.0)
        .with_confidence(90.0)
        .with_actionable(true)
        .with_employee_id(top.employee_id().clone())
        .with_timeframe("Ongoing")
        .with_data(InsightData::TopPerformer { top_performer: name, sales })
        .build()
        .map(Some)
}
