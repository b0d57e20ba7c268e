//! Twelve-month revenue outlook built from the fixed seasonality table.

use std::cmp::Ordering;

use crate::domain::employee::EmployeeData;
use crate::domain::insight::{InsightData, InsightType, MonthlyPrediction, SalesInsight, Severity};
use crate::errors::DomainError;
use crate::insights::builder::InsightBuilder;
use crate::insights::seasonality::{
    month_name, LOW_SEASON_ACTIONS, PEAK_SEASON_DRIVERS, SEASONAL_DRIVERS, SEASONAL_FACTORS,
};
use crate::insights::settings::InsightsSettings;
use crate::insights::stats::format_currency;

pub const PREFIX: &str = "seasonal";

const MONTHS_PER_OUTLOOK: usize = 3;
const PREDICTION_CONFIDENCE: u8 = 80;

/// Emits a peak-months prediction and a low-months alert, or nothing when
/// the team has no yearly sales on record.
pub fn analyze(
    records: &[EmployeeData],
    _settings: &InsightsSettings,
) -> Result<Vec<SalesInsight>, DomainError> {
    let total_revenue: f64 =
        records.iter().map(|record| record.yearly_sales).filter(|sales| sales.is_finite()).sum();
    if records.is_empty() || total_revenue <= 0.0 {
        return Ok(Vec::new());
    }

    let employee_count = records.len() as f64;
    let avg_monthly_revenue = total_revenue / employee_count / 12.0;
    let predictions = monthly_predictions(avg_monthly_revenue, employee_count);

    Ok(vec![peak_months_insight(&predictions)?, low_months_insight(&predictions)?])
}

/// One prediction per calendar month, January first.
pub fn monthly_predictions(avg_monthly_revenue: f64, employee_count: f64) -> Vec<MonthlyPrediction> {
    SEASONAL_FACTORS
        .iter()
        .zip(SEASONAL_DRIVERS)
        .enumerate()
        .map(|(index, (&factor, drivers))| {
            let month = index as u8 + 1;
            MonthlyPrediction {
                month,
                month_name: month_name(month).to_string(),
                predicted_revenue: avg_monthly_revenue * employee_count * factor,
                confidence: PREDICTION_CONFIDENCE,
                seasonality_factor: factor,
                key_drivers: drivers.iter().map(|driver| driver.to_string()).collect(),
            }
        })
        .collect()
}

/// The `MONTHS_PER_OUTLOOK` months ranked by `order`; the sort is stable so
/// equal revenue keeps calendar order.
fn select_months(
    predictions: &[MonthlyPrediction],
    order: impl Fn(&MonthlyPrediction, &MonthlyPrediction) -> Ordering,
) -> Vec<MonthlyPrediction> {
    let mut ranked = predictions.to_vec();
    ranked.sort_by(order);
    ranked.truncate(MONTHS_PER_OUTLOOK);
    ranked
}

fn summarize(months: &[MonthlyPrediction]) -> (String, f64) {
    let names = months.iter().map(|month| month.month_name.as_str()).collect::<Vec<_>>().join(", ");
    let average = months.iter().map(|month| month.predicted_revenue).sum::<f64>() / MONTHS_PER_OUTLOOK as f64;
    (names, average)
}

fn peak_months_insight(predictions: &[MonthlyPrediction]) -> Result<SalesInsight, DomainError> {
    let top = select_months(predictions, |a, b| b.predicted_revenue.total_cmp(&a.predicted_revenue));
    let (names, average) = summarize(&top);

    InsightBuilder::new(PREFIX)
        .with_type(InsightType::Prediction)
        .with_severity(Severity::High)
        .with_title("Peak Profitability Months Identified")
        .with_description(format!(
            "{names} are predicted to be the most profitable months with average revenue of {}",
            format_currency(average)
        ))
        .with_impact(40.0)
        .with_confidence(84.0)
        .with_actionable(true)
        .with_timeframe("Next 12 months")
        .with_data(InsightData::SeasonalOutlook {
            predictions: top,
            key_drivers: PEAK_SEASON_DRIVERS.iter().map(|driver| driver.to_string()).collect(),
            suggested_actions: Vec::new(),
        })
        .build()
}

fn low_months_insight(predictions: &[MonthlyPrediction]) -> Result<SalesInsight, DomainError> {
    let bottom = select_months(predictions, |a, b| a.predicted_revenue.total_cmp(&b.predicted_revenue));
    let (names, average) = summarize(&bottom);

    InsightBuilder::new(PREFIX)
        .with_type(InsightType::Alert)
        .with_severity(Severity::Medium)
        .with_title("Challenging Months Forecast")
        .with_description(format!(
            "{names} are predicted to have lower revenue averaging {}. Consider strategic initiatives",
            format_currency(average)
        ))
        .with_impact(30.0)
        .with_confidence(79.0)
        .with_actionable(true)
        .with_timeframe("Next 12 months")
        .with_data(InsightData::SeasonalOutlook {
            predictions: bottom,
            key_drivers: Vec::new(),
            suggested_actions: LOW_SEASON_ACTIONS.iter().map(|action| action.to_string()).collect(),
        })
        .build()
}
