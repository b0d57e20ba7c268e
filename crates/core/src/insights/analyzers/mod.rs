//! The five analyzers and the wrapper that keeps one failing analyzer from
//! taking the whole run down with it.

pub mod anomaly;
pub mod optimization;
pub mod prediction;
pub mod risk;
pub mod seasonal;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::domain::employee::EmployeeData;
use crate::domain::insight::SalesInsight;
use crate::errors::DomainError;
use crate::insights::settings::InsightsSettings;

pub type AnalyzeFn = fn(&[EmployeeData], &InsightsSettings) -> Result<Vec<SalesInsight>, DomainError>;

#[derive(Clone, Copy, Debug)]
pub struct Analyzer {
    pub name: &'static str,
    /// Id prefix for every insight the analyzer emits.
    pub prefix: &'static str,
    pub analyze: AnalyzeFn,
}

/// Analyzers in the order their output is concatenated before ranking.
pub const ANALYZERS: [Analyzer; 5] = [
    Analyzer { name: "anomaly_detector", prefix: anomaly::PREFIX, analyze: anomaly::analyze },
    Analyzer { name: "predictive_analytics", prefix: prediction::PREFIX, analyze: prediction::analyze },
    Analyzer { name: "risk_analyzer", prefix: risk::PREFIX, analyze: risk::analyze },
    Analyzer { name: "optimization_engine", prefix: optimization::PREFIX, analyze: optimization::analyze },
    Analyzer { name: "seasonal_predictor", prefix: seasonal::PREFIX, analyze: seasonal::analyze },
];

/// Runs `analyzer`, turning an error or a panic into an empty result.
pub fn with_failure_isolation(
    analyzer: &Analyzer,
    records: &[EmployeeData],
    settings: &InsightsSettings,
) -> Vec<SalesInsight> {
    match panic::catch_unwind(AssertUnwindSafe(|| (analyzer.analyze)(records, settings))) {
        Ok(Ok(insights)) => {
            debug!(
                event_name = "insights.analyzer.completed",
                analyzer = analyzer.name,
                insight_count = insights.len(),
                "analyzer completed"
            );
            insights
        }
        Ok(Err(error)) => {
            warn!(
                event_name = "insights.analyzer.failed",
                analyzer = analyzer.name,
                error = %error,
                "analyzer returned an error; contributing no insights"
            );
            Vec::new()
        }
        Err(payload) => {
            warn!(
                event_name = "insights.analyzer.failed",
                analyzer = analyzer.name,
                error = panic_message(payload.as_ref()),
                "analyzer panicked; contributing no insights"
            );
            Vec::new()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::fixtures::employee;

    fn failing(_: &[EmployeeData], _: &InsightsSettings) -> Result<Vec<SalesInsight>, DomainError> {
        Err(DomainError::InvariantViolation("forced failure".to_string()))
    }

    fn panicking(_: &[EmployeeData], _: &InsightsSettings) -> Result<Vec<SalesInsight>, DomainError> {
        panic!("analyzer blew up")
    }

    #[test]
    fn error_result_becomes_empty_list() {
        let analyzer = Analyzer { name: "failing", prefix: "test", analyze: failing };

        let insights =
            with_failure_isolation(&analyzer, &[employee("e-1", "NC", 10.0, 0.0)], &InsightsSettings::default());

        assert!(insights.is_empty());
    }

    #[test]
    fn panic_becomes_empty_list() {
        let analyzer = Analyzer { name: "panicking", prefix: "test", analyze: panicking };

        let insights = with_failure_isolation(&analyzer, &[], &InsightsSettings::default());

        assert!(insights.is_empty());
    }

    #[test]
    fn registry_prefixes_are_unique() {
        let mut prefixes: Vec<&str> = ANALYZERS.iter().map(|analyzer| analyzer.prefix).collect();
        prefixes.sort_unstable();
        prefixes.dedup();

        assert_eq!(prefixes, vec!["anomaly", "optimization", "prediction", "risk", "seasonal"]);
    }

    #[test]
    fn panic_message_reads_string_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
    }
}
