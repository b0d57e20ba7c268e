pub mod config;
pub mod domain;
pub mod errors;
pub mod insights;
pub mod source;

pub use domain::employee::{EmployeeData, EmployeeId};
pub use domain::insight::{InsightData, InsightType, MonthlyPrediction, SalesInsight, Severity, Trend};
pub use errors::{ApplicationError, DomainError};
pub use insights::{
    filter_insights, InsightFilter, InsightSummary, InsightsEngine, InsightsSettings,
    RawEmployeeDocument,
};
pub use source::{EmployeeSource, InMemoryEmployeeSource, SourceError};
