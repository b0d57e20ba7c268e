//! Sales insights: normalization, the five analyzers, ranking and the engine
//! that ties them together.

pub mod analyzers;
pub mod builder;
pub mod engine;
pub mod normalizer;
pub mod ranking;
pub mod seasonality;
pub mod settings;
pub mod stats;

pub use builder::{IdentityField, InsightBuilder, DEFAULT_IDENTITY};
pub use engine::{fallback_insights, InsightsEngine};
pub use normalizer::{MonthlyFigures, MonthlyLedger, Normalizer, RawEmployeeDocument};
pub use ranking::{filter_insights, rank_insights, InsightFilter, InsightSummary};
pub use settings::{CurrentMonthRule, InsightsSettings, SeverityWeights};
