use std::path::PathBuf;

use salespulse_core::config::ConfigOverrides;
use salespulse_core::insights::CurrentMonthRule;
use salespulse_core::InsightSummary;
use serde::Serialize;

use crate::commands::generate::{generate, load_config};
use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct SummaryReport {
    command: &'static str,
    status: &'static str,
    #[serde(flatten)]
    summary: InsightSummary,
}

#[derive(Clone, Debug, Default)]
pub struct SummaryArgs {
    pub config_path: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub month_rule: Option<CurrentMonthRule>,
}

/// Dashboard stat block over the full, unfiltered insight list.
pub fn run(args: SummaryArgs) -> CommandResult {
    let overrides = ConfigOverrides {
        documents_path: args.input,
        current_month_rule: args.month_rule,
        ..ConfigOverrides::default()
    };
    let config = match load_config(args.config_path, overrides) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "summary",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    match generate(&config) {
        Ok(insights) => CommandResult::report(&SummaryReport {
            command: "summary",
            status: "ok",
            summary: InsightSummary::from_insights(&insights),
        }),
        Err(error) => CommandResult::failure("summary", "runtime_init", format!("{error:#}"), 3),
    }
}
