use std::path::PathBuf;

use anyhow::Context;
use salespulse_core::config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
use salespulse_core::insights::CurrentMonthRule;
use salespulse_core::{
    filter_insights, InMemoryEmployeeSource, InsightFilter, InsightSummary, InsightsEngine,
    SalesInsight,
};
use serde::Serialize;

use crate::commands::CommandResult;
use crate::source::JsonFileSource;

#[derive(Clone, Debug, Default)]
pub struct GenerateArgs {
    pub config_path: Option<PathBuf>,
    /// Overrides `source.documents_path`.
    pub input: Option<PathBuf>,
    /// Overrides `insights.current_month_rule`.
    pub month_rule: Option<CurrentMonthRule>,
    pub filter: InsightFilter,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct GenerateReport {
    command: &'static str,
    status: &'static str,
    filter: String,
    summary: InsightSummary,
    insights: Vec<SalesInsight>,
}

pub fn run(args: GenerateArgs) -> CommandResult {
    let overrides = ConfigOverrides {
        documents_path: args.input.clone(),
        current_month_rule: args.month_rule,
        ..ConfigOverrides::default()
    };
    let config = match load_config(args.config_path.clone(), overrides) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "generate",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let insights = match generate(&config) {
        Ok(insights) => filter_insights(&insights, args.filter),
        Err(error) => {
            return CommandResult::failure("generate", "runtime_init", format!("{error:#}"), 3);
        }
    };

    if args.json {
        CommandResult::report(&GenerateReport {
            command: "generate",
            status: "ok",
            filter: args.filter.to_string(),
            summary: InsightSummary::from_insights(&insights),
            insights,
        })
    } else {
        CommandResult::text(render_insights(&insights))
    }
}

/// An explicit `--config` path must exist; otherwise the default paths are probed.
pub(crate) fn load_config(
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    let require_file = config_path.is_some();
    AppConfig::load(LoadOptions { config_path, require_file, overrides })
}

/// Ranked insights for the configured source; no source means the fallback set.
pub(crate) fn generate(config: &AppConfig) -> anyhow::Result<Vec<SalesInsight>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;

    let settings = config.insights.clone();
    let insights = match &config.source.documents_path {
        Some(path) => {
            let engine = InsightsEngine::new(JsonFileSource::new(path), settings);
            runtime.block_on(engine.generate_insights())
        }
        None => {
            tracing::info!(
                event_name = "cli.generate.no_source",
                "no documents path configured; generating from an empty source"
            );
            let engine = InsightsEngine::new(InMemoryEmployeeSource::default(), settings);
            runtime.block_on(engine.generate_insights())
        }
    };

    Ok(insights)
}

fn render_insights(insights: &[SalesInsight]) -> String {
    if insights.is_empty() {
        return "no insights match the selected filter".to_string();
    }

    let mut lines = Vec::with_capacity(insights.len() * 3);
    for insight in insights {
        lines.push(format!(
            "[{}] {} ({}, confidence {}%, impact {})",
            insight.severity.as_str().to_ascii_uppercase(),
            insight.title,
            insight.insight_type.as_str(),
            insight.confidence,
            insight.impact,
        ));
        lines.push(format!("    {}", insight.description));
        lines.push(format!("    timeframe: {} | id: {}", insight.timeframe, insight.id));
    }
    lines.join("\n")
}
