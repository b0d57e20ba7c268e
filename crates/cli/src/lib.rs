pub mod commands;
pub mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use salespulse_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
use salespulse_core::insights::CurrentMonthRule;
use salespulse_core::InsightFilter;

use crate::commands::generate::GenerateArgs;
use crate::commands::summary::SummaryArgs;

#[derive(Debug, Parser)]
#[command(
    name = "salespulse",
    about = "SalesPulse insights CLI",
    long_about = "Generate ranked sales insights from employee documents and inspect the effective configuration.",
    after_help = "Examples:\n  salespulse generate --input employees.json\n  salespulse generate --filter alert --json\n  salespulse summary\n  salespulse config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a salespulse.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run every analyzer and print the ranked insights")]
    Generate {
        #[arg(long, help = "JSON file of employee documents (overrides source.documents_path)")]
        input: Option<PathBuf>,
        #[arg(
            long,
            default_value = "all",
            help = "Only show one insight type: all|anomaly|prediction|recommendation|alert"
        )]
        filter: InsightFilter,
        #[arg(long, help = "Current month selection: latest_calendar_month|last_key")]
        month_rule: Option<CurrentMonthRule>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print total, critical, actionable and average-confidence counts")]
    Summary {
        #[arg(long, help = "JSON file of employee documents (overrides source.documents_path)")]
        input: Option<PathBuf>,
        #[arg(long, help = "Current month selection: latest_calendar_month|last_key")]
        month_rule: Option<CurrentMonthRule>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // A broken config is reported by the command itself; logging then stays off.
    if let Ok(config) = AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { log_level: cli.log_level, ..ConfigOverrides::default() },
    }) {
        init_logging(&config.logging);
    }

    let result = match cli.command {
        Command::Generate { input, filter, month_rule, json } => {
            commands::generate::run(GenerateArgs {
                config_path: cli.config,
                input,
                month_rule,
                filter,
                json,
            })
        }
        Command::Summary { input, month_rule } => commands::summary::run(SummaryArgs {
            config_path: cli.config,
            input,
            month_rule,
        }),
        Command::Config => commands::CommandResult::text(commands::config::run(cli.config)),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Installs the global subscriber; logs go to stderr so stdout stays machine readable.
///
/// Call once per process.
pub fn init_logging(logging: &LoggingConfig) {
    use tracing::Level;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_installs_the_configured_level() {
        init_logging(&LoggingConfig { level: "debug".to_string(), format: LogFormat::Json });

        assert!(tracing::enabled!(tracing::Level::DEBUG));
        assert!(!tracing::enabled!(tracing::Level::TRACE));
    }
}
