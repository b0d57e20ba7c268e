use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::insights::settings::{CurrentMonthRule, InsightsSettings};

/// Config file names probed, in order, when no explicit path is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["salespulse.toml", "config/salespulse.toml"];

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub insights: InsightsSettings,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default)]
pub struct SourceConfig {
    /// JSON array of raw employee documents.
    pub documents_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub documents_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub current_month_rule: Option<CurrentMonthRule>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then `SALESPULSE_*` env vars, then `options.overrides`.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATHS[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(insights) = patch.insights {
            let settings = &mut self.insights;
            if let Some(value) = insights.anomaly_threshold {
                settings.anomaly_threshold = value;
            }
            if let Some(value) = insights.critical_z_score {
                settings.critical_z_score = value;
            }
            if let Some(value) = insights.risk_ratio {
                settings.risk_ratio = value;
            }
            if let Some(value) = insights.risk_critical_percent {
                settings.risk_critical_percent = value;
            }
            if let Some(value) = insights.forecast_overshoot_ratio {
                settings.forecast_overshoot_ratio = value;
            }
            if let Some(value) = insights.territory_uplift_ratio {
                settings.territory_uplift_ratio = value;
            }
            if let Some(value) = insights.min_territory_size {
                settings.min_territory_size = value;
            }
            if let Some(value) = insights.current_month_rule {
                settings.current_month_rule = value;
            }
            if let Some(weights) = insights.severity_weights {
                let target = &mut settings.severity_weights;
                if let Some(value) = weights.critical {
                    target.critical = value;
                }
                if let Some(value) = weights.high {
                    target.high = value;
                }
                if let Some(value) = weights.medium {
                    target.medium = value;
                }
                if let Some(value) = weights.low {
                    target.low = value;
                }
            }
        }

        if let Some(source) = patch.source {
            if let Some(documents_path) = source.documents_path {
                self.source.documents_path = Some(documents_path);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let settings = &mut self.insights;
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_ANOMALY_THRESHOLD") {
            settings.anomaly_threshold = parse_f64("SALESPULSE_INSIGHTS_ANOMALY_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_CRITICAL_Z_SCORE") {
            settings.critical_z_score = parse_f64("SALESPULSE_INSIGHTS_CRITICAL_Z_SCORE", &value)?;
        }
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_RISK_RATIO") {
            settings.risk_ratio = parse_f64("SALESPULSE_INSIGHTS_RISK_RATIO", &value)?;
        }
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_RISK_CRITICAL_PERCENT") {
            settings.risk_critical_percent =
                parse_f64("SALESPULSE_INSIGHTS_RISK_CRITICAL_PERCENT", &value)?;
        }
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_FORECAST_OVERSHOOT_RATIO") {
            settings.forecast_overshoot_ratio =
                parse_f64("SALESPULSE_INSIGHTS_FORECAST_OVERSHOOT_RATIO", &value)?;
        }
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_TERRITORY_UPLIFT_RATIO") {
            settings.territory_uplift_ratio =
                parse_f64("SALESPULSE_INSIGHTS_TERRITORY_UPLIFT_RATIO", &value)?;
        }
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_MIN_TERRITORY_SIZE") {
            settings.min_territory_size = parse_usize("SALESPULSE_INSIGHTS_MIN_TERRITORY_SIZE", &value)?;
        }
        if let Some(value) = read_env("SALESPULSE_INSIGHTS_CURRENT_MONTH_RULE") {
            settings.current_month_rule = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "SALESPULSE_INSIGHTS_CURRENT_MONTH_RULE".to_string(),
                value: value.clone(),
            })?;
        }

        if let Some(value) = read_env("SALESPULSE_SOURCE_DOCUMENTS_PATH") {
            self.source.documents_path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("SALESPULSE_LOGGING_LEVEL").or_else(|| read_env("SALESPULSE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SALESPULSE_LOGGING_FORMAT").or_else(|| read_env("SALESPULSE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(documents_path) = overrides.documents_path {
            self.source.documents_path = Some(documents_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(rule) = overrides.current_month_rule {
            self.insights.current_month_rule = rule;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.insights.validate().map_err(ConfigError::Validation)?;
        validate_source(&self.source)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The explicit path when it exists, else the first of [`DEFAULT_CONFIG_PATHS`] on disk.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_source(source: &SourceConfig) -> Result<(), ConfigError> {
    if let Some(path) = &source.documents_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "source.documents_path must not be empty when set".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    insights: Option<InsightsPatch>,
    source: Option<SourcePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct InsightsPatch {
    anomaly_threshold: Option<f64>,
    critical_z_score: Option<f64>,
    risk_ratio: Option<f64>,
    risk_critical_percent: Option<f64>,
    forecast_overshoot_ratio: Option<f64>,
    territory_uplift_ratio: Option<f64>,
    min_territory_size: Option<usize>,
    current_month_rule: Option<CurrentMonthRule>,
    severity_weights: Option<SeverityWeightsPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SeverityWeightsPatch {
    critical: Option<u32>,
    high: Option<u32>,
    medium: Option<u32>,
    low: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct SourcePatch {
    documents_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
