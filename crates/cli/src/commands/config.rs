use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use salespulse_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run(config_path: Option<PathBuf>) -> String {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.clone(),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let file_path = resolve_config_path(config_path.as_deref());
    let file_doc = load_config_file_doc(file_path.as_deref());
    let attribution = Attribution { file_doc: file_doc.as_ref(), file_path: file_path.as_deref() };

    let settings = &config.insights;
    let weights = settings.severity_weights;
    let documents_path = config
        .source
        .documents_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());

    let entries: [(&str, String, &[&str]); 15] = [
        (
            "insights.anomaly_threshold",
            settings.anomaly_threshold.to_string(),
            &["SALESPULSE_INSIGHTS_ANOMALY_THRESHOLD"],
        ),
        (
            "insights.critical_z_score",
            settings.critical_z_score.to_string(),
            &["SALESPULSE_INSIGHTS_CRITICAL_Z_SCORE"],
        ),
        ("insights.risk_ratio", settings.risk_ratio.to_string(), &["SALESPULSE_INSIGHTS_RISK_RATIO"]),
        (
            "insights.risk_critical_percent",
            settings.risk_critical_percent.to_string(),
            &["SALESPULSE_INSIGHTS_RISK_CRITICAL_PERCENT"],
        ),
        (
            "insights.forecast_overshoot_ratio",
            settings.forecast_overshoot_ratio.to_string(),
            &["SALESPULSE_INSIGHTS_FORECAST_OVERSHOOT_RATIO"],
        ),
        (
            "insights.territory_uplift_ratio",
            settings.territory_uplift_ratio.to_string(),
            &["SALESPULSE_INSIGHTS_TERRITORY_UPLIFT_RATIO"],
        ),
        (
            "insights.min_territory_size",
            settings.min_territory_size.to_string(),
            &["SALESPULSE_INSIGHTS_MIN_TERRITORY_SIZE"],
        ),
        (
            "insights.current_month_rule",
            format!("{:?}", settings.current_month_rule),
            &["SALESPULSE_INSIGHTS_CURRENT_MONTH_RULE"],
        ),
        ("insights.severity_weights.critical", weights.critical.to_string(), &[]),
        ("insights.severity_weights.high", weights.high.to_string(), &[]),
        ("insights.severity_weights.medium", weights.medium.to_string(), &[]),
        ("insights.severity_weights.low", weights.low.to_string(), &[]),
        ("source.documents_path", documents_path, &["SALESPULSE_SOURCE_DOCUMENTS_PATH"]),
        (
            "logging.level",
            config.logging.level.clone(),
            &["SALESPULSE_LOGGING_LEVEL", "SALESPULSE_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["SALESPULSE_LOGGING_FORMAT", "SALESPULSE_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in &entries {
        lines.push(render_line(key, value, attribution.source_of(key, env_keys)));
    }

    lines.join("\n")
}

struct Attribution<'a> {
    file_doc: Option<&'a Value>,
    file_path: Option<&'a Path>,
}

impl Attribution<'_> {
    fn source_of(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
