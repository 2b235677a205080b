//! Configuration management for the delay-risk pipeline

use crate::types::CategoryThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained ONNX classifier
    pub path: String,
    /// Ordered feature columns the model was trained on; empty means every
    /// column of the projected input, in schema order
    #[serde(default)]
    pub feature_columns: Vec<String>,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

/// Risk bucketing configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoringConfig {
    /// Probability cutoffs between risk categories
    #[serde(default)]
    pub thresholds: CategoryThresholds,
}

/// Reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Attributes to break mean probability down by, when present in the data
    #[serde(default = "default_group_by")]
    pub group_by: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

fn default_onnx_threads() -> usize {
    1
}

fn default_group_by() -> Vec<String> {
    vec!["priority".to_string(), "product_category".to_string()]
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            group_by: default_group_by(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                path: "models/delay_classifier.onnx".to_string(),
                feature_columns: Vec::new(),
                onnx_threads: 1,
            },
            scoring: ScoringConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scoring.thresholds.high, 0.8);
        assert_eq!(config.scoring.thresholds.medium, 0.5);
        assert_eq!(config.report.group_by, vec!["priority", "product_category"]);
        assert_eq!(config.model.onnx_threads, 1);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[model]
path = "models/delay.onnx"
feature_columns = ["distance_km", "priority_code"]

[scoring.thresholds]
high = 0.9
medium = 0.4
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.model.path, "models/delay.onnx");
        assert_eq!(config.model.feature_columns.len(), 2);
        assert_eq!(config.scoring.thresholds.high, 0.9);
        // unset sections fall back to defaults
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.report.group_by.len(), 2);
    }
}
