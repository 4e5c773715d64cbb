//! Configuration types and loader
//!
//! 設定型とローダー（デフォルト → ファイル → 環境変数の順で上書き）

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Thresholds and tuning constants for the anomaly filter.
///
/// Defaults reproduce the production values; every field can be overridden
/// through the configuration file or `PVWATCH_FILTER__*` environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Irradiance floor for the strict low-yield rule (W/m², exclusive)
    pub low_yield_irradiance_wm2: f64,
    /// PR ceiling for the strict low-yield rule (%, exclusive)
    pub low_yield_pr_percent: f64,
    /// PR ceiling for the exploratory low-yield mask (%, exclusive)
    pub exploratory_pr_percent: f64,
    /// Single-step power difference below which a drop is flagged (kW)
    pub power_drop_kw: f64,
    /// Irradiance floor for the clipping rule (W/m², exclusive)
    pub clipping_irradiance_wm2: f64,
    /// Absolute power difference under which output counts as flat (kW)
    pub clipping_flat_kw: f64,
    /// Trailing window for the smoothed-power feature (samples)
    pub smoothing_window: usize,
    /// Seasonal period for the additive decomposition (samples).
    ///
    /// 48 matches the production value (4 hours at five-minute resolution).
    /// A full solar day at the same resolution is 288; use
    /// [`FilterConfig::with_daily_period`] to opt into that interpretation.
    pub seasonal_period: usize,
    /// Residual threshold for the decomposition detector (standard deviations)
    pub residual_sigma: f64,
    /// Residual threshold for the rolling-mean detector (standard deviations)
    pub stat_outlier_sigma: f64,
    /// Minimum number of complete feature rows before the Isolation Forest runs
    pub ml_min_rows: usize,
    /// Expected outlier fraction for the Isolation Forest
    pub ml_contamination: f64,
    /// Number of trees in the Isolation Forest
    pub ml_trees: usize,
    /// RNG seed for the Isolation Forest
    pub ml_seed: u64,
    /// Percentile cutoff for the module-temperature detector (0-100)
    pub temp_percentile: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            low_yield_irradiance_wm2: 400.0,
            low_yield_pr_percent: 60.0,
            exploratory_pr_percent: 70.0,
            power_drop_kw: -100.0,
            clipping_irradiance_wm2: 900.0,
            clipping_flat_kw: 1.0,
            smoothing_window: 12,
            seasonal_period: 48,
            residual_sigma: 3.0,
            stat_outlier_sigma: 1.5,
            ml_min_rows: 10,
            ml_contamination: 0.05,
            ml_trees: 100,
            ml_seed: 42,
            temp_percentile: 95.0,
        }
    }
}

impl FilterConfig {
    /// Same thresholds with the seasonal period set to one full day
    /// (288 five-minute samples).
    pub fn with_daily_period(mut self) -> Self {
        self.seasonal_period = 288;
        self
    }

    /// Reject nonsensical threshold combinations before a run.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.seasonal_period < 2 {
            return Err(crate::error::Error::Config(
                "seasonal_period must be at least 2".to_string(),
            ));
        }
        if self.ml_contamination <= 0.0 || self.ml_contamination > 0.5 {
            return Err(crate::error::Error::Config(format!(
                "ml_contamination must be in (0, 0.5], got {}",
                self.ml_contamination
            )));
        }
        if self.smoothing_window == 0 {
            return Err(crate::error::Error::Config(
                "smoothing_window must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.temp_percentile) {
            return Err(crate::error::Error::Config(format!(
                "temp_percentile must be in [0, 100], got {}",
                self.temp_percentile
            )));
        }
        Ok(())
    }
}

/// LLM provider settings for the UI summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible base URL (e.g. `https://api.openai.com/v1`)
    pub base_url: String,
    /// API key; empty disables the remote provider
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default log level when RUST_LOG is unset
    pub log_level: LogLevel,
    /// Anomaly filter thresholds
    pub filter: FilterConfig,
    /// LLM summarizer settings
    pub llm: LlmSettings,
}

/// Log level selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    config_file: Option<String>,
    load_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: false,
        }
    }

    /// Load configuration from file
    pub fn load_from_file(mut self, path: Option<&str>) -> Self {
        self.config_file = path.map(String::from);
        self
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(config_path) = &self.config_file {
            builder = builder.add_source(File::with_name(config_path).required(false));
        } else {
            builder = builder
                .add_source(File::with_name("pvwatch").required(false))
                .add_source(File::with_name("config/pvwatch").required(false));
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix("PVWATCH")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .filter
            .validate()
            .context("Invalid filter configuration")?;

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
