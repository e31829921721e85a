use chrono::NaiveDate;
use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub harvest: HarvestConfig,
    pub fetch: FetchConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarvestConfig {
    /// Steam app whose review collection is harvested.
    pub app_id: u64,
    pub game: String,
    pub franchise: String,
    pub batch_size: usize,
    pub max_batches: Option<u64>,
    /// Optional date window bounds, "YYYY-MM-DD". Both or neither.
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub output_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    pub base_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Config {
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        // Load default configuration
        builder = builder.add_source(config::Config::try_from(&Config::default())?);

        // Layer on config file if it exists
        if Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        // Layer on environment variables (CRAWLER_ prefix)
        builder = builder.add_source(
            Environment::with_prefix("CRAWLER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let settings: Config = config.try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.harvest.batch_size == 0 {
            return Err(ConfigError::Message(
                "harvest.batch_size must be greater than 0".into(),
            ));
        }

        if self.fetch.page_size == 0 {
            return Err(ConfigError::Message(
                "fetch.page_size must be greater than 0".into(),
            ));
        }

        if self.fetch.base_url.is_empty() {
            return Err(ConfigError::Message("fetch.base_url is required".into()));
        }

        if self.harvest.window_start.is_some() != self.harvest.window_end.is_some() {
            return Err(ConfigError::Message(
                "harvest.window_start and harvest.window_end must be set together".into(),
            ));
        }

        // Window bounds must parse and be ordered before any fetch happens.
        if let Err(e) = self.harvest.window() {
            return Err(ConfigError::Message(e.to_string()));
        }

        Ok(())
    }
}

impl HarvestConfig {
    /// Parsed date window bounds, if configured.
    pub fn window(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let (Some(start), Some(end)) = (&self.window_start, &self.window_end) else {
            return Ok(None);
        };
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
        let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")?;
        if start >= end {
            return Err(Error::Config(format!(
                "window start {start} must precede window end {end}"
            )));
        }
        Ok(Some((start, end)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            harvest: HarvestConfig {
                app_id: 1_382_330,
                game: "Persona 5 Strikers".to_string(),
                franchise: "ATLUS".to_string(),
                batch_size: 100,
                max_batches: None,
                window_start: None,
                window_end: None,
                output_root: PathBuf::from("./reviews"),
            },
            fetch: FetchConfig {
                base_url: "https://store.steampowered.com".to_string(),
                page_size: 100,
                request_timeout_secs: 30,
                max_retries: 3,
                retry_base_delay_ms: 1000,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
                log_format: LogFormat::Pretty,
                metrics_enabled: false,
                metrics_port: 9090,
            },
        }
    }
}
