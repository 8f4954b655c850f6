// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{HarvestError, Result};
use crate::utils::Validator;
use chrono::{DateTime, NaiveDate, Utc};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest `limit` the Browse API accepts for a search page.
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub credentials: CredentialsConfig,
    pub api: ApiConfig,
    pub collector: CollectorConfig,
    pub downloader: DownloaderConfig,
}

#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub token_url: String,
    pub search_url: String,
    pub scope: String,
    pub marketplace_id: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token_url: "https://api.ebay.com/identity/v1/oauth2/token".to_string(),
            search_url: "https://api.ebay.com/buy/browse/v1/item_summary/search".to_string(),
            scope: "https://api.ebay.com/oauth/api_scope".to_string(),
            marketplace_id: None,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub search_terms: Vec<String>,
    pub target_rows: usize,
    pub page_size: usize,
    pub date_threshold: NaiveDate,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub page_delay_ms: u64,
    pub output_file: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            search_terms: vec!["laptop".to_string(), "shoes".to_string()],
            target_rows: 10_000,
            page_size: 100,
            date_threshold: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            max_attempts: 5,
            initial_backoff_ms: 2_000,
            page_delay_ms: 500,
            output_file: PathBuf::from("ebay_items_2023_present.csv"),
        }
    }
}

impl CollectorConfig {
    /// Items created strictly before this instant are dropped.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.date_threshold.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownloaderConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub image_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub default_extension: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("ebay_items_with_text_embeddings.csv"),
            output_file: PathBuf::from("ebay_items_with_image_paths.csv"),
            image_dir: PathBuf::from("images"),
            request_timeout_secs: 10,
            default_extension: ".jpg".to_string(),
        }
    }
}

impl DownloaderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            // No try_parsing: secrets such as 0123 must keep their leading zeros.
            config::Environment::with_prefix("EBAY_HARVEST").separator("__"),
        );

        let settings = builder
            .build()
            .map_err(|e| HarvestError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| HarvestError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.collector.page_size == 0 || self.collector.page_size > MAX_PAGE_SIZE {
            return Err(HarvestError::Config(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.collector.target_rows == 0 {
            return Err(HarvestError::Config(
                "target_rows must be greater than 0".to_string(),
            ));
        }

        if self.collector.max_attempts == 0 {
            return Err(HarvestError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.api.token_url)?;
        Validator::validate_url(&self.api.search_url)?;

        if !self.downloader.default_extension.starts_with('.') {
            return Err(HarvestError::Config(
                "default_extension must start with '.'".to_string(),
            ));
        }

        Ok(())
    }

    /// Client id and secret, required only by the collect pipeline.
    pub fn require_credentials(&self) -> Result<(&str, &str)> {
        match (
            self.credentials.client_id.as_deref(),
            self.credentials.client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Ok((id, secret)),
            _ => Err(HarvestError::Config(
                "missing credentials: set EBAY_HARVEST__CREDENTIALS__CLIENT_ID and \
                 EBAY_HARVEST__CREDENTIALS__CLIENT_SECRET"
                    .to_string(),
            )),
        }
    }
}
