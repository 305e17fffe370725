//! Runtime configuration for both collectors.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Built-in defaults ([`WeatherConfig::default`], [`NewsConfig::default`])
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags / environment variables (see [`crate::cli`])
//!
//! # Example file
//!
//! ```yaml
//! weather:
//!   locations: [Vladikavkaz, Beslan]
//!   credential: "<api key>"
//!   interval_secs: 3600
//!   store_path: weather_data.csv
//! news:
//!   listing_base_url: https://www.nosu.ru/category/news/
//!   output_path: news.txt
//! ```

use crate::cli::{NewsArgs, WeatherArgs};
use crate::error::ConfigError;
use scraper::Selector;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub news: NewsConfig,
}

/// Settings for the scheduled weather poller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Location identifiers passed verbatim as the `q` parameter.
    pub locations: Vec<String>,
    /// API key passed as the `appid` parameter.
    pub credential: String,
    /// Endpoint queried once per location per cycle.
    pub api_url: String,
    /// Seconds between poll cycles.
    pub interval_secs: u64,
    /// Append-only CSV store.
    pub store_path: PathBuf,
    /// Emit a header row when the store is empty.
    pub write_header: bool,
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            locations: vec!["Vladikavkaz".to_string(), "Beslan".to_string()],
            credential: String::new(),
            api_url: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            interval_secs: 3600,
            store_path: PathBuf::from("weather_data.csv"),
            write_header: true,
            request_timeout_secs: 30,
        }
    }
}

impl WeatherConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Layer command-line overrides on top of file/default values.
    pub fn apply_overrides(&mut self, args: &WeatherArgs) {
        if let Some(key) = &args.api_key {
            self.credential = key.clone();
        }
        if !args.locations.is_empty() {
            self.locations = args.locations.clone();
        }
        if let Some(secs) = args.interval_secs {
            self.interval_secs = secs;
        }
        if let Some(path) = &args.store_path {
            self.store_path = path.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credential.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "weather API credential is missing (set OPENWEATHER_API_KEY or --api-key)".into(),
            ));
        }
        if self.locations.is_empty() {
            return Err(ConfigError::Invalid("no weather locations configured".into()));
        }
        if self.locations.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Invalid("weather locations must be non-empty".into()));
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid("poll interval must be greater than zero".into()));
        }
        Url::parse(&self.api_url)
            .map_err(|e| ConfigError::Invalid(format!("bad api_url {:?}: {}", self.api_url, e)))?;
        Ok(())
    }
}

/// Settings for the one-shot news listing crawl.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Listing endpoint that accepts `paged=<n>` form posts.
    pub listing_base_url: String,
    /// CSS selector for title nodes on each page.
    pub title_selector: String,
    /// Text store, replaced on every run.
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            listing_base_url: "https://www.nosu.ru/category/news/".to_string(),
            title_selector: ".content-block.content-text.news-item .title a".to_string(),
            output_path: PathBuf::from("news.txt"),
            request_timeout_secs: 30,
        }
    }
}

impl NewsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn apply_overrides(&mut self, args: &NewsArgs) {
        if let Some(url) = &args.listing_url {
            self.listing_base_url = url.clone();
        }
        if let Some(selector) = &args.selector {
            self.title_selector = selector.clone();
        }
        if let Some(path) = &args.output {
            self.output_path = path.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.listing_base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "bad listing_base_url {:?}: {}",
                self.listing_base_url, e
            ))
        })?;
        parse_selector(&self.title_selector)?;
        Ok(())
    }
}

/// Compile a CSS selector, flattening scraper's borrowed error into a config error.
pub fn parse_selector(raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|e| ConfigError::Invalid(format!("bad selector {raw:?}: {e}")))
}

impl Config {
    /// Load the YAML file at `path`, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an all-default struct.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }
}
