//! Weather API client.
//!
//! Queries an OpenWeatherMap-compatible endpoint:
//!
//! ```text
//! GET <api_url>?q=<location>&appid=<credential>
//! ```
//!
//! and expects `{name, main: {temp, humidity}, weather: [{main, description}, ...]}`.

use super::{WeatherSource, http_client};
use crate::config::WeatherConfig;
use crate::error::FetchError;
use crate::models::{WeatherPayload, WeatherRecord};
use crate::utils::truncate_for_log;
use chrono::Local;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_url: String,
    credential: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, FetchError> {
        Ok(Self {
            http: http_client(config.request_timeout())?,
            api_url: config.api_url.clone(),
            credential: config.credential.clone(),
        })
    }
}

impl WeatherSource for OpenWeatherClient {
    #[instrument(level = "debug", skip(self), fields(api_url = %self.api_url))]
    async fn fetch(&self, location: &str) -> Result<WeatherRecord, FetchError> {
        let resp = self
            .http
            .get(&self.api_url)
            .query(&[("q", location), ("appid", self.credential.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!(%location, status = status.as_u16(), "Weather API rejected request");
            return Err(FetchError::Remote {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let record = decode(&body)?;
        debug!(%location, conditions = record.conditions.len(), "Decoded weather payload");
        Ok(record)
    }
}

/// Decode a 200 body, stamping the record with the local clock.
pub fn decode(body: &str) -> Result<WeatherRecord, FetchError> {
    let payload: WeatherPayload = serde_json::from_str(body).map_err(|e| {
        FetchError::Decode(format!("{e} (body: {})", truncate_for_log(body, 200)))
    })?;
    if payload.weather.is_empty() {
        return Err(FetchError::Decode("payload has no weather conditions".into()));
    }
    Ok(WeatherRecord::from_payload(payload, Local::now()))
}
