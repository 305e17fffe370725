//! Data models for weather observations and news titles.
//!
//! - [`WeatherPayload`]: the JSON document returned by the weather API
//! - [`WeatherRecord`]: one decoded observation for one location
//! - [`NewsTitle`]: one numbered line of the news text store

use chrono::{DateTime, Local};
use serde::Deserialize;

/// Offset between the API's absolute temperature unit and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Timestamp layout used in the CSV store (local clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw weather API response. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct WeatherPayload {
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

/// One simultaneous weather condition, e.g. `Clouds` / `overcast clouds`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

/// A decoded observation. Immutable once built; persisted append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub location: String,
    pub captured_at: DateTime<Local>,
    pub conditions: Vec<Condition>,
    /// Temperature as reported by the API, in Kelvin.
    pub temperature_kelvin: f64,
    pub humidity_percent: f64,
}

impl WeatherRecord {
    /// Build a record from an API payload, stamping it with `captured_at`.
    ///
    /// The location is the name reported by the API, not the query string.
    pub fn from_payload(payload: WeatherPayload, captured_at: DateTime<Local>) -> Self {
        Self {
            location: payload.name,
            captured_at,
            conditions: payload.weather,
            temperature_kelvin: payload.main.temp,
            humidity_percent: payload.main.humidity,
        }
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_kelvin - KELVIN_OFFSET
    }

    /// One CSV row per condition, all sharing timestamp, location and readings.
    pub fn to_rows(&self) -> Vec<[String; 6]> {
        let timestamp = self.captured_at.format(TIMESTAMP_FORMAT).to_string();
        let celsius = format!("{:.2}", self.temperature_celsius());
        let humidity = self.humidity_percent.to_string();

        self.conditions
            .iter()
            .map(|c| {
                [
                    timestamp.clone(),
                    self.location.clone(),
                    c.main.clone(),
                    c.description.clone(),
                    celsius.clone(),
                    humidity.clone(),
                ]
            })
            .collect()
    }
}

/// A title with its 1-based position in the final crawl output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsTitle {
    pub sequence_number: usize,
    pub text: String,
}

impl NewsTitle {
    /// Relabel accumulated titles densely as `1..=N`, preserving order.
    pub fn number_all(titles: Vec<String>) -> Vec<NewsTitle> {
        titles
            .into_iter()
            .enumerate()
            .map(|(i, text)| NewsTitle {
                sequence_number: i + 1,
                text,
            })
            .collect()
    }

    /// Text store line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.sequence_number, self.text)
    }
}
