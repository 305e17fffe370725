//! Flat-file stores the collectors write to.
//!
//! # Submodules
//!
//! - [`csv`]: append-only weather store, one row per weather condition
//! - [`text`]: news title store, replaced in full on every run
//!
//! # Output Layout
//!
//! ```text
//! weather_data.csv
//! timestamp,location,condition,description,temperature_celsius,humidity_percent
//! 2024-03-28 14:00:00,Vladikavkaz,Clouds,overcast clouds,7.00,60
//!
//! news.txt
//! 1: <first title on page 1>
//! 2: <second title on page 1>
//! ```

use crate::error::StoreError;
use crate::models::WeatherRecord;

pub mod csv;
pub mod text;

/// Durable destination for decoded weather records.
pub trait WeatherSink {
    /// Persist every row of `record`, returning how many rows were written.
    async fn persist(&self, record: &WeatherRecord) -> Result<usize, StoreError>;
}
