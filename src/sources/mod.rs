//! Remote sources the collectors pull from.
//!
//! Each source issues exactly one HTTP request per call, checks the status
//! and decodes the body. Looping, retry policy and failure isolation are
//! left to the drivers in [`crate::drivers`].
//!
//! | Source | Module | Request | Decodes to |
//! |--------|--------|---------|------------|
//! | Weather API | [`weather`] | `GET ?q=&appid=` | [`WeatherRecord`](crate::models::WeatherRecord) |
//! | News listing | [`news`] | `POST paged=<n>` | title strings |

use crate::error::FetchError;
use crate::models::WeatherRecord;
use std::time::Duration;

pub mod news;
pub mod weather;

/// Fetches the current observation for one location.
pub trait WeatherSource {
    async fn fetch(&self, location: &str) -> Result<WeatherRecord, FetchError>;
}

/// Fetches the titles on one page of a paginated listing.
pub trait ListingSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<String>, FetchError>;
}

/// Shared HTTP client setup for both sources.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("flatfile_harvest/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
