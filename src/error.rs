//! Error types shared by the fetchers, persisters and drivers.
//!
//! Every failure a collector can hit is one of a small taxonomy:
//!
//! | Error | Raised by | Weather pipeline | News pipeline |
//! |-------|-----------|------------------|---------------|
//! | [`FetchError::Transport`] | network layer | logged, next location | fatal |
//! | [`FetchError::Remote`] | non-200 status | logged, next location | 404 ends the crawl, anything else is fatal |
//! | [`FetchError::Decode`] | body shape mismatch | logged, next location | fatal |
//! | [`StoreError`] | local files | logged, next location | fatal |

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single HTTP round-trip that did not produce a usable payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, timeout or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("remote returned status {status}")]
    Remote {
        /// Raw HTTP status code
        status: u16,
    },

    /// `200 OK`, but the body does not match the expected schema.
    #[error("could not decode response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// True for `404 Not Found`, which the listing crawl reads as "no more pages".
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Remote { status: 404 })
    }
}

/// Local persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be opened or created.
    #[error("store {} unavailable: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing or flushing failed. Rows written before the failure stay on disk.
    #[error("write to {} failed after {rows_written} rows: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        rows_written: usize,
        #[source]
        source: io::Error,
    },
}

/// Why one location produced no rows in a poll cycle.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("persist failed: {0}")]
    Store(#[from] StoreError),
}

/// Reasons a listing crawl aborts without producing output.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// A page failed in a way that cannot be read as end-of-pages.
    #[error("crawl aborted on page {page}: {source}")]
    Fatal {
        page: u32,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Configuration problems, all reported before any network I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_only_404() {
        assert!(FetchError::Remote { status: 404 }.is_not_found());
        assert!(!FetchError::Remote { status: 500 }.is_not_found());
        assert!(!FetchError::Decode("x".into()).is_not_found());
    }

    #[test]
    fn test_write_failed_message_carries_row_count() {
        let err = StoreError::WriteFailed {
            path: PathBuf::from("weather_data.csv"),
            rows_written: 2,
            source: io::Error::other("disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("weather_data.csv"));
        assert!(msg.contains("after 2 rows"));
    }
}
