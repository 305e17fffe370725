//! Append-only CSV store for weather observations.
//!
//! The file is opened, written, flushed and closed inside a single
//! [`CsvStore::append`] call, so no handle is held between poll cycles and a
//! shutdown between cycles never leaves the file open. Existing rows are
//! never rewritten: the header is only emitted when the file is empty.

use super::WeatherSink;
use crate::error::StoreError;
use crate::models::WeatherRecord;
use crate::utils::csv_line;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

pub const HEADER: [&str; 6] = [
    "timestamp",
    "location",
    "condition",
    "description",
    "temperature_celsius",
    "humidity_percent",
];

#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    write_header: bool,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>, write_header: bool) -> Self {
        Self {
            path: path.into(),
            write_header,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row per condition of `record`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::StoreUnavailable`] if the file cannot be opened
    /// - [`StoreError::WriteFailed`] if a write or flush fails; rows written
    ///   before the failure are left in place
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display(), location = %record.location))]
    pub async fn append(&self, record: &WeatherRecord) -> Result<usize, StoreError> {
        let unavailable = |source: std::io::Error| StoreError::StoreUnavailable {
            path: self.path.clone(),
            source,
        };
        let write_failed = |rows_written: usize, source: std::io::Error| StoreError::WriteFailed {
            path: self.path.clone(),
            rows_written,
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(unavailable)?;

        let is_empty = file.metadata().await.map_err(unavailable)?.len() == 0;
        if is_empty && self.write_header {
            debug!("Store is empty, writing header");
            file.write_all(csv_line(&HEADER).as_bytes())
                .await
                .map_err(|e| write_failed(0, e))?;
        }

        let mut written = 0;
        for row in record.to_rows() {
            // Each row goes out as one buffer so a failure never splits a row.
            file.write_all(csv_line(&row).as_bytes())
                .await
                .map_err(|e| write_failed(written, e))?;
            written += 1;
        }

        file.flush().await.map_err(|e| write_failed(written, e))?;
        file.sync_data().await.map_err(|e| write_failed(written, e))?;
        debug!(rows = written, "Appended weather rows");
        Ok(written)
    }
}

impl WeatherSink for CsvStore {
    async fn persist(&self, record: &WeatherRecord) -> Result<usize, StoreError> {
        self.append(record).await
    }
}
