//! News title text store.
//!
//! Unlike the weather CSV, this file is (re)created on every run so it only
//! ever holds the latest crawl.

use crate::error::StoreError;
use crate::models::NewsTitle;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct TextStore {
    path: PathBuf,
}

impl TextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the store with one `"<n>: <title>"` line per title.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = titles.len()))]
    pub async fn write_titles(&self, titles: &[NewsTitle]) -> Result<usize, StoreError> {
        let file = File::create(&self.path)
            .await
            .map_err(|source| StoreError::StoreUnavailable {
                path: self.path.clone(),
                source,
            })?;
        let mut writer = BufWriter::new(file);

        let mut written = 0;
        for title in titles {
            let line = format!("{}\n", title.to_line());
            writer
                .write_all(line.as_bytes())
                .await
                .map_err(|source| self.write_failed(written, source))?;
            written += 1;
        }
        writer
            .flush()
            .await
            .map_err(|source| self.write_failed(written, source))?;

        info!(lines = written, "Wrote news titles");
        Ok(written)
    }

    fn write_failed(&self, rows_written: usize, source: std::io::Error) -> StoreError {
        StoreError::WriteFailed {
            path: self.path.clone(),
            rows_written,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_titles_replaces_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.txt");
        std::fs::write(&path, "1: stale\n2: stale\n3: stale\n").unwrap();

        let store = TextStore::new(&path);
        let titles = NewsTitle::number_all(vec!["Fresh".into(), "News".into()]);
        assert_eq!(store.write_titles(&titles).await.unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1: Fresh\n2: News\n");
    }

    #[tokio::test]
    async fn test_write_titles_empty_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextStore::new(dir.path().join("news.txt"));
        assert_eq!(store.write_titles(&[]).await.unwrap(), 0);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "");
    }

    #[tokio::test]
    async fn test_uncreatable_path_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextStore::new(dir.path().join("missing/news.txt"));
        let err = store.write_titles(&[]).await.unwrap_err();
        assert!(matches!(err, StoreError::StoreUnavailable { .. }));
    }
}
