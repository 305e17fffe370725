//! Exhaustive crawl of a paginated listing with no known page count.
//!
//! Pages are requested explicitly as `1, 2, 3, ...`, one at a time. Every
//! response is classified into a [`PageOutcome`]:
//!
//! | Response | Outcome |
//! |----------|---------|
//! | 200 with one or more titles | [`PageOutcome::Page`], keep going |
//! | 200 with zero titles | [`PageOutcome::EndOfPages`] |
//! | 404 | [`PageOutcome::EndOfPages`] |
//! | any other status, transport or decode failure | [`PageOutcome::Fatal`] |
//!
//! The whole crawl is held in memory and only handed to the store once it
//! ends normally. A fatal page therefore discards every page collected so
//! far and no output file is created.

use crate::error::{CrawlError, FetchError};
use crate::models::NewsTitle;
use crate::outputs::text::TextStore;
use crate::sources::ListingSource;
use tracing::{error, info, instrument};

/// Classified result of one page request.
#[derive(Debug)]
pub enum PageOutcome {
    Page(Vec<String>),
    EndOfPages,
    Fatal(FetchError),
}

impl PageOutcome {
    pub fn classify(result: Result<Vec<String>, FetchError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => PageOutcome::EndOfPages,
            Ok(items) => PageOutcome::Page(items),
            Err(e) if e.is_not_found() => PageOutcome::EndOfPages,
            Err(e) => PageOutcome::Fatal(e),
        }
    }
}

/// In-flight crawl progress. Lives only as long as one [`PaginationDriver::crawl`] call.
#[derive(Debug)]
struct CrawlState {
    current_page: u32,
    accumulated: Vec<String>,
}

impl CrawlState {
    fn new() -> Self {
        Self {
            current_page: 1,
            accumulated: Vec::new(),
        }
    }
}

/// Result of a crawl that reached the end of the listing.
#[derive(Debug)]
pub struct CrawlReport {
    pub titles: Vec<NewsTitle>,
    /// Number of page requests issued, including the one that ended the crawl.
    pub pages_requested: u32,
}

pub struct PaginationDriver<L> {
    source: L,
}

impl<L: ListingSource> PaginationDriver<L> {
    pub fn new(source: L) -> Self {
        Self { source }
    }

    /// Walk the listing until an end-of-pages signal or a fatal error.
    #[instrument(level = "info", skip_all)]
    pub async fn crawl(&self) -> Result<CrawlReport, CrawlError> {
        let mut state = CrawlState::new();

        loop {
            let page = state.current_page;
            match PageOutcome::classify(self.source.fetch_page(page).await) {
                PageOutcome::Page(items) => {
                    info!(page, count = items.len(), "Collected listing page");
                    state.accumulated.extend(items);
                    state.current_page += 1;
                }
                PageOutcome::EndOfPages => {
                    info!(page, total = state.accumulated.len(), "News listing ended");
                    break;
                }
                PageOutcome::Fatal(source) => {
                    error!(
                        page,
                        discarded = state.accumulated.len(),
                        error = %source,
                        "Listing page failed, aborting crawl"
                    );
                    return Err(CrawlError::Fatal { page, source });
                }
            }
        }

        Ok(CrawlReport {
            pages_requested: state.current_page,
            titles: NewsTitle::number_all(state.accumulated),
        })
    }
}

/// Crawl the listing, then replace `store` with the numbered titles.
///
/// The store is only touched after the crawl ends normally.
pub async fn harvest_news<L: ListingSource>(
    source: L,
    store: &TextStore,
) -> Result<CrawlReport, CrawlError> {
    let report = PaginationDriver::new(source).crawl().await?;
    store.write_titles(&report.titles).await?;
    info!(
        path = %store.path().display(),
        titles = report.titles.len(),
        pages = report.pages_requested,
        "News titles saved"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsConfig;
    use crate::error::StoreError;
    use crate::sources::news::NewsListingClient;
    use std::sync::Mutex;
    use wiremock::matchers::{body_string, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    enum FakePage {
        Titles(usize),
        Status(u16),
    }

    /// Serves `pages[n - 1]` for page `n`; anything past the end is an empty page.
    struct FakeListing {
        pages: Vec<FakePage>,
        requested: Mutex<Vec<u32>>,
    }

    impl FakeListing {
        fn new(pages: Vec<FakePage>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl ListingSource for FakeListing {
        async fn fetch_page(&self, page: u32) -> Result<Vec<String>, FetchError> {
            self.requested.lock().unwrap().push(page);
            match self.pages.get(page as usize - 1) {
                Some(FakePage::Titles(n)) => Ok((1..=*n).map(|i| format!("p{page}-{i}")).collect()),
                Some(FakePage::Status(status)) => Err(FetchError::Remote { status: *status }),
                None => Ok(Vec::new()),
            }
        }
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            PageOutcome::classify(Ok(vec!["a".into()])),
            PageOutcome::Page(ref v) if v.len() == 1
        ));
        assert!(matches!(PageOutcome::classify(Ok(vec![])), PageOutcome::EndOfPages));
        assert!(matches!(
            PageOutcome::classify(Err(FetchError::Remote { status: 404 })),
            PageOutcome::EndOfPages
        ));
        assert!(matches!(
            PageOutcome::classify(Err(FetchError::Remote { status: 500 })),
            PageOutcome::Fatal(_)
        ));
        assert!(matches!(
            PageOutcome::classify(Err(FetchError::Decode("x".into()))),
            PageOutcome::Fatal(_)
        ));
    }

    #[tokio::test]
    async fn test_numbering_is_dense_across_pages() {
        let listing = FakeListing::new(vec![
            FakePage::Titles(10),
            FakePage::Titles(10),
            FakePage::Titles(3),
        ]);
        let driver = PaginationDriver::new(listing);
        let report = driver.crawl().await.unwrap();

        assert_eq!(report.titles.len(), 23);
        assert_eq!(report.pages_requested, 4);
        assert_eq!(report.titles[0].sequence_number, 1);
        assert_eq!(report.titles[22].sequence_number, 23);
        assert_eq!(report.titles[10].sequence_number, 11);
        assert_eq!(report.titles[10].text, "p2-1");
        assert_eq!(*driver.source.requested.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_second_page_ends_crawl() {
        let listing = FakeListing::new(vec![FakePage::Titles(12), FakePage::Titles(0)]);
        let driver = PaginationDriver::new(listing);
        let report = driver.crawl().await.unwrap();

        assert_eq!(report.titles.len(), 12);
        assert!(report.titles.iter().all(|t| t.text.starts_with("p1-")));
        assert_eq!(*driver.source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_not_found_is_a_clean_end() {
        let listing = FakeListing::new(vec![
            FakePage::Titles(5),
            FakePage::Titles(5),
            FakePage::Status(404),
            FakePage::Titles(5),
        ]);
        let driver = PaginationDriver::new(listing);
        let report = driver.crawl().await.unwrap();

        assert_eq!(report.titles.len(), 10);
        assert_eq!(report.pages_requested, 3);
        assert_eq!(*driver.source.requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_server_error_is_fatal() {
        let listing = FakeListing::new(vec![FakePage::Titles(5), FakePage::Status(500)]);
        let driver = PaginationDriver::new(listing);
        let err = driver.crawl().await.unwrap_err();

        match err {
            CrawlError::Fatal { page, source } => {
                assert_eq!(page, 2);
                assert!(matches!(source, FetchError::Remote { status: 500 }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*driver.source.requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_first_page_empty_yields_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextStore::new(dir.path().join("news.txt"));
        let report = harvest_news(FakeListing::new(vec![]), &store).await.unwrap();

        assert!(report.titles.is_empty());
        assert_eq!(report.pages_requested, 1);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "");
    }

    fn page_html(titles: &[&str]) -> String {
        titles
            .iter()
            .map(|t| {
                format!(
                    r#"<div class="content-block content-text news-item"><div class="title"><a>{t}</a></div></div>"#
                )
            })
            .collect()
    }

    async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(body_string(format!("paged={page}")))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    fn listing_client(server: &MockServer) -> NewsListingClient {
        NewsListingClient::new(&NewsConfig {
            listing_base_url: server.uri(),
            ..NewsConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_harvest_writes_numbered_lines_over_http() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            1,
            ResponseTemplate::new(200).set_body_string(page_html(&["Alpha", "Beta"])),
        )
        .await;
        mount_page(
            &server,
            2,
            ResponseTemplate::new(200).set_body_string(page_html(&["Gamma"])),
        )
        .await;
        mount_page(&server, 3, ResponseTemplate::new(404)).await;

        let dir = tempfile::tempdir().unwrap();
        let store = TextStore::new(dir.path().join("news.txt"));
        let report = harvest_news(listing_client(&server), &store).await.unwrap();

        assert_eq!(report.pages_requested, 3);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "1: Alpha\n2: Beta\n3: Gamma\n"
        );
    }

    #[tokio::test]
    async fn test_fatal_page_over_http_writes_nothing() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            1,
            ResponseTemplate::new(200).set_body_string(page_html(&["Alpha"])),
        )
        .await;
        mount_page(&server, 2, ResponseTemplate::new(500)).await;

        let dir = tempfile::tempdir().unwrap();
        let store = TextStore::new(dir.path().join("news.txt"));
        let err = harvest_news(listing_client(&server), &store)
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Fatal { page: 2, .. }));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_unreachable_listing_is_fatal_on_first_page() {
        let client = NewsListingClient::new(&NewsConfig {
            listing_base_url: "http://127.0.0.1:1/".into(),
            ..NewsConfig::default()
        })
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let store = TextStore::new(dir.path().join("news.txt"));
        let err = harvest_news(client, &store).await.unwrap_err();

        assert!(matches!(
            err,
            CrawlError::Fatal {
                page: 1,
                source: FetchError::Transport(_)
            }
        ));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_store_failure_after_crawl_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = TextStore::new(dir.path().join("missing/news.txt"));
        let listing = FakeListing::new(vec![FakePage::Titles(3)]);

        let err = harvest_news(listing, &store).await.unwrap_err();
        assert!(matches!(
            err,
            CrawlError::Store(StoreError::StoreUnavailable { .. })
        ));
    }
}
