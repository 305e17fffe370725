//! Paginated news listing scraper.
//!
//! The listing is an AJAX endpoint that returns one page of HTML per form post:
//!
//! ```text
//! POST <listing_base_url>
//! Content-Type: application/x-www-form-urlencoded; charset=UTF-8
//! X-Requested-With: XMLHttpRequest
//!
//! paged=<n>
//! ```
//!
//! Titles are the text content of every node matching the configured selector,
//! in document order.

use super::{ListingSource, http_client};
use crate::config::{NewsConfig, parse_selector};
use crate::error::FetchError;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, instrument};

pub struct NewsListingClient {
    http: reqwest::Client,
    base_url: String,
    title_selector: Selector,
}

impl NewsListingClient {
    pub fn new(config: &NewsConfig) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            http: http_client(config.request_timeout())?,
            base_url: config.listing_base_url.clone(),
            title_selector: parse_selector(&config.title_selector)?,
        })
    }
}

impl ListingSource for NewsListingClient {
    #[instrument(level = "info", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_page(&self, page: u32) -> Result<Vec<String>, FetchError> {
        let resp = self
            .http
            .post(&self.base_url)
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .header("X-Requested-With", "XMLHttpRequest")
            .body(format!("paged={page}"))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Remote {
                status: status.as_u16(),
            });
        }

        let html = resp.text().await?;
        let titles = extract_titles(&html, &self.title_selector);
        debug!(page, count = titles.len(), "Parsed listing page");
        Ok(titles)
    }
}

/// Collect the trimmed text of every selector match.
pub fn extract_titles(html: &str, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing_html(titles: &[&str]) -> String {
        let items: String = titles
            .iter()
            .map(|t| {
                format!(
                    r#"<div class="content-block content-text news-item">
                         <h3 class="title"><a href="/n">{t}</a></h3>
                         <p>teaser <a href="/more">read more</a></p>
                       </div>"#
                )
            })
            .collect();
        format!("<html><body>{items}</body></html>")
    }

    fn client_for(server: &MockServer) -> NewsListingClient {
        let config = NewsConfig {
            listing_base_url: format!("{}/category/news/", server.uri()),
            ..NewsConfig::default()
        };
        NewsListingClient::new(&config).unwrap()
    }

    #[test]
    fn test_extract_titles_in_document_order() {
        let selector = parse_selector(&NewsConfig::default().title_selector).unwrap();
        let html = listing_html(&["First", "  Second  ", "Third"]);
        assert_eq!(
            extract_titles(&html, &selector),
            vec!["First", "Second", "Third"]
        );
    }

    #[test]
    fn test_extract_titles_ignores_other_markup() {
        let selector = parse_selector(&NewsConfig::default().title_selector).unwrap();
        let html = r#"<div class="news-item"><span class="title"><a>Not a news block</a></span></div>"#;
        assert!(extract_titles(html, &selector).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_posts_form_with_ajax_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/category/news/"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .and(header(
                "Content-Type",
                "application/x-www-form-urlencoded; charset=UTF-8",
            ))
            .and(body_string("paged=2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["A", "B"])))
            .expect(1)
            .mount(&server)
            .await;

        let titles = client_for(&server).fetch_page(2).await.unwrap();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_fetch_page_empty_content_is_ok_and_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<div></div>"))
            .mount(&server)
            .await;

        let titles = client_for(&server).fetch_page(9).await.unwrap();
        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string("paged=3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string("paged=4"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let not_found = client.fetch_page(3).await.unwrap_err();
        assert!(not_found.is_not_found());
        let unavailable = client.fetch_page(4).await.unwrap_err();
        assert!(matches!(unavailable, FetchError::Remote { status: 503 }));
    }
}
