//! HTTP-backed page renderer
//!
//! Fetches pages with reqwest and extracts text and links with scraper.
//! Static HTML settles the moment the body arrives, which makes this the
//! simplest complete implementation of the [`PageRenderer`] capability.

use crate::render::{PageRenderer, RenderError, RenderedPage};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Renders pages over plain HTTP
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Builds the renderer with its own HTTP client
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The User-Agent header sent with every request
    /// * `timeout` - Per-request deadline; expiry surfaces as `RenderError::Timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Navigation(format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.is_empty() && !content_type.contains("text/html") {
            return Err(RenderError::Protocol(format!(
                "unsupported content type: {}",
                content_type
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RenderError::Protocol(e.to_string()))?;

        Ok(RenderedPage {
            text: extract_text(&body),
            links: extract_links(&body),
        })
    }
}

fn classify_request_error(e: reqwest::Error) -> RenderError {
    if e.is_timeout() {
        RenderError::Timeout
    } else if e.is_connect() || e.is_redirect() {
        RenderError::Navigation(e.to_string())
    } else {
        RenderError::Protocol(e.to_string())
    }
}

/// Extracts the visible text of the page body
///
/// Text nodes are joined with newlines and blank runs collapsed, roughly
/// what a browser's `inner_text` would report for the body element.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let body = Selector::parse("body").ok();
    let lines: Vec<String> = match body.as_ref().and_then(|s| document.select(s).next()) {
        Some(body) => body
            .text()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        None => document
            .root_element()
            .text()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    };

    lines.join("\n")
}

/// Collects raw href values from `<a>` and `<area>` elements
fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href], area[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}
