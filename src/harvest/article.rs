//! Fetch linked web pages and pull out their article text and metadata.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{MAX_ARTICLE_BYTES, SCRAPER_USER_AGENT};

/// Article text and metadata scraped from a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedArticle {
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub text: String,
}

/// Turns a URL into article text.
#[async_trait]
pub trait ArticleScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedArticle>;
}

/// Scraper that fetches the page over HTTP and parses the HTML.
pub struct HttpArticleScraper {
    client: Client,
    max_body_bytes: usize,
}

impl HttpArticleScraper {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(SCRAPER_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            max_body_bytes: MAX_ARTICLE_BYTES,
        })
    }

    /// Refuse pages whose body is larger than `bytes`.
    #[must_use]
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

#[async_trait]
impl ArticleScraper for HttpArticleScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedArticle> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch URL")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP request failed with status {}", response.status());
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("xhtml") {
            anyhow::bail!("Unsupported content type {content_type}");
        }

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                anyhow::bail!(
                    "Page body of {length} bytes exceeds limit of {} bytes",
                    self.max_body_bytes
                );
            }
        }

        // Content-Length may be absent.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read response body")?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                anyhow::bail!(
                    "Page body exceeds limit of {} bytes",
                    self.max_body_bytes
                );
            }
            body.extend_from_slice(&chunk);
        }

        Ok(extract_article(&String::from_utf8_lossy(&body), url))
    }
}

/// Extract article text and metadata from an HTML document fetched from `url`.
#[must_use]
pub fn extract_article(html: &str, url: &str) -> ScrapedArticle {
    let document = Html::parse_document(html);

    let title = meta_content(&document, "meta[property='og:title']")
        .or_else(|| meta_content(&document, "meta[name='twitter:title']"))
        .or_else(|| first_text(&document, "title"));

    let author = meta_content(&document, "meta[name='author']")
        .or_else(|| meta_content(&document, "meta[property='article:author']"));

    let description = meta_content(&document, "meta[property='og:description']")
        .or_else(|| meta_content(&document, "meta[name='description']"));

    let source = meta_content(&document, "meta[property='og:site_name']").or_else(|| {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
    });

    ScrapedArticle {
        url: url.to_string(),
        title,
        author,
        description,
        source,
        text: extract_text(&document),
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
    (!text.is_empty()).then_some(text)
}

/// Paragraph text from the article body, falling back to the whole body.
fn extract_text(document: &Html) -> String {
    for selector in ["article p", "main p", "p"] {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };
        let paragraphs: Vec<String> = document
            .select(&selector)
            .map(|p| clean_text(&p.text().collect::<Vec<_>>().join(" ")))
            .filter(|p| !p.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join("\n");
        }
    }

    first_text(document, "body").unwrap_or_default()
}

fn clean_text(text: &str) -> String {
    // Remove excessive whitespace
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
