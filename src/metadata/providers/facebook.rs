//! Facebook metadata provider.
//!
//! Facebook has no public metadata endpoint for videos, so the provider
//! fetches the page and reads its Open Graph tags, falling back to the
//! document `<title>`.

use std::sync::LazyLock;

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use reelgate_core::Platform;

use crate::metadata::provider::{MetadataProvider, ProviderError, VideoMetadata};

static META_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").unwrap());

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b([a-z][a-z0-9:_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Content of the first `<meta property=... content=...>` (or `name=`) tag
/// whose property equals `property`.
pub fn meta_content(html: &str, property: &str) -> Option<String> {
    for tag in META_TAG.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for caps in ATTRIBUTE.captures_iter(tag.as_str()) {
            let value = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
            match caps[1].to_ascii_lowercase().as_str() {
                "property" | "name" => key = value,
                "content" => content = value,
                _ => {}
            }
        }
        if key.is_some_and(|k| k.eq_ignore_ascii_case(property)) {
            if let Some(c) = content.map(unescape_html).filter(|c| !c.is_empty()) {
                return Some(c);
            }
        }
    }
    None
}

fn document_title(html: &str) -> Option<String> {
    TITLE_TAG
        .captures(html)
        .map(|c| unescape_html(c[1].trim()))
        .filter(|t| !t.is_empty())
}

/// Decode the handful of entities that show up in Open Graph values.
fn unescape_html(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub struct FacebookProvider {
    client: reqwest::Client,
}

impl FacebookProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataProvider for FacebookProvider {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ProviderError> {
        let html = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .context("Facebook page request failed")?
            .error_for_status()
            .context("Facebook page request returned error")?
            .text()
            .await
            .context("Failed to read Facebook page body")?;

        let title = meta_content(&html, "og:title")
            .or_else(|| document_title(&html))
            .unwrap_or_else(|| "Facebook Video".into());

        let duration = meta_content(&html, "video:duration")
            .or_else(|| meta_content(&html, "og:video:duration"))
            .and_then(|d| d.parse::<u64>().ok());

        Ok(VideoMetadata {
            title,
            duration,
            thumbnail: meta_content(&html, "og:image"),
            ..Default::default()
        })
    }
}
