//! Twitter / X metadata provider backed by the public oEmbed endpoint.

use anyhow::Context;
use async_trait::async_trait;
use reelgate_core::Platform;
use serde::Deserialize;

use crate::metadata::provider::{MetadataProvider, ProviderError, VideoMetadata};

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
    thumbnail_url: Option<String>,
}

pub struct TwitterProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl TwitterProvider {
    /// `endpoint` is the oEmbed URL, e.g. `https://publish.twitter.com/oembed`.
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl MetadataProvider for TwitterProvider {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ProviderError> {
        let body: OEmbedResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .context("oEmbed request failed")?
            .error_for_status()
            .context("oEmbed request returned error")?
            .json()
            .await
            .context("Failed to parse oEmbed response")?;

        let title = body
            .title
            .filter(|t| !t.is_empty())
            .or_else(|| body.author_name.clone())
            .unwrap_or_else(|| "Twitter Video".into());

        Ok(VideoMetadata {
            title,
            thumbnail: body.thumbnail_url,
            author: body.author_name,
            ..Default::default()
        })
    }
}
