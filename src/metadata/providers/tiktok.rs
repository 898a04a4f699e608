//! TikTok metadata provider backed by the tikwm REST API.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reelgate_core::Platform;
use serde::Deserialize;

use crate::metadata::provider::{MetadataProvider, ProviderError, VideoMetadata};

#[derive(Debug, Deserialize)]
struct TikwmResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
    data: Option<TikwmVideo>,
}

#[derive(Debug, Deserialize)]
struct TikwmVideo {
    title: Option<String>,
    duration: Option<u64>,
    cover: Option<String>,
    play_count: Option<u64>,
    author: Option<TikwmAuthor>,
}

#[derive(Debug, Deserialize)]
struct TikwmAuthor {
    nickname: Option<String>,
    unique_id: Option<String>,
}

pub struct TikTokProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl TikTokProvider {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl MetadataProvider for TikTokProvider {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ProviderError> {
        let body: TikwmResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .context("tikwm request failed")?
            .error_for_status()
            .context("tikwm request returned error")?
            .json()
            .await
            .context("Failed to parse tikwm response")?;

        let Some(video) = body.data else {
            return Err(anyhow!(
                "Invalid response from TikTok API (code {:?}: {})",
                body.code,
                body.msg.unwrap_or_default()
            )
            .into());
        };

        let author = video
            .author
            .and_then(|a| a.nickname.filter(|n| !n.is_empty()).or(a.unique_id));

        Ok(VideoMetadata {
            title: video
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "TikTok Video".into()),
            duration: video.duration,
            thumbnail: video.cover,
            views: video.play_count,
            author,
            ..Default::default()
        })
    }
}
