//! YouTube metadata provider.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reelgate_core::{Error, Platform};

use super::ytdlp::{is_unavailable, YtDlpProbe};
use crate::metadata::provider::{MetadataProvider, ProviderError, VideoMetadata};

/// 11-character video id after `v=` or a path separator.
static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

/// Extract the video id from a watch, short, embed or `youtu.be` URL.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub struct YouTubeProvider {
    probe: YtDlpProbe,
}

impl YouTubeProvider {
    pub fn new(probe: YtDlpProbe) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl MetadataProvider for YouTubeProvider {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ProviderError> {
        let id = extract_video_id(url).ok_or(ProviderError::InvalidUrl(Platform::YouTube))?;
        let canonical = format!("https://www.youtube.com/watch?v={id}");

        let info = match self.probe.probe(&canonical).await {
            Ok(info) => info,
            Err(Error::Tool { message, .. }) if is_unavailable(&message) => {
                return Err(ProviderError::NotFound("Video not found".into()));
            }
            Err(e) => return Err(anyhow::Error::new(e).into()),
        };

        Ok(VideoMetadata {
            title: info.title.clone().unwrap_or_else(|| "YouTube Video".into()),
            duration: info.duration_secs(),
            thumbnail: info
                .thumbnail
                .clone()
                .or_else(|| Some(format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"))),
            views: info.view_count,
            ..Default::default()
        })
    }
}
