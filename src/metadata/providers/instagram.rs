//! Instagram metadata provider.

use async_trait::async_trait;
use reelgate_core::{classify, Error, Platform};

use super::ytdlp::{is_unavailable, YtDlpProbe};
use crate::metadata::provider::{MetadataProvider, ProviderError, VideoMetadata};

pub struct InstagramProvider {
    probe: YtDlpProbe,
}

impl InstagramProvider {
    pub fn new(probe: YtDlpProbe) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl MetadataProvider for InstagramProvider {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ProviderError> {
        if classify(url) != Platform::Instagram {
            return Err(ProviderError::InvalidUrl(Platform::Instagram));
        }

        let info = match self.probe.probe(url).await {
            Ok(info) => info,
            Err(Error::Tool { message, .. }) if is_unavailable(&message) => {
                return Err(ProviderError::NotFound("Video not found".into()));
            }
            Err(e) => return Err(anyhow::Error::new(e).into()),
        };

        Ok(VideoMetadata {
            title: info.title.clone().unwrap_or_else(|| "Instagram Video".into()),
            duration: info.duration_secs(),
            thumbnail: info.thumbnail.clone(),
            views: info.view_count,
            uploader: info.uploader.clone(),
            ..Default::default()
        })
    }
}
