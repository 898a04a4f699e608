//! Trait definition and types for metadata providers.
//!
//! Every platform backend (yt-dlp probing, oEmbed, scraping, third-party
//! REST APIs) implements [`MetadataProvider`]. The registry turns whatever a
//! provider returns, including its failures, into a [`MetadataResult`].

use async_trait::async_trait;
use reelgate_core::Platform;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Display metadata for a single video. Providers fill in whatever subset
/// their upstream exposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoMetadata {
    pub title: String,
    /// Length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Thumbnail or cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// View / play count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
}

impl VideoMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Outcome of a metadata lookup as returned to `/detect` callers.
///
/// Serialized untagged, so clients tell the variants apart by the presence
/// of `title`, `message`, or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum MetadataResult {
    Found(VideoMetadata),
    Unavailable { message: String },
    Failed { error: String },
}

impl MetadataResult {
    /// Placeholder returned for URLs that match no platform.
    pub fn unavailable() -> Self {
        MetadataResult::Unavailable {
            message: "Metadata not available".to_string(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        MetadataResult::Failed {
            error: error.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MetadataResult::Found(_))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by a provider.
///
/// `InvalidUrl` and `NotFound` carry caller-facing messages; `Upstream`
/// details are logged and replaced with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid {0} URL")]
    InvalidUrl(Platform),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that every platform metadata backend implements.
///
/// Providers are shared across request tasks behind an `Arc`, so they must
/// be `Send + Sync`. Platform-specific URL checks belong in the provider,
/// not in the registry.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Platform this provider serves.
    fn platform(&self) -> Platform;

    /// Fetch display metadata for `url`.
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ProviderError>;
}
