//! Platform-keyed registry of [`MetadataProvider`] implementations.
//!
//! The [`MetadataRegistry`] is the only path from a classified URL to a
//! metadata collaborator. It never lets a provider failure escape: every
//! error, panic and timeout is normalized into [`MetadataResult::Failed`].

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::FutureExt;
use reelgate_av::{ToolRegistry, YT_DLP};
use reelgate_core::Platform;

use super::provider::{MetadataProvider, MetadataResult, ProviderError};
use super::providers::{
    FacebookProvider, InstagramProvider, TikTokProvider, TwitterProvider, YouTubeProvider,
    YtDlpProbe,
};
use crate::config::MetadataConfig;

/// Dispatch table from [`Platform`] to a metadata provider.
///
/// # Examples
///
/// ```rust,ignore
/// let mut registry = MetadataRegistry::new(Duration::from_secs(30));
/// registry.register(Arc::new(my_provider));
///
/// let result = registry.fetch(Platform::TikTok, url).await;
/// ```
pub struct MetadataRegistry {
    providers: HashMap<Platform, Arc<dyn MetadataProvider>>,
    timeout: Duration,
}

impl MetadataRegistry {
    /// Create an empty registry whose lookups are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: HashMap::new(),
            timeout,
        }
    }

    /// Registry with the built-in provider for every supported platform.
    pub fn with_defaults(config: &MetadataConfig, tools: &ToolRegistry) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for metadata providers")?;

        let probe = YtDlpProbe::new(tools.path_or_name(YT_DLP), config.timeout());

        let mut registry = Self::new(config.timeout());
        registry.register(Arc::new(YouTubeProvider::new(probe.clone())));
        registry.register(Arc::new(FacebookProvider::new(client.clone())));
        registry.register(Arc::new(TwitterProvider::new(
            client.clone(),
            config.twitter_oembed_url.clone(),
        )));
        registry.register(Arc::new(TikTokProvider::new(
            client,
            config.tiktok_api_url.clone(),
        )));
        registry.register(Arc::new(InstagramProvider::new(probe)));

        Ok(registry)
    }

    /// Register a provider under its [`MetadataProvider::platform`],
    /// replacing any previous provider for that platform.
    pub fn register(&mut self, provider: Arc<dyn MetadataProvider>) {
        let platform = provider.platform();
        if !platform.is_supported() {
            tracing::warn!("Ignoring metadata provider registered for an unknown platform");
            return;
        }
        self.providers.insert(platform, provider);
    }

    pub fn get(&self, platform: Platform) -> Option<&dyn MetadataProvider> {
        self.providers.get(&platform).map(|p| p.as_ref())
    }

    /// Platforms that currently have a provider, in classification order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::SUPPORTED
            .into_iter()
            .filter(|p| self.providers.contains_key(p))
            .collect()
    }

    /// Fetch metadata for `url` from the provider registered for `platform`.
    ///
    /// `Unknown` (or an unregistered platform) short-circuits to the
    /// "Metadata not available" placeholder without calling anything.
    pub async fn fetch(&self, platform: Platform, url: &str) -> MetadataResult {
        let Some(provider) = self.providers.get(&platform) else {
            return MetadataResult::unavailable();
        };

        let generic = || format!("Failed to fetch {platform} metadata");

        let lookup = AssertUnwindSafe(provider.fetch_metadata(url)).catch_unwind();

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(Ok(metadata))) => MetadataResult::Found(metadata),
            Ok(Ok(Err(err @ (ProviderError::InvalidUrl(_) | ProviderError::NotFound(_))))) => {
                tracing::debug!(%platform, url, "Metadata lookup rejected: {}", err);
                MetadataResult::failed(err.to_string())
            }
            Ok(Ok(Err(ProviderError::Upstream(e)))) => {
                tracing::warn!(%platform, url, "Error fetching metadata: {:#}", e);
                MetadataResult::failed(generic())
            }
            Ok(Err(_panic)) => {
                tracing::warn!(%platform, url, "Metadata provider panicked");
                MetadataResult::failed(generic())
            }
            Err(_elapsed) => {
                tracing::warn!(
                    %platform,
                    url,
                    "Metadata lookup timed out after {:?}",
                    self.timeout
                );
                MetadataResult::failed(generic())
            }
        }
    }
}
