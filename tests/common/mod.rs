//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds an [`AppContext`] around stub
//! collaborators and a temporary scratch directory. [`TestHarness::serve`]
//! additionally starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reelgate::config::Config;
use reelgate::fetch::{MediaFetcher, MediaPipeline, ScratchDir};
use reelgate::metadata::{MetadataProvider, MetadataRegistry, ProviderError, VideoMetadata};
use reelgate::server::{create_router, AppContext};
use reelgate_core::{Error, Platform};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Stub collaborators
// ---------------------------------------------------------------------------

/// Fetcher that writes a fixed payload instead of running yt-dlp.
#[derive(Default)]
pub struct StubFetcher {
    pub payload: Vec<u8>,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub destinations: Mutex<Vec<PathBuf>>,
}

impl StubFetcher {
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            payload,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaFetcher for StubFetcher {
    async fn fetch(&self, _url: &str, destination: &Path) -> reelgate_core::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.destinations
            .lock()
            .unwrap()
            .push(destination.to_path_buf());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::tool("yt-dlp", "ERROR: Unsupported URL"));
        }
        tokio::fs::write(destination, &self.payload).await?;
        Ok(())
    }
}

/// Provider that returns canned metadata (or fails) for one platform.
pub struct StubProvider {
    pub platform: Platform,
    pub result: Option<VideoMetadata>,
    pub calls: AtomicUsize,
}

impl StubProvider {
    pub fn found(platform: Platform, metadata: VideoMetadata) -> Arc<Self> {
        Arc::new(Self {
            platform,
            result: Some(metadata),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(platform: Platform) -> Arc<Self> {
        Arc::new(Self {
            platform,
            result: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch_metadata(&self, _url: &str) -> Result<VideoMetadata, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| anyhow::anyhow!("upstream unavailable").into())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct TestHarness {
    pub ctx: AppContext,
    pub fetcher: Arc<StubFetcher>,
    pub scratch: TempDir,
}

impl TestHarness {
    /// Harness with a 1 KiB payload and no metadata providers.
    pub fn new() -> Self {
        Self::build(StubFetcher::with_payload(vec![7u8; 1024]), Vec::new())
    }

    pub fn with_fetcher(fetcher: StubFetcher) -> Self {
        Self::build(fetcher, Vec::new())
    }

    pub fn with_providers(providers: Vec<Arc<StubProvider>>) -> Self {
        let providers = providers
            .into_iter()
            .map(|p| p as Arc<dyn MetadataProvider>)
            .collect();
        Self::build(StubFetcher::with_payload(vec![7u8; 1024]), providers)
    }

    pub fn build(fetcher: StubFetcher, providers: Vec<Arc<dyn MetadataProvider>>) -> Self {
        let scratch = tempfile::tempdir().expect("failed to create scratch dir");

        let mut config = Config::default();
        config.download.scratch_dir = scratch.path().join("downloads");
        config.download.chunk_size = 8 * 1024;

        let mut registry = MetadataRegistry::new(Duration::from_secs(5));
        for provider in providers {
            registry.register(provider);
        }

        let fetcher = Arc::new(fetcher);
        let pipeline = MediaPipeline::new(
            fetcher.clone(),
            ScratchDir::new(config.download.scratch_dir.clone()),
        );

        Self {
            ctx: AppContext::new(config, registry, pipeline),
            fetcher,
            scratch,
        }
    }

    pub fn router(&self) -> axum::Router {
        create_router(self.ctx.clone())
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.ctx.config.download.scratch_dir.clone()
    }

    /// Number of entries currently staged in the scratch directory.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.scratch_dir())
            .map(|d| d.count())
            .unwrap_or(0)
    }

    /// Wait until the scratch directory is empty or `timeout` elapses.
    pub async fn wait_for_empty_scratch(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.staged_files() == 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.staged_files() == 0
    }

    /// Serve the router on a random local port.
    pub async fn serve(&self) -> SocketAddr {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }
}

/// Deterministic non-repeating-ish payload for byte comparisons.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 253) as u8).collect()
}
