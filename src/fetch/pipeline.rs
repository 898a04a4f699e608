use std::path::Path;
use std::sync::Arc;

use reelgate_core::{Error, Platform, Result};

use super::fetcher::MediaFetcher;
use super::media_file::MediaFile;
use super::scratch::ScratchDir;

/// Sidecar suffixes yt-dlp may leave next to the destination.
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp"];

/// Validates a download request, runs the fetcher into a unique scratch
/// path and returns the staged file.
pub struct MediaPipeline {
    fetcher: Arc<dyn MediaFetcher>,
    scratch: ScratchDir,
}

impl MediaPipeline {
    pub fn new(fetcher: Arc<dyn MediaFetcher>, scratch: ScratchDir) -> Self {
        Self { fetcher, scratch }
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Fetch the media behind `url` for an already-classified `platform`.
    ///
    /// No process is spawned unless the URL passes the platform's download
    /// check. The fetch runs on its own task holding the [`MediaFile`]
    /// guard, so if the caller goes away mid-fetch the file is deleted as
    /// soon as the tool finishes.
    pub async fn fetch_media(&self, platform: Platform, url: &str) -> Result<MediaFile> {
        if !platform.is_supported() {
            return Err(Error::UnsupportedSource);
        }
        if !platform.accepts_download_url(url) {
            return Err(Error::InvalidUrl { platform });
        }

        self.scratch.ensure().await?;
        let file = MediaFile::new(self.scratch.allocate(platform), platform);

        tracing::info!(
            %platform,
            url,
            path = %file.path().display(),
            "Fetching media"
        );

        let fetcher = Arc::clone(&self.fetcher);
        let url = url.to_owned();
        let task = tokio::spawn(async move {
            let result = fetcher.fetch(&url, file.path()).await;
            finish_fetch(platform, file, result).await
        });

        task.await
            .map_err(|e| Error::Internal(format!("fetch task failed: {e}")))?
    }
}

/// Turn the fetcher's outcome into a staged file or a tool error, cleaning
/// up anything left behind on failure.
async fn finish_fetch(
    platform: Platform,
    file: MediaFile,
    result: Result<()>,
) -> Result<MediaFile> {
    let failure = match result {
        Ok(()) => match tokio::fs::metadata(file.path()).await {
            Ok(meta) if meta.is_file() => {
                tracing::info!(
                    %platform,
                    path = %file.path().display(),
                    bytes = meta.len(),
                    "Media fetched"
                );
                return Ok(file);
            }
            Ok(_) => "destination is not a regular file".to_string(),
            Err(e) => format!("tool reported success but produced no file: {e}"),
        },
        Err(e) => e.to_string(),
    };

    tracing::warn!(%platform, "Media fetch failed: {}", failure);
    remove_partials(file.path()).await;
    drop(file);
    Err(Error::external_tool(platform, failure))
}

async fn remove_partials(destination: &Path) {
    for suffix in PARTIAL_SUFFIXES {
        let mut partial = destination.as_os_str().to_owned();
        partial.push(suffix);
        if tokio::fs::remove_file(&partial).await.is_ok() {
            tracing::debug!(path = ?partial, "Removed partial download");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingFetcher {
        calls: AtomicUsize,
        destinations: Mutex<Vec<PathBuf>>,
        fail: bool,
        write: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl MediaFetcher for RecordingFetcher {
        async fn fetch(&self, _url: &str, destination: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.destinations.lock().unwrap().push(destination.to_path_buf());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.write {
                tokio::fs::write(destination, b"payload").await?;
                let mut partial = destination.as_os_str().to_owned();
                partial.push(".part");
                if self.fail {
                    tokio::fs::write(&partial, b"half").await?;
                }
            }
            if self.fail {
                return Err(Error::tool("yt-dlp", "exited with 1"));
            }
            Ok(())
        }
    }

    fn pipeline(dir: &Path, fetcher: Arc<RecordingFetcher>) -> MediaPipeline {
        MediaPipeline::new(fetcher, ScratchDir::new(dir.join("downloads")))
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn stages_file_in_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(RecordingFetcher {
            write: true,
            ..Default::default()
        });
        let pipeline = pipeline(dir.path(), fetcher.clone());

        let file = pipeline
            .fetch_media(Platform::TikTok, "https://www.tiktok.com/@a/video/1")
            .await
            .unwrap();
        assert!(file.path().exists());
        assert!(file.path().starts_with(pipeline.scratch().path()));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unknown_platform_is_rejected_without_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(RecordingFetcher::default());
        let pipeline = pipeline(dir.path(), fetcher.clone());

        let err = pipeline
            .fetch_media(Platform::Unknown, "https://example.com/v.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(!pipeline.scratch().path().exists());
    }

    #[tokio::test]
    async fn instagram_requires_reel_path() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(RecordingFetcher::default());
        let pipeline = pipeline(dir.path(), fetcher.clone());

        let err = pipeline
            .fetch_media(Platform::Instagram, "https://www.instagram.com/p/Cabc/")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid Instagram URL");
        assert_eq!(err.http_status(), 400);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn tool_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(RecordingFetcher {
            write: true,
            fail: true,
            ..Default::default()
        });
        let pipeline = pipeline(dir.path(), fetcher.clone());

        let err = pipeline
            .fetch_media(Platform::Twitter, "https://x.com/a/status/1")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to download Twitter video");
        assert_eq!(err.http_status(), 500);
        assert_eq!(entries(pipeline.scratch().path()), 0);
    }

    #[tokio::test]
    async fn success_without_file_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(RecordingFetcher::default());
        let pipeline = pipeline(dir.path(), fetcher);

        let err = pipeline
            .fetch_media(Platform::YouTube, "https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalTool {
                platform: Platform::YouTube,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn concurrent_fetches_use_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(RecordingFetcher {
            write: true,
            ..Default::default()
        });
        let pipeline = Arc::new(pipeline(dir.path(), fetcher.clone()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move {
                    pipeline
                        .fetch_media(Platform::YouTube, "https://youtu.be/dQw4w9WgXcQ")
                        .await
                })
            })
            .collect();

        let mut files = Vec::new();
        for handle in handles {
            files.push(handle.await.unwrap().unwrap());
        }

        let mut paths: Vec<_> = fetcher.destinations.lock().unwrap().clone();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 16);

        drop(files);
        assert_eq!(entries(pipeline.scratch().path()), 0);
    }

    #[tokio::test]
    async fn abandoned_fetch_deletes_late_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(RecordingFetcher {
            write: true,
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        });
        let pipeline = pipeline(dir.path(), fetcher.clone());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            pipeline.fetch_media(Platform::YouTube, "https://youtu.be/dQw4w9WgXcQ"),
        )
        .await;
        assert!(abandoned.is_err());

        // Let the detached task finish writing and drop its guard.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(entries(pipeline.scratch().path()), 0);
    }
}
