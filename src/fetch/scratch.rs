use std::path::{Path, PathBuf};

use reelgate_core::Platform;

/// Directory where downloads are staged before streaming.
///
/// Created on demand; [`ensure`](ScratchDir::ensure) is safe to call from
/// any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Blocking variant used once at startup.
    pub fn ensure_blocking(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Fresh destination path: `<root>/<prefix>-<unix millis>-<uuid>.mp4`.
    pub fn allocate(&self, platform: Platform) -> PathBuf {
        self.root.join(format!(
            "{}-{}-{}.mp4",
            platform.file_prefix(),
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4()
        ))
    }
}
