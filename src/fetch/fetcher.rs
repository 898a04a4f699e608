use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reelgate_av::ToolCommand;
use reelgate_core::Result;

/// Downloads the media behind a URL into a file.
///
/// Implementations must write to `destination` and nowhere else; the
/// pipeline owns the path and cleans it up.
#[async_trait]
pub trait MediaFetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

/// [`MediaFetcher`] that shells out to yt-dlp.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: PathBuf,
    timeout: Duration,
}

impl YtDlpFetcher {
    pub fn new(program: PathBuf, timeout: Duration) -> Self {
        Self { program, timeout }
    }

    fn command(&self, url: &str, destination: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.program.clone());
        cmd.args(["-f", "best", "--no-playlist", "--no-part", "--no-progress"])
            .arg("-o")
            .arg(destination.to_string_lossy())
            .arg("--")
            .arg(url)
            .timeout(self.timeout);
        cmd
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        let output = self.command(url, destination).execute().await?;
        tracing::trace!(stdout = %output.stdout, "yt-dlp finished");
        Ok(())
    }
}
