//! Metadata probing through `yt-dlp --dump-json`.
//!
//! Shared by the YouTube and Instagram providers. The probe never downloads
//! media; it asks yt-dlp for the info dictionary and keeps the handful of
//! fields the service reports.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use reelgate_av::ToolCommand;
use serde::Deserialize;

/// Subset of the yt-dlp info dictionary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YtDlpInfo {
    pub title: Option<String>,
    /// Seconds; yt-dlp reports a float for some extractors.
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub view_count: Option<u64>,
    pub uploader: Option<String>,
}

impl YtDlpInfo {
    /// Duration rounded to whole seconds, ignoring nonsense values.
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64)
    }
}

/// Runs `yt-dlp --dump-json --no-playlist -- <url>`.
#[derive(Debug, Clone)]
pub struct YtDlpProbe {
    program: PathBuf,
    timeout: Duration,
}

impl YtDlpProbe {
    pub fn new(program: PathBuf, timeout: Duration) -> Self {
        Self { program, timeout }
    }

    /// Probe `url`. Errors carry yt-dlp's stderr so callers can classify
    /// "not found" style failures.
    pub async fn probe(&self, url: &str) -> reelgate_core::Result<YtDlpInfo> {
        let output = ToolCommand::new(self.program.clone())
            .args(["--dump-json", "--no-playlist", "--no-warnings", "--skip-download"])
            .arg("--")
            .arg(url)
            .timeout(self.timeout)
            .execute()
            .await?;

        parse_info(&output.stdout)
            .map_err(|e| reelgate_core::Error::tool(reelgate_av::YT_DLP, format!("{e:#}")))
    }
}

/// Parse the first JSON document in yt-dlp's stdout.
pub fn parse_info(stdout: &str) -> anyhow::Result<YtDlpInfo> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .context("yt-dlp produced no output")?;

    serde_json::from_str(line).context("Failed to parse yt-dlp JSON output")
}

/// Whether a yt-dlp failure message means the video does not exist or is
/// not viewable, as opposed to a transport or tool failure.
pub fn is_unavailable(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    [
        "video unavailable",
        "private video",
        "this video is not available",
        "does not exist",
        "has been removed",
    ]
    .iter()
    .any(|needle| lower.contains(needle))
}
