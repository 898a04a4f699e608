use reelgate_av::ToolPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub tools: ToolPaths,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    /// Directory where fetched videos are staged before streaming. Created
    /// on startup if missing; never deleted by the service.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Upper bound on a single yt-dlp run (default: 600)
    #[serde(default = "default_download_timeout")]
    pub timeout_secs: u64,

    /// Read size when streaming a staged file to the client (default: 64 KiB)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_download_timeout() -> u64 {
    600
}

fn default_chunk_size() -> usize {
    64 * 1024
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            timeout_secs: default_download_timeout(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Upper bound on a single metadata lookup (default: 30)
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_twitter_oembed_url")]
    pub twitter_oembed_url: String,

    #[serde(default = "default_tiktok_api_url")]
    pub tiktok_api_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_metadata_timeout() -> u64 {
    30
}

fn default_twitter_oembed_url() -> String {
    "https://publish.twitter.com/oembed".to_string()
}

fn default_tiktok_api_url() -> String {
    "https://www.tikwm.com/api/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .to_string()
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_metadata_timeout(),
            twitter_oembed_url: default_twitter_oembed_url(),
            tiktok_api_url: default_tiktok_api_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl MetadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
