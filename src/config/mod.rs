mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Expand `~` in the filesystem paths a config file may set.
fn expand_paths(config: &mut Config) {
    config.download.scratch_dir = expand_tilde(&config.download.scratch_dir);
    if let Some(path) = config.tools.yt_dlp_path.as_mut() {
        *path = expand_tilde(path);
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./reelgate.toml",
        "./config.toml",
        "~/.config/reelgate/config.toml",
        "/etc/reelgate/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.download.timeout_secs == 0 {
        anyhow::bail!("download.timeout_secs must be greater than 0");
    }

    if config.download.chunk_size == 0 {
        anyhow::bail!("download.chunk_size must be greater than 0");
    }

    if config.metadata.timeout_secs == 0 {
        anyhow::bail!("metadata.timeout_secs must be greater than 0");
    }

    for (name, value) in [
        ("metadata.twitter_oembed_url", &config.metadata.twitter_oembed_url),
        ("metadata.tiktok_api_url", &config.metadata.tiktok_api_url),
    ] {
        url::Url::parse(value).with_context(|| format!("{name} is not a valid URL: {value}"))?;
    }

    if let Some(ref path) = config.tools.yt_dlp_path {
        if !path.exists() {
            tracing::warn!("tools.yt_dlp_path does not exist: {:?}", path);
        }
    }

    Ok(())
}
