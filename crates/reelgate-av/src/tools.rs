//! External tool detection.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external
//! CLI tools reelgate shells out to (yt-dlp, and optionally ffmpeg which
//! yt-dlp uses for remuxing) and provides lookup methods for callers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reelgate_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Name of the media-fetch tool.
pub const YT_DLP: &str = "yt-dlp";

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &[YT_DLP, "ffmpeg"];

/// Configured path overrides, deserialized from the `[tools]` config table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolPaths {
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,

    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

impl ToolPaths {
    fn override_for(&self, name: &str) -> Option<&Path> {
        match name {
            YT_DLP => self.yt_dlp_path.as_deref(),
            "ffmpeg" => self.ffmpeg_path.as_deref(),
            _ => None,
        }
    }
}

/// A discovered tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool name (e.g. "yt-dlp").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of the tool's version output, if it could be run.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using configured overrides).
    ///
    /// An override that exists on disk is used directly; otherwise
    /// [`which::which`] locates the tool in `PATH`. Tools that are not found
    /// are omitted from the registry.
    pub fn discover(paths: &ToolPaths) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let resolved = match paths.override_for(name) {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        "Configured path for {} does not exist: {}; falling back to PATH",
                        name,
                        p.display()
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Build a registry from explicit locations, skipping discovery.
    pub fn with_tools(entries: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        let tools = entries
            .into_iter()
            .map(|(name, path)| (name.clone(), ToolConfig { name, path }))
            .collect();
        Self { tools }
    }

    /// Return the [`ToolConfig`] for `name`, or [`Error::Tool`] if the tool
    /// was not found during discovery.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// Path for `name`, falling back to the bare name so the OS can still
    /// resolve it at spawn time.
    pub fn path_or_name(&self, name: &str) -> PathBuf {
        self.tools
            .get(name)
            .map(|t| t.path.clone())
            .unwrap_or_else(|| PathBuf::from(name))
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(name, &cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> --version` (`-version` for ffmpeg) and return the first line
/// of stdout.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        "ffmpeg" => "-version",
        _ => "--version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_with_default_paths() {
        let registry = ToolRegistry::discover(&ToolPaths::default());
        // Nothing is guaranteed to be installed; the call must not panic.
        let _ = registry.check_all();
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::default();
        let err = registry.require(YT_DLP).unwrap_err();
        assert!(err.to_string().contains("yt-dlp not found"));
    }

    #[test]
    fn check_all_reports_known_tools() {
        let infos = ToolRegistry::default().check_all();
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["yt-dlp", "ffmpeg"]);
        assert!(infos.iter().all(|i| !i.available));
    }

    #[test]
    fn path_or_name_falls_back() {
        let registry = ToolRegistry::default();
        assert_eq!(registry.path_or_name(YT_DLP), PathBuf::from("yt-dlp"));

        let registry =
            ToolRegistry::with_tools([(YT_DLP.to_string(), PathBuf::from("/opt/yt-dlp"))]);
        assert_eq!(registry.path_or_name(YT_DLP), PathBuf::from("/opt/yt-dlp"));
    }

    #[test]
    fn existing_override_is_used() {
        let exe = std::env::current_exe().unwrap();
        let paths = ToolPaths {
            yt_dlp_path: Some(exe.clone()),
            ffmpeg_path: None,
        };
        let registry = ToolRegistry::discover(&paths);
        assert_eq!(registry.require(YT_DLP).unwrap().path, exe);
    }

    #[test]
    fn tool_paths_deserialize() {
        let paths: ToolPaths =
            serde_json::from_str(r#"{"yt_dlp_path": "/usr/bin/yt-dlp"}"#).unwrap();
        assert_eq!(paths.yt_dlp_path, Some(PathBuf::from("/usr/bin/yt-dlp")));
        assert!(paths.ffmpeg_path.is_none());
    }
}
