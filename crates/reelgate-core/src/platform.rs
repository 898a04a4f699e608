//! Platform tags and source classification.
//!
//! A [`Platform`] is derived purely from the text of a URL. Classification
//! parses the URL, then compares its host against a fixed host list per
//! platform. Platforms are tried in [`Platform::SUPPORTED`] order and the
//! first match wins, so the result is deterministic even if two host lists
//! were ever to overlap.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Social platform a video URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "facebook")]
    Facebook,
    #[serde(rename = "twitter")]
    Twitter,
    #[serde(rename = "tiktok")]
    TikTok,
    #[serde(rename = "instagram")]
    Instagram,
    /// No host pattern matched. Serialized as `"Unknown"` to keep the wire
    /// format existing clients already parse.
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Platform {
    /// Supported platforms in classification priority order.
    pub const SUPPORTED: [Platform; 5] = [
        Platform::YouTube,
        Platform::Facebook,
        Platform::Twitter,
        Platform::TikTok,
        Platform::Instagram,
    ];

    /// Classify a URL. Never fails: empty, malformed, or unrecognized input
    /// yields [`Platform::Unknown`].
    pub fn classify(input: &str) -> Platform {
        let Some(url) = parse_lenient(input) else {
            return Platform::Unknown;
        };
        let Some(host) = url.host_str() else {
            return Platform::Unknown;
        };

        Self::SUPPORTED
            .into_iter()
            .find(|p| p.matches_host(host))
            .unwrap_or(Platform::Unknown)
    }

    /// Wire identifier (`"youtube"`, `"tiktok"`, ..., `"Unknown"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Unknown => "Unknown",
        }
    }

    /// Human-readable name used in messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::Unknown => "Unknown",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unknown)
    }

    /// Registrable domains served by this platform.
    pub fn hosts(&self) -> &'static [&'static str] {
        match self {
            Platform::YouTube => &["youtube.com", "youtu.be"],
            Platform::Facebook => &["facebook.com", "fb.watch"],
            Platform::Twitter => &["twitter.com", "x.com"],
            Platform::TikTok => &["tiktok.com"],
            Platform::Instagram => &["instagram.com"],
            Platform::Unknown => &[],
        }
    }

    /// Exact or subdomain match against [`Platform::hosts`].
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.hosts()
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }

    /// Whether `input` is a URL this platform's downloader will accept.
    ///
    /// Instagram downloads are limited to reels, so the path must start with
    /// a `reel` or `reels` segment followed by an id.
    pub fn accepts_download_url(&self, input: &str) -> bool {
        let Some(url) = parse_lenient(input) else {
            return false;
        };
        if !url.host_str().is_some_and(|h| self.matches_host(h)) {
            return false;
        }

        match self {
            Platform::Instagram => {
                let mut segments = url.path_segments().into_iter().flatten();
                matches!(segments.next(), Some("reel" | "reels"))
                    && segments.next().is_some_and(|id| !id.is_empty())
            }
            Platform::Unknown => false,
            _ => true,
        }
    }

    /// Prefix for staged download files and attachment names.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Platform::YouTube => "video",
            Platform::Facebook => "facebook-video",
            Platform::Twitter => "twitter-video",
            Platform::TikTok => "tiktok-video",
            Platform::Instagram => "instagram-reel",
            Platform::Unknown => "download",
        }
    }

    /// Filename offered to the client in `Content-Disposition`.
    pub fn attachment_name(&self) -> String {
        format!("{}.mp4", self.file_prefix())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Shorthand for [`Platform::classify`].
pub fn classify(input: &str) -> Platform {
    Platform::classify(input)
}

/// Parse a URL, retrying scheme-less input such as `youtu.be/abc` with an
/// `https://` prefix.
fn parse_lenient(input: &str) -> Option<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{trimmed}")).ok()
        }
        Err(_) => None,
    }
}
