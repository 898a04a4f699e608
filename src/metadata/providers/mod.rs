//! Concrete metadata provider implementations.
//!
//! Each submodule wraps a single upstream (yt-dlp, an oEmbed endpoint, a page
//! scrape, a REST API) and implements the
//! [`MetadataProvider`](super::MetadataProvider) trait.

pub mod facebook;
pub mod instagram;
pub mod tiktok;
pub mod twitter;
pub mod youtube;
pub mod ytdlp;

pub use facebook::FacebookProvider;
pub use instagram::InstagramProvider;
pub use tiktok::TikTokProvider;
pub use twitter::TwitterProvider;
pub use youtube::YouTubeProvider;
pub use ytdlp::{YtDlpInfo, YtDlpProbe};
