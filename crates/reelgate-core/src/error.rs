//! Unified error type for reelgate.
//!
//! Every failure that can reach an HTTP client funnels into [`Error`], which
//! carries enough context for handlers to derive a status code via
//! [`Error::http_status`].

use crate::platform::Platform;

/// Unified error type covering all request-level failure modes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request body was missing or malformed.
    #[error("{0}")]
    InvalidRequest(String),

    /// The URL did not classify as any supported platform.
    #[error("Unsupported video source")]
    UnsupportedSource,

    /// The URL classified, but the platform's downloader rejects it.
    #[error("Invalid {platform} URL")]
    InvalidUrl {
        /// Platform the URL was validated against.
        platform: Platform,
    },

    /// The media-fetch tool failed, timed out, or produced no file.
    #[error("Failed to download {platform} video")]
    ExternalTool {
        /// Platform being downloaded.
        platform: Platform,
        /// Tool diagnostics; logged, never sent to clients.
        detail: String,
    },

    /// An external command could not be run to completion.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidRequest(_) => 400,
            Error::UnsupportedSource => 400,
            Error::InvalidUrl { .. } => 400,
            Error::ExternalTool { .. } => 500,
            Error::Tool { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::ExternalTool`].
    pub fn external_tool(platform: Platform, detail: impl Into<String>) -> Self {
        Error::ExternalTool {
            platform,
            detail: detail.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
