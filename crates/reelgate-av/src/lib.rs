//! # reelgate-av
//!
//! External media tool plumbing for reelgate.
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache the paths to
//!   yt-dlp and ffmpeg, honouring configured overrides.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.

pub mod command;
pub mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use tools::{ToolConfig, ToolInfo, ToolPaths, ToolRegistry, YT_DLP};
