//! reelgate - social video detection and download gateway
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod fetch;
pub mod metadata;
pub mod server;
pub mod streaming;
