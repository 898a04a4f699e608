//! Video metadata lookup.
//!
//! [`MetadataRegistry`] maps each [`Platform`](reelgate_core::Platform) to a
//! [`MetadataProvider`]; `/detect` goes through the registry and never sees a
//! provider error directly.

pub mod provider;
pub mod providers;
pub mod registry;

pub use provider::{MetadataProvider, MetadataResult, ProviderError, VideoMetadata};
pub use registry::MetadataRegistry;
