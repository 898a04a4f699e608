//! reelgate-core: platform tags, source classification, and the unified
//! error type shared by every reelgate crate.

pub mod error;
pub mod platform;

pub use error::{Error, Result};
pub use platform::{classify, Platform};
