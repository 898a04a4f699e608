//! Streaming of staged downloads back to the client.
//!
//! The response body owns the [`MediaFile`](crate::fetch::MediaFile), so the
//! staged file is removed when the body finishes, fails, or is dropped
//! because the client went away.

mod attachment;

pub use attachment::{attachment_disposition, stream_attachment, CORS_HEADERS};
