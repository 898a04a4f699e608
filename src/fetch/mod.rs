//! Media fetch pipeline: validate a URL, run the fetch tool into a unique
//! scratch path, and hand back a [`MediaFile`] guard that deletes the file
//! when it goes away.

pub mod fetcher;
pub mod media_file;
pub mod pipeline;
pub mod scratch;

pub use fetcher::{MediaFetcher, YtDlpFetcher};
pub use media_file::MediaFile;
pub use pipeline::MediaPipeline;
pub use scratch::ScratchDir;
