use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use reelgate_core::Platform;

/// Owned handle to a staged download.
///
/// The file is removed exactly once: by the first call to
/// [`release`](MediaFile::release) or, failing that, when the guard is
/// dropped. A file that is already gone counts as released.
#[derive(Debug)]
pub struct MediaFile {
    path: PathBuf,
    platform: Platform,
    released: bool,
}

impl MediaFile {
    pub fn new(path: PathBuf, platform: Platform) -> Self {
        Self {
            path,
            platform,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Filename offered to the client, e.g. `tiktok-video.mp4`.
    pub fn attachment_name(&self) -> String {
        self.platform.attachment_name()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Delete the staged file. Returns `true` only for the call that
    /// performed the release.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;

        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed staged media"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Staged media already gone")
            }
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "Failed to remove staged media: {}",
                e
            ),
        }
        true
    }
}

impl Drop for MediaFile {
    fn drop(&mut self) {
        self.release();
    }
}
