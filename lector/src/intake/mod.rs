//! Image intake.
//!
//! Turns the `image` field of a request (base64 text or an uploaded file)
//! into a uniquely named file in the scratch directory. The returned
//! [`TempImageFile`] deletes itself on drop, so a request never leaks its
//! file regardless of how it ends.

mod source;
mod temp_file;

pub use source::{decode_base64, split_data_uri, ImageSource, DEFAULT_BASE64_EXTENSION};
pub use temp_file::{sweep_stale, unique_file_name, TempImageFile, TEMP_FILE_PREFIX};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Age after which leftover scratch files are removed at startup.
pub const STALE_AFTER: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct ImageIntake {
    temp_dir: PathBuf,
}

impl ImageIntake {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Create the scratch directory if it does not exist yet.
    pub async fn ensure_temp_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.temp_dir).await?;
        Ok(())
    }

    /// Decode `source` and write it to a new temp file.
    pub async fn materialize(&self, source: ImageSource) -> Result<TempImageFile> {
        let (bytes, extension) = source.into_bytes()?;
        TempImageFile::create(&self.temp_dir, &extension, &bytes).await
    }

    /// Remove scratch files older than [`STALE_AFTER`].
    pub async fn sweep(&self) -> Result<usize> {
        sweep_stale(&self.temp_dir, STALE_AFTER).await
    }
}
