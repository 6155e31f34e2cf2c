use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use nanoid::nanoid;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::Result;

/// Every scratch file starts with this; the startup sweep only touches these.
pub const TEMP_FILE_PREFIX: &str = "ocr_";

const TOKEN_LEN: usize = 16;
const HEX_ALPHABET: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// An image written to the scratch directory for the duration of one request.
///
/// Callers release it with [`TempImageFile::remove`]. If the guard is
/// dropped first (an early `?` return, a cancelled request), `Drop` removes
/// the file instead.
#[derive(Debug)]
pub struct TempImageFile {
    path: PathBuf,
    removed: bool,
}

impl TempImageFile {
    /// Write `bytes` to a fresh file in `dir` and return its guard.
    ///
    /// The file is created with create-new semantics, so a name clash is an
    /// error instead of an overwrite. The handle is flushed and closed
    /// before this returns.
    pub async fn create(dir: &Path, extension: &str, bytes: &[u8]) -> Result<Self> {
        let path = dir.join(unique_file_name(extension));

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        // From here on the guard owns the path, so a failed write still cleans up.
        let guard = Self {
            path,
            removed: false,
        };

        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        debug!(path = %guard.path.display(), bytes = bytes.len(), "Wrote temporary image");
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file without blocking the runtime. Failures are logged.
    pub async fn remove(mut self) {
        let result = tokio::fs::remove_file(&self.path).await;
        log_removal(&self.path, result);
        self.removed = true;
    }
}

impl Drop for TempImageFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        // Drop cannot await; a single unlink is the only blocking call here.
        log_removal(&self.path, std::fs::remove_file(&self.path));
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!(path = %path.display(), "Removed temporary image"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove temporary image"
        ),
    }
}

/// `ocr_<16 hex>_<pid><extension>`
pub fn unique_file_name(extension: &str) -> String {
    let token = nanoid!(TOKEN_LEN, &HEX_ALPHABET);
    format!(
        "{TEMP_FILE_PREFIX}{token}_{pid}{extension}",
        pid = std::process::id()
    )
}

/// Delete `ocr_*` files in `dir` last modified more than `max_age` ago.
///
/// Returns the number of files removed. Files that cannot be inspected or
/// removed are logged and skipped.
pub async fn sweep_stale(dir: &Path, max_age: Duration) -> Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let is_scratch = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(TEMP_FILE_PREFIX));
        if !is_scratch {
            continue;
        }

        let path = entry.path();
        let modified = match entry.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not stat temporary file");
                continue;
            }
        };
        if modified >= cutoff {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not delete temporary file")
            }
        }
    }

    Ok(removed)
}
