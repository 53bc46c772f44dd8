use crate::error::AudioResult;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extension of files picked up from the input directory
pub const INPUT_EXTENSION: &str = "wav";

/// Whether `dir` exists and is a directory
pub async fn is_directory(dir: &Path) -> bool {
    tokio::fs::metadata(dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// List the regular files directly inside `dir` whose extension is exactly
/// `extension`. Sub-directories are not entered. The result is sorted.
///
/// A name like `.wav` is a hidden file with no extension and is not selected.
pub async fn scan_inputs(dir: &Path, extension: &str) -> AudioResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension() != Some(OsStr::new(extension)) {
            continue;
        }
        // Follows symlinks, so a link to a WAV file counts
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => log::debug!("Skipping non-file {}", path.display()),
            Err(e) => log::warn!("Skipping unreadable entry {}: {}", path.display(), e),
        }
    }

    files.sort();
    Ok(files)
}
