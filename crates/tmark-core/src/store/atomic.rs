//! Whole-file reads and crash-safe replacement.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::StoreError;

/// Read a file's raw bytes; a missing file is `None`.
/// Decoding, UTF-8 included, is left to the caller.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io("reading", path, e)),
    }
}

/// Replace `path` with `contents` so readers see either the old or the new file.
///
/// The data goes to a uniquely named temp file in the same directory and is
/// renamed over the target. On failure the temp file is removed.
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| StoreError::io("creating directory", &dir, e))?;

    let temp_path = temp_path_for(&dir, path);
    if let Err(err) = write_then_rename(&temp_path, path, contents).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(err);
    }
    Ok(())
}

fn temp_path_for(dir: &Path, path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("bookmarks");
    dir.join(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
}

async fn write_then_rename(temp_path: &Path, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    // create_new refuses to follow a pre-planted symlink
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .await
        .map_err(|e| StoreError::io("creating temp file", temp_path, e))?;

    file.write_all(contents)
        .await
        .map_err(|e| StoreError::io("writing temp file", temp_path, e))?;
    file.sync_all()
        .await
        .map_err(|e| StoreError::io("syncing temp file", temp_path, e))?;
    drop(file);

    fs::rename(temp_path, path)
        .await
        .map_err(|e| StoreError::io("renaming temp file", path, e))
}
