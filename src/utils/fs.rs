//! File system utilities shared across the crate.
//!
//! All descriptor and configuration output goes through [`atomic_write`] so
//! readers never observe a partially written file: content is written to a
//! sibling temp file, synced, and renamed over the target.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Create a directory and all of its parents if they do not exist.
///
/// Succeeds silently when the directory is already present. Fails when the
/// path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Path exists but is not a directory: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Write a string to a file atomically.
///
/// Convenience wrapper around [`atomic_write`] for UTF-8 content.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically write bytes to a file using a write-then-rename strategy.
///
/// 1. Write content to `<path>.tmp`
/// 2. Sync the temp file to disk
/// 3. Rename the temp file over the target path
///
/// Parent directories are created automatically. The target file either
/// contains the new content or the old content, never a partial write.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Recursively copy a directory and all of its contents.
///
/// Creates the destination if needed and preserves the directory structure.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }

    Ok(())
}
