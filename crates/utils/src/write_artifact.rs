use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs::{copy, create_dir_all, write};

/// Write a build artifact, creating its parent directories.
///
/// # Errors
/// Returns error if the directory or file cannot be written.
pub async fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Copy `source` to `target`, creating the parent directories of `target`.
///
/// # Errors
/// Returns error if the directory cannot be created or the copy fails.
pub async fn copy_artifact(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    copy(source, target).await.with_context(|| {
        format!("Failed to copy {} to {}", source.display(), target.display())
    })?;
    Ok(())
}
