use std::path::Path;

use anyhow::{Context, Result};

/// `./`-prefixed path of `path` relative to `root`.
///
/// # Errors
/// Returns error if `path` is not inside `root`.
pub fn get_relative_path(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is not inside {}", path.display(), root.display()))?;
    Ok(format!("./{}", relative.to_string_lossy()))
}
