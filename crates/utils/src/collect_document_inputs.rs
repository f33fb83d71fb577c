use std::path::{Path, PathBuf};

use anyhow::Result;
use buildplan_core::document::{INTERNAL_EXCLUDE_PATTERN, exclude_internal};
use glob::Pattern;
use ignore::WalkBuilder;

/// Java sources under `source_dir` that go into the API documentation,
/// relative to `source_dir` and sorted. Files in `internal` packages and
/// files ignored by `.gitignore` are left out.
///
/// # Errors
/// Returns error if walking the directory fails.
pub fn collect_document_inputs(source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        return Ok(Vec::new());
    }
    let internal = Pattern::new(INTERNAL_EXCLUDE_PATTERN)?;

    let mut sources = Vec::new();
    for entry in WalkBuilder::new(source_dir).hidden(true).build() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "java") {
            continue;
        }
        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };
        if internal.matches_path(relative) {
            continue;
        }
        sources.push(relative.to_path_buf());
    }

    let mut sources = exclude_internal(sources);
    sources.sort();
    Ok(sources)
}
