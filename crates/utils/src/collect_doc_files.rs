use std::path::{Path, PathBuf};

use anyhow::Result;
use buildplan_core::document::exclude_internal;
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;

pub const DOC_FILES_PATTERN: &str = "**/doc-files/*";

/// Images and other files placed directly in a package's `doc-files`
/// directory, relative to `source_dir` and sorted. The documentation tool
/// copies them next to the generated pages.
///
/// # Errors
/// Returns error if walking the directory fails.
pub fn collect_doc_files(source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = Pattern::new(DOC_FILES_PATTERN)?;
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for entry in WalkBuilder::new(source_dir).hidden(true).build() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };
        if pattern.matches_path_with(relative, options) {
            files.push(relative.to_path_buf());
        }
    }

    let mut files = exclude_internal(files);
    files.sort();
    Ok(files)
}
