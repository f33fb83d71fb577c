use std::path::{Component, Path, PathBuf};

/// Path segment marking packages that are left out of the API documentation.
pub const INTERNAL_SEGMENT: &str = "internal";

/// Glob form of the exclusion, as handed to the documentation tool.
pub const INTERNAL_EXCLUDE_PATTERN: &str = "**/internal/**";

/// Whether any component of `path` is exactly the `internal` marker.
#[must_use]
pub fn is_internal(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(segment) => segment == INTERNAL_SEGMENT,
        _ => false,
    })
}

/// Effective input set of the document task.
#[must_use]
pub fn exclude_internal<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths.into_iter().filter(|path| !is_internal(path)).collect()
}
