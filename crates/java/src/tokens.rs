use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use buildplan_core::{EnvironmentSnapshot, ProjectMetadata};
use regex::{Captures, Regex};
use tokio::fs::{create_dir_all, read, read_dir, write};

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@__([A-Za-z0-9_]+?)__@").expect("hardcoded regex must compile")
});

/// Replaces `@__name__@` tokens in source headers. Unknown tokens are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceTokens {
    tokens: BTreeMap<String, String>,
}

impl ReplaceTokens {
    /// `identifier` → `<id>-<version>`, `year` → the copyright year range.
    #[must_use]
    pub fn for_project(metadata: &ProjectMetadata, snapshot: &EnvironmentSnapshot) -> Self {
        Self::default()
            .token("identifier", metadata.identifier())
            .token("year", snapshot.copyright_year())
    }

    #[must_use]
    pub fn token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        TOKEN_PATTERN.replace_all(content, |caps: &Captures<'_>| {
            self.tokens
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
    }

    /// Copy the tree at `source` to `target`, filtering UTF-8 files and
    /// copying others byte for byte. Returns the number of files written.
    ///
    /// # Errors
    /// Returns error if reading or writing a file fails.
    pub async fn filter_tree(&self, source: &Path, target: &Path) -> Result<usize> {
        let mut pending: Vec<PathBuf> = vec![PathBuf::new()];
        let mut written = 0;
        while let Some(relative) = pending.pop() {
            let dir = source.join(&relative);
            create_dir_all(target.join(&relative)).await?;
            let mut entries = read_dir(&dir)
                .await
                .with_context(|| format!("Failed to read {}", dir.display()))?;
            while let Some(entry) = entries.next_entry().await? {
                let child = relative.join(entry.file_name());
                if entry.file_type().await?.is_dir() {
                    pending.push(child);
                    continue;
                }
                let bytes = read(entry.path()).await?;
                let contents = match String::from_utf8(bytes) {
                    Ok(text) => self.apply(&text).into_owned().into_bytes(),
                    Err(e) => e.into_bytes(),
                };
                write(target.join(&child), contents).await?;
                written += 1;
            }
        }
        Ok(written)
    }
}
