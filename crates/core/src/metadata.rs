use serde::{Deserialize, Serialize};

use crate::attributes::validate_attribute_value;
use crate::error::{BuildError, Result};

/// Version suffix marking a pre-release build.
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// License published in the POM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub name: String,
    pub url: String,
    #[serde(default = "default_distribution")]
    pub distribution: String,
}

fn default_distribution() -> String {
    "repo".to_string()
}

impl Default for License {
    fn default() -> Self {
        Self {
            name: "The Apache License, Version 2.0".to_string(),
            url: "http://www.apache.org/licenses/LICENSE-2.0.txt".to_string(),
            distribution: default_distribution(),
        }
    }
}

/// Source-control links. Empty fields are derived from the project URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub connection: String,
    #[serde(default)]
    pub developer_connection: String,
}

/// Static identity of the library being built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMetadata {
    pub id: String,
    pub name: String,
    pub group: String,
    pub version: String,
    pub author: String,
    pub email: String,
    pub url: String,
    pub inception_year: Option<i32>,
    pub description: Option<String>,
    pub license: License,
    pub scm: Scm,
}

impl ProjectMetadata {
    /// Check that every field the build depends on is present and that the
    /// fields copied into manifests are single-line.
    ///
    /// # Errors
    /// Returns `BuildError::Configuration` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("id", &self.id),
            ("name", &self.name),
            ("group", &self.group),
            ("version", &self.version),
            ("author", &self.author),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BuildError::Configuration(format!(
                    "project metadata field '{field}' is required"
                )));
            }
        }
        for (field, value) in required.into_iter().chain([("url", &self.url)]) {
            validate_attribute_value(field, value)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with(SNAPSHOT_SUFFIX)
    }

    /// `<id>-<version>`, substituted for `@__identifier__@` in source headers.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}-{}", self.id, self.version)
    }

    /// SCM links with blanks filled in from the project URL.
    #[must_use]
    pub fn resolved_scm(&self) -> Scm {
        let connection = if self.scm.connection.is_empty() && !self.url.is_empty() {
            format!("scm:git:{}.git", self.url.trim_end_matches('/'))
        } else {
            self.scm.connection.clone()
        };
        Scm {
            url: if self.scm.url.is_empty() {
                self.url.clone()
            } else {
                self.scm.url.clone()
            },
            developer_connection: if self.scm.developer_connection.is_empty() {
                connection.clone()
            } else {
                self.scm.developer_connection.clone()
            },
            connection,
        }
    }
}
