use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::error::{BuildError, Result};
use crate::metadata::{License, ProjectMetadata, Scm};
use crate::module::ModuleDescriptor;

/// Maven repositories receiving snapshot and release artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repositories {
    #[serde(default = "default_snapshot_url")]
    pub snapshot_url: String,
    #[serde(default = "default_release_url")]
    pub release_url: String,
}

fn default_snapshot_url() -> String {
    "https://oss.sonatype.org/content/repositories/snapshots/".to_string()
}

fn default_release_url() -> String {
    "https://oss.sonatype.org/service/local/staging/deploy/maven2/".to_string()
}

impl Default for Repositories {
    fn default() -> Self {
        Self {
            snapshot_url: default_snapshot_url(),
            release_url: default_release_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RepositoryKind {
    Snapshot,
    Release,
}

impl RepositoryKind {
    /// Snapshot iff the version ends with `SNAPSHOT`.
    #[must_use]
    pub fn for_metadata(metadata: &ProjectMetadata) -> Self {
        if metadata.is_snapshot() {
            Self::Snapshot
        } else {
            Self::Release
        }
    }
}

impl Display for RepositoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Snapshot => "snapshot",
            Self::Release => "release",
        })
    }
}

/// Key/value store consulted for publishing credentials.
pub trait PropertySource {
    fn property(&self, key: &str) -> Option<String>;
}

impl PropertySource for HashMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// What to do when a credential property is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialFallback {
    /// Record the credential as missing; publishing fails at upload time.
    #[default]
    Defer,
    /// Use the property key itself as the value. Only useful against local
    /// test repositories that accept any login.
    Placeholder,
}

/// Where credentials are looked up and how absence is handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSettings {
    #[serde(default = "default_username_key")]
    pub username_key: String,
    #[serde(default = "default_password_key")]
    pub password_key: String,
    #[serde(default)]
    pub fallback: CredentialFallback,
}

fn default_username_key() -> String {
    "nexus_username".to_string()
}

fn default_password_key() -> String {
    "nexus_password".to_string()
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            username_key: default_username_key(),
            password_key: default_password_key(),
            fallback: CredentialFallback::default(),
        }
    }
}

/// A resolved credential. Serializes without revealing the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Provided(String),
    Missing { key: String },
}

impl Credential {
    /// Look `key` up in `properties`, applying `fallback` if it is absent.
    #[must_use]
    pub fn resolve(
        properties: &dyn PropertySource,
        key: &str,
        fallback: CredentialFallback,
    ) -> Self {
        match properties.property(key) {
            Some(value) => Self::Provided(value),
            None => match fallback {
                CredentialFallback::Defer => Self::Missing {
                    key: key.to_string(),
                },
                CredentialFallback::Placeholder => {
                    warn!(key, "credential not configured, using placeholder value");
                    Self::Provided(key.to_string())
                }
            },
        }
    }

    /// # Errors
    /// Returns `BuildError::PublishCredentialMissing` for a missing credential.
    pub fn value(&self) -> Result<&str> {
        match self {
            Self::Provided(value) => Ok(value),
            Self::Missing { key } => Err(BuildError::PublishCredentialMissing { key: key.clone() }),
        }
    }
}

impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Provided(_) => serializer.serialize_str("***"),
            Self::Missing { .. } => serializer.serialize_none(),
        }
    }
}

/// Upload destination of a publish run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishTarget {
    pub kind: RepositoryKind,
    pub repository_url: String,
    pub username: Credential,
    pub password: Credential,
}

impl PublishTarget {
    /// Username and password for the upload.
    ///
    /// # Errors
    /// Returns `BuildError::PublishCredentialMissing` if either is missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        Ok((self.username.value()?, self.password.value()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pom {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub inception_year: Option<i32>,
    pub licenses: Vec<License>,
    pub developers: Vec<Developer>,
    pub scm: Scm,
}

/// All facts the upload step needs for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishingDescriptor {
    pub coordinates: Coordinates,
    pub pom: Pom,
    pub target: PublishTarget,
}

impl PublishingDescriptor {
    #[must_use]
    pub fn artifact_id(&self) -> &str {
        &self.coordinates.artifact_id
    }
}

/// Assemble the publishing descriptor of `module`.
///
/// Never fails: missing credentials are recorded and only reported when
/// [`PublishTarget::credentials`] is called by the uploader.
#[must_use]
pub fn build_descriptor(
    metadata: &ProjectMetadata,
    module: &ModuleDescriptor,
    repositories: &Repositories,
    properties: &dyn PropertySource,
    credentials: &CredentialSettings,
) -> PublishingDescriptor {
    let kind = RepositoryKind::for_metadata(metadata);
    let repository_url = match kind {
        RepositoryKind::Snapshot => repositories.snapshot_url.clone(),
        RepositoryKind::Release => repositories.release_url.clone(),
    };

    PublishingDescriptor {
        coordinates: Coordinates {
            group_id: metadata.group.clone(),
            artifact_id: module.name().to_string(),
            version: metadata.version.clone(),
        },
        pom: Pom {
            name: module.name().to_string(),
            description: module
                .description()
                .map(str::to_string)
                .or_else(|| metadata.description.clone()),
            url: metadata.url.clone(),
            inception_year: metadata.inception_year,
            licenses: vec![metadata.license.clone()],
            developers: vec![Developer {
                id: metadata.id.clone(),
                name: metadata.author.clone(),
                email: metadata.email.clone(),
            }],
            scm: metadata.resolved_scm(),
        },
        target: PublishTarget {
            kind,
            repository_url,
            username: Credential::resolve(
                properties,
                &credentials.username_key,
                credentials.fallback,
            ),
            password: Credential::resolve(
                properties,
                &credentials.password_key,
                credentials.fallback,
            ),
        },
    }
}
