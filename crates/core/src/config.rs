use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::error::Result;
use crate::metadata::ProjectMetadata;
use crate::module::ModuleConfig;
use crate::publish::{CredentialSettings, Repositories};

/// Loaded from `.buildplan/config.json`: project metadata, modules, publishing
/// repositories, credential lookup, task commands and tool settings.
///
/// Task commands are keyed by `"<module>:<task>"` or just `"<task>"`; a task
/// without a command succeeds without doing anything.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub project: ProjectMetadata,

    /// Modules of the project. Empty means a single module named after the
    /// project id, located at the project root.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,

    #[serde(default)]
    pub repositories: Repositories,

    #[serde(default)]
    pub credentials: CredentialSettings,

    /// Build properties, the lowest-precedence property source.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Shell command per task, by `"<module>:<task>"` or `"<task>"`
    #[serde(default)]
    pub tasks: HashMap<String, String>,

    #[serde(default)]
    pub javadoc: JavadocConfig,

    #[serde(default)]
    pub java: JavaConfig,
}

/// Offline link to an external API documentation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OfflineLink {
    pub url: String,
    /// Directory holding the `package-list`/`element-list` of `url`.
    pub location: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct JavadocConfig {
    #[serde(default)]
    pub links_offline: Vec<OfflineLink>,
    #[serde(default)]
    pub stylesheet: Option<PathBuf>,
    /// Where the `document` command writes the HTML, relative to the module
    /// directory. Publishing token-filters this tree when it exists.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

pub const DEFAULT_JAVADOC_OUTPUT_DIR: &str = "build/docs/javadoc";

impl JavadocConfig {
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JAVADOC_OUTPUT_DIR))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JavaConfig {
    /// `--release` level handed to the compiler.
    #[serde(default = "default_release")]
    pub release: u32,
    /// `-Xlint` categories.
    #[serde(default = "default_lint")]
    pub lint: Vec<String>,
}

fn default_release() -> u32 {
    11
}

fn default_lint() -> Vec<String> {
    [
        "cast",
        "classfile",
        "deprecation",
        "dep-ann",
        "divzero",
        "empty",
        "finally",
        "overrides",
        "rawtypes",
        "serial",
        "static",
        "try",
        "unchecked",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            release: default_release(),
            lint: default_lint(),
        }
    }
}

impl Config {
    /// Validate the project metadata.
    ///
    /// # Errors
    /// Returns `BuildError::Configuration` if a required metadata field is
    /// missing.
    pub fn validate(&self) -> Result<()> {
        self.project.validate()
    }

    /// Module configs to build; falls back to a single root module.
    #[must_use]
    pub fn module_configs(&self) -> Vec<ModuleConfig> {
        if self.modules.is_empty() {
            vec![ModuleConfig::new(self.project.id.clone()).path(".")]
        } else {
            self.modules.clone()
        }
    }

    /// Command configured for `task` of `module`, module-specific first.
    #[must_use]
    pub fn task_command(&self, module: &str, task: &str) -> Option<&str> {
        self.tasks
            .get(&format!("{module}:{task}"))
            .or_else(|| self.tasks.get(task))
            .map(String::as_str)
    }

    /// Config written by `buildplan init`.
    #[must_use]
    pub fn starter(id: &str) -> Self {
        let mut tasks = HashMap::new();
        tasks.insert("compile".to_string(), "./gradlew compileJava".to_string());
        tasks.insert("test".to_string(), "./gradlew test".to_string());
        tasks.insert(
            "coverageReport".to_string(),
            "./gradlew jacocoTestReport".to_string(),
        );
        tasks.insert("document".to_string(), "./gradlew javadoc".to_string());
        tasks.insert("packageJar".to_string(), "./gradlew jar".to_string());
        tasks.insert(
            "publish".to_string(),
            "./gradlew publishAllPublicationsToMavenRepository".to_string(),
        );
        Self {
            project: ProjectMetadata {
                id: id.to_string(),
                name: id.to_string(),
                group: "org.example".to_string(),
                version: "0.1.0-SNAPSHOT".to_string(),
                ..Default::default()
            },
            tasks,
            ..Default::default()
        }
    }
}
