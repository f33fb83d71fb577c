use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use buildplan_core::config::Config;
use buildplan_core::publish::{PublishingDescriptor, build_descriptor};
use buildplan_core::{EnvironmentSnapshot, ModuleBuild, ModuleDescriptor, configure_modules};
use buildplan_utils::{get_buildplan_config, get_project_root, parse_property, resolve_properties};
use tracing::debug;

/// Everything a command needs about the current project, loaded once.
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub snapshot: EnvironmentSnapshot,
    pub properties: BTreeMap<String, String>,
}

impl CommandContext {
    /// Load the config above the current directory and resolve properties,
    /// `overrides` being raw `key=value` arguments.
    ///
    /// # Errors
    /// Returns error if no config is found, it is invalid, or an override is
    /// malformed.
    pub async fn new(overrides: &[String]) -> Result<Self> {
        let current_dir = Self::current_dir()?;
        let project_root = get_project_root(&current_dir)?;
        let config = get_buildplan_config(&current_dir).await?;
        let overrides = overrides
            .iter()
            .map(|arg| parse_property(arg))
            .collect::<Result<Vec<_>>>()?;
        let properties = resolve_properties(&config.properties, std::env::vars_os(), overrides);
        let snapshot = EnvironmentSnapshot::capture(config.project.inception_year);
        debug!(root = %project_root.display(), properties = properties.len(), "project loaded");

        Ok(Self {
            project_root,
            config,
            snapshot,
            properties,
        })
    }

    /// # Errors
    /// Returns error if retrieving the current directory fails.
    pub fn current_dir() -> Result<PathBuf> {
        Ok(std::env::current_dir()?)
    }

    /// # Errors
    /// Returns error if the metadata is incomplete, a module config is invalid
    /// or `only` names no module.
    pub fn modules(&self, only: Option<&str>) -> Result<Vec<ModuleBuild>> {
        Ok(configure_modules(&self.config, &self.snapshot, only)?)
    }

    #[must_use]
    pub fn descriptor(&self, module: &ModuleDescriptor) -> PublishingDescriptor {
        build_descriptor(
            &self.config.project,
            module,
            &self.config.repositories,
            &self.properties,
            &self.config.credentials,
        )
    }

    /// Working directory of the module's task commands.
    #[must_use]
    pub fn module_dir(&self, module: &ModuleDescriptor) -> PathBuf {
        self.project_root.join(module.dir())
    }

    /// Where generated artifacts of the module are written.
    #[must_use]
    pub fn build_dir(&self, module: &ModuleDescriptor) -> PathBuf {
        self.project_root.join("build").join(module.name())
    }
}
