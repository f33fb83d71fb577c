use tracing::info;

use crate::attributes::{ManifestAttributes, compose};
use crate::config::Config;
use crate::env::EnvironmentSnapshot;
use crate::error::{BuildError, Result};
use crate::executor::{BuildReport, TaskRunner, execute};
use crate::graph::{TaskGraph, register_tasks};
use crate::metadata::ProjectMetadata;
use crate::module::{ModuleConfig, ModuleDescriptor};
use crate::state::{ModuleLifecycle, ModuleState};
use crate::task::TaskKind;

/// One module taken through its life cycle: configured, attributes composed,
/// tasks registered, then executed once.
#[derive(Debug, Clone)]
pub struct ModuleBuild {
    lifecycle: ModuleLifecycle,
    module: ModuleDescriptor,
    attributes: ManifestAttributes,
    graph: TaskGraph,
}

impl ModuleBuild {
    /// # Errors
    /// Returns `BuildError::Configuration` for incomplete metadata or an
    /// invalid module config.
    pub fn configure(
        config: ModuleConfig,
        metadata: &ProjectMetadata,
        snapshot: &EnvironmentSnapshot,
    ) -> Result<Self> {
        metadata.validate()?;
        let mut lifecycle = ModuleLifecycle::new(config.name.clone());
        let module = config.finalize()?;
        lifecycle.advance(ModuleState::Configured)?;

        let attributes = compose(metadata, snapshot, &module, &module.overrides());
        let graph = register_tasks(&module);
        lifecycle.advance(ModuleState::TasksRegistered)?;

        Ok(Self {
            lifecycle,
            module,
            attributes,
            graph,
        })
    }

    #[must_use]
    pub const fn module(&self) -> &ModuleDescriptor {
        &self.module
    }

    #[must_use]
    pub const fn attributes(&self) -> &ManifestAttributes {
        &self.attributes
    }

    #[must_use]
    pub const fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    #[must_use]
    pub const fn state(&self) -> ModuleState {
        self.lifecycle.state()
    }

    /// # Errors
    /// Returns `BuildError::CycleDetected` if the graph is not acyclic.
    pub fn plan(&self, target: TaskKind) -> Result<Vec<TaskKind>> {
        self.graph.plan_for(target)
    }

    /// Execute the plan of `target`. Ends in `DONE` if every planned task
    /// succeeded, `FAILED` otherwise.
    ///
    /// # Errors
    /// Returns `BuildError::InvalidTransition` if the module already ran.
    pub async fn run(&mut self, target: TaskKind, runner: &dyn TaskRunner) -> Result<BuildReport> {
        let plan = self.plan(target)?;
        self.lifecycle.advance(ModuleState::Executing)?;
        info!(module = self.module.name(), %target, tasks = plan.len(), "executing plan");
        let report = execute(&self.graph, &plan, &self.module, &self.attributes, runner).await;
        self.lifecycle.advance(if report.is_success() {
            ModuleState::Done
        } else {
            ModuleState::Failed
        })?;
        Ok(report)
    }
}

/// Configure every module of `config`, or only the one named `only`.
///
/// # Errors
/// Returns `BuildError::UnknownModule` if `only` names no module, or the
/// first configuration error.
pub fn configure_modules(
    config: &Config,
    snapshot: &EnvironmentSnapshot,
    only: Option<&str>,
) -> Result<Vec<ModuleBuild>> {
    config.validate()?;
    let modules: Vec<ModuleConfig> = config
        .module_configs()
        .into_iter()
        .filter(|module| only.is_none_or(|name| module.name == name))
        .collect();
    if let Some(name) = only
        && modules.is_empty()
    {
        return Err(BuildError::UnknownModule(name.to_string()));
    }
    modules
        .into_iter()
        .map(|module| ModuleBuild::configure(module, &config.project, snapshot))
        .collect()
}
