use std::collections::HashMap;
use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::attributes::ManifestAttributes;
use crate::graph::TaskGraph;
use crate::module::ModuleDescriptor;
use crate::task::{Action, PostAction, TaskKind};

/// Everything a runner gets to see about the action it should perform.
#[derive(Debug, Clone, Copy)]
pub struct TaskInvocation<'a> {
    pub module: &'a ModuleDescriptor,
    pub action: Action,
    pub attributes: &'a ManifestAttributes,
}

/// External collaborator that performs the actual work of a task: compiling,
/// running tests, generating documentation, packaging or uploading.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// # Errors
    /// Returns error if the external tool fails.
    async fn run(&self, invocation: &TaskInvocation<'_>) -> Result<()>;
}

/// Result of one task within a module build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TaskOutcome {
    Succeeded,
    Failed { message: String },
    /// Not run because `because` failed upstream.
    Skipped { because: TaskKind },
}

impl Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => write!(f, "{}", "succeeded".green()),
            Self::Failed { message } => write!(f, "{} {message}", "failed:".red().bold()),
            Self::Skipped { because } => {
                write!(f, "{}", format!("skipped (because {because} failed)").yellow())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    pub task: TaskKind,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

/// Outcome of running a plan for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub module: String,
    pub results: Vec<TaskResult>,
}

impl BuildReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.results
            .iter()
            .all(|result| result.outcome == TaskOutcome::Succeeded)
    }

    #[must_use]
    pub fn outcome(&self, task: TaskKind) -> Option<&TaskOutcome> {
        self.results
            .iter()
            .find(|result| result.task == task)
            .map(|result| &result.outcome)
    }

    pub fn failed_tasks(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, TaskOutcome::Failed { .. }))
            .map(|result| result.task)
    }

    pub fn skipped_tasks(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, TaskOutcome::Skipped { .. }))
            .map(|result| result.task)
    }
}

/// Run `plan` (an execution order produced by the graph) through `runner`.
///
/// A task whose dependency failed or was skipped is skipped itself, naming
/// the task that originally failed. Finalizers run whenever the task they
/// finalize was attempted, even if it failed. Tasks outside the failed
/// subgraph keep running. Post-actions run after their task's main action and
/// their failure fails the task.
pub async fn execute(
    graph: &TaskGraph,
    plan: &[TaskKind],
    module: &ModuleDescriptor,
    attributes: &ManifestAttributes,
    runner: &dyn TaskRunner,
) -> BuildReport {
    let mut outcomes: HashMap<TaskKind, TaskOutcome> = HashMap::new();
    let mut results = Vec::with_capacity(plan.len());

    for &kind in plan {
        let Some(task) = graph.task(kind) else {
            continue;
        };

        let blocked_by = task
            .dependencies()
            .iter()
            .chain(task.finalized_task().iter())
            .find_map(|dep| match outcomes.get(dep) {
                Some(TaskOutcome::Failed { .. }) if Some(*dep) != task.finalized_task() => {
                    Some(*dep)
                }
                Some(TaskOutcome::Skipped { because }) => Some(*because),
                _ => None,
            });

        let outcome = if let Some(because) = blocked_by {
            warn!(module = module.name(), task = %kind, %because, "task skipped");
            TaskOutcome::Skipped { because }
        } else {
            info!(module = module.name(), task = %kind, "running task");
            run_task(module, attributes, runner, kind, task.post_actions()).await
        };

        debug!(module = module.name(), task = %kind, outcome = ?outcome, "task finished");
        outcomes.insert(kind, outcome.clone());
        results.push(TaskResult {
            task: kind,
            outcome,
        });
    }

    BuildReport {
        module: module.name().to_string(),
        results,
    }
}

async fn run_task(
    module: &ModuleDescriptor,
    attributes: &ManifestAttributes,
    runner: &dyn TaskRunner,
    kind: TaskKind,
    post_actions: &[PostAction],
) -> TaskOutcome {
    let actions = std::iter::once(Action::Task(kind))
        .chain(post_actions.iter().map(|post| Action::Post(kind, *post)));
    for action in actions {
        let invocation = TaskInvocation {
            module,
            action,
            attributes,
        };
        if let Err(e) = runner.run(&invocation).await {
            return TaskOutcome::Failed {
                message: if matches!(action, Action::Post(..)) {
                    format!("{}: {e:#}", action.name())
                } else {
                    format!("{e:#}")
                },
            };
        }
    }
    TaskOutcome::Succeeded
}
