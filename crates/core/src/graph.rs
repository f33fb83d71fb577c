use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use serde::Serialize;

use crate::error::{BuildError, Result};
use crate::module::ModuleDescriptor;
use crate::task::{PostAction, Task, TaskKind};

/// Tasks registered for one module together with their edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskGraph {
    module: String,
    tasks: BTreeMap<TaskKind, Task>,
}

/// Register the fixed task set of a module.
///
/// `compile` has no predecessor, `test` depends on it and is finalized by
/// `coverageReport`. `document` (with its colorizer and source-to-HTML
/// post-actions) only exists for documented modules, `publish` only for
/// publishable ones. `packageJar` depends on `compile` and `test`, so a red
/// test run never produces an artifact.
#[must_use]
pub fn register_tasks(module: &ModuleDescriptor) -> TaskGraph {
    let mut tasks = vec![
        Task::new(TaskKind::Compile),
        Task::new(TaskKind::Test).depends_on(TaskKind::Compile),
        Task::new(TaskKind::CoverageReport).finalizes(TaskKind::Test),
        Task::new(TaskKind::PackageJar)
            .depends_on(TaskKind::Compile)
            .depends_on(TaskKind::Test),
    ];
    if module.is_documented() {
        tasks.push(
            Task::new(TaskKind::Document)
                .depends_on(TaskKind::Compile)
                .post_action(PostAction::ColorizeSource)
                .post_action(PostAction::SourceToHtml),
        );
    }
    if module.is_publishable() {
        let mut publish = Task::new(TaskKind::Publish).depends_on(TaskKind::PackageJar);
        if module.is_documented() {
            publish = publish.depends_on(TaskKind::Document);
        }
        tasks.push(publish);
    }

    TaskGraph {
        module: module.name().to_string(),
        tasks: tasks.into_iter().map(|task| (task.kind(), task)).collect(),
    }
}

impl TaskGraph {
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn contains(&self, kind: TaskKind) -> bool {
        self.tasks.contains_key(&kind)
    }

    #[must_use]
    pub fn task(&self, kind: TaskKind) -> Option<&Task> {
        self.tasks.get(&kind)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks declaring a finalizer edge on `kind`.
    pub fn finalizers_of(&self, kind: TaskKind) -> impl Iterator<Item = TaskKind> + '_ {
        self.tasks
            .values()
            .filter(move |task| task.finalized_task() == Some(kind))
            .map(Task::kind)
    }

    /// Ordering edges as `(before, after)` pairs. A finalizer edge orders the
    /// finalized task before its finalizer.
    fn ordering_edges(&self) -> Vec<(TaskKind, TaskKind)> {
        let mut edges = Vec::new();
        for task in self.tasks.values() {
            for dep in task.dependencies() {
                if self.contains(*dep) {
                    edges.push((*dep, task.kind()));
                }
            }
            if let Some(finalized) = task.finalized_task()
                && self.contains(finalized)
            {
                edges.push((finalized, task.kind()));
            }
        }
        edges
    }

    /// All registered tasks in a valid execution order.
    ///
    /// # Errors
    /// Returns `BuildError::CycleDetected` if the edges are not acyclic.
    pub fn execution_order(&self) -> Result<Vec<TaskKind>> {
        self.order_of(&self.tasks.keys().copied().collect())
    }

    /// The tasks needed to run `target`, in execution order: the target, its
    /// transitive dependencies, the finalizers of every included task and,
    /// for a finalizer, the task it finalizes.
    ///
    /// Returns an empty plan if the module has no such task.
    ///
    /// # Errors
    /// Returns `BuildError::CycleDetected` if the edges are not acyclic.
    pub fn plan_for(&self, target: TaskKind) -> Result<Vec<TaskKind>> {
        if !self.contains(target) {
            return Ok(Vec::new());
        }
        let mut included = BTreeSet::new();
        let mut pending = vec![target];
        while let Some(kind) = pending.pop() {
            if !included.insert(kind) {
                continue;
            }
            if let Some(task) = self.task(kind) {
                pending.extend(
                    task.dependencies()
                        .iter()
                        .copied()
                        .filter(|dep| self.contains(*dep)),
                );
                pending.extend(task.finalized_task().filter(|kind| self.contains(*kind)));
            }
            pending.extend(self.finalizers_of(kind));
        }
        self.order_of(&included)
    }

    /// Kahn's algorithm restricted to `included`. Ties are broken by task
    /// kind so the order is stable across runs.
    fn order_of(&self, included: &BTreeSet<TaskKind>) -> Result<Vec<TaskKind>> {
        let mut in_degree: BTreeMap<TaskKind, usize> =
            included.iter().map(|kind| (*kind, 0)).collect();
        let mut successors: BTreeMap<TaskKind, Vec<TaskKind>> = BTreeMap::new();

        for (before, after) in self.ordering_edges() {
            if included.contains(&before) && included.contains(&after) {
                successors.entry(before).or_default().push(after);
                *in_degree.entry(after).or_default() += 1;
            }
        }

        let mut queue: VecDeque<TaskKind> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(kind, _)| *kind)
            .collect();
        let mut sorted = Vec::with_capacity(included.len());
        let mut visited = HashSet::new();

        while let Some(kind) = queue.pop_front() {
            if !visited.insert(kind) {
                continue;
            }
            sorted.push(kind);
            let mut ready = Vec::new();
            for next in successors.get(&kind).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(*next);
                    }
                }
            }
            ready.sort();
            queue.extend(ready);
        }

        if sorted.len() != included.len() {
            return Err(BuildError::CycleDetected(self.module.clone()));
        }
        Ok(sorted)
    }
}
