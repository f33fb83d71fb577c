use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    Compile,
    Test,
    CoverageReport,
    Document,
    PackageJar,
    Publish,
}

impl TaskKind {
    pub const ALL: [Self; 6] = [
        Self::Compile,
        Self::Test,
        Self::CoverageReport,
        Self::Document,
        Self::PackageJar,
        Self::Publish,
    ];

    /// Name used in config keys and reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Test => "test",
            Self::CoverageReport => "coverageReport",
            Self::Document => "document",
            Self::PackageJar => "packageJar",
            Self::Publish => "publish",
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown task '{s}'"))
    }
}

/// Actions attached to the end of the document task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostAction {
    ColorizeSource,
    SourceToHtml,
}

impl PostAction {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ColorizeSource => "colorizeSource",
            Self::SourceToHtml => "sourceToHtml",
        }
    }
}

impl Display for PostAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a runner is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Task(TaskKind),
    Post(TaskKind, PostAction),
}

impl Action {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Task(kind) => kind.name(),
            Self::Post(_, post) => post.name(),
        }
    }

    /// The registered task this action belongs to.
    #[must_use]
    pub const fn task(&self) -> TaskKind {
        match self {
            Self::Task(kind) | Self::Post(kind, _) => *kind,
        }
    }
}

/// A registered task node with its outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    kind: TaskKind,
    depends_on: Vec<TaskKind>,
    finalizes: Option<TaskKind>,
    post_actions: Vec<PostAction>,
}

impl Task {
    #[must_use]
    pub const fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            depends_on: Vec::new(),
            finalizes: None,
            post_actions: Vec::new(),
        }
    }

    /// Hard dependency: a failed or skipped dependency skips this task.
    #[must_use]
    pub fn depends_on(mut self, kind: TaskKind) -> Self {
        self.depends_on.push(kind);
        self
    }

    /// Finalizer edge: run after `kind` whether it passed or failed.
    #[must_use]
    pub fn finalizes(mut self, kind: TaskKind) -> Self {
        self.finalizes = Some(kind);
        self
    }

    #[must_use]
    pub fn post_action(mut self, action: PostAction) -> Self {
        self.post_actions.push(action);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    #[must_use]
    pub fn dependencies(&self) -> &[TaskKind] {
        &self.depends_on
    }

    #[must_use]
    pub const fn finalized_task(&self) -> Option<TaskKind> {
        self.finalizes
    }

    #[must_use]
    pub fn post_actions(&self) -> &[PostAction] {
        &self.post_actions
    }
}
