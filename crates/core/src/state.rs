use std::fmt::Display;

use serde::Serialize;
use tracing::debug;

use crate::error::{BuildError, Result};

/// Life cycle of a module within one build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleState {
    Unconfigured,
    Configured,
    TasksRegistered,
    Executing,
    Done,
    Failed,
}

impl ModuleState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unconfigured, Self::Configured)
                | (Self::Configured, Self::TasksRegistered)
                | (Self::TasksRegistered, Self::Executing)
                | (Self::Executing, Self::Done | Self::Failed)
        )
    }
}

impl Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Unconfigured => "UNCONFIGURED",
                Self::Configured => "CONFIGURED",
                Self::TasksRegistered => "TASKS_REGISTERED",
                Self::Executing => "EXECUTING",
                Self::Done => "DONE",
                Self::Failed => "FAILED",
            }
        )
    }
}

/// Tracks the state of a single module and rejects out-of-order transitions.
#[derive(Debug, Clone)]
pub struct ModuleLifecycle {
    module: String,
    state: ModuleState,
}

impl ModuleLifecycle {
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            state: ModuleState::Unconfigured,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ModuleState {
        self.state
    }

    /// # Errors
    /// Returns `BuildError::InvalidTransition` if `next` does not directly
    /// follow the current state.
    pub fn advance(&mut self, next: ModuleState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(BuildError::InvalidTransition {
                module: self.module.clone(),
                from: self.state,
                to: next,
            });
        }
        debug!(module = %self.module, from = %self.state, to = %next, "module state");
        self.state = next;
        Ok(())
    }
}
