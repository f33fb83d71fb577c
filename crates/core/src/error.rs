use thiserror::Error;

use crate::state::ModuleState;
use crate::task::TaskKind;

/// Errors raised while configuring, executing or publishing a build.
///
/// Configuration errors abort the whole build before any task is registered.
/// Task failures only stop the dependent part of a module's task graph, and a
/// missing publish credential surfaces only when an upload is attempted.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("task '{task}' failed: {message}")]
    TaskExecution { task: TaskKind, message: String },

    #[error("publish credential '{key}' is not configured")]
    PublishCredentialMissing { key: String },

    #[error("module '{module}' cannot move from {from} to {to}")]
    InvalidTransition {
        module: String,
        from: ModuleState,
        to: ModuleState,
    },

    #[error("unknown module '{0}'")]
    UnknownModule(String),

    #[error("task graph of module '{0}' contains a cycle")]
    CycleDetected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
