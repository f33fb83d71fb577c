pub mod attributes;
pub mod command;
pub mod config;
pub mod document;
pub mod env;
pub mod error;
pub mod executor;
pub mod graph;
pub mod metadata;
pub mod module;
pub mod pipeline;
pub mod publish;
pub mod state;
pub mod task;

// Re-export the main types for convenience
pub use attributes::{ManifestAttributes, compose};
pub use config::Config;
pub use env::EnvironmentSnapshot;
pub use error::{BuildError, Result};
pub use executor::{BuildReport, TaskInvocation, TaskOutcome, TaskRunner};
pub use graph::{TaskGraph, register_tasks};
pub use metadata::ProjectMetadata;
pub use module::{ModuleConfig, ModuleDescriptor};
pub use pipeline::{ModuleBuild, configure_modules};
pub use publish::{PropertySource, PublishingDescriptor, build_descriptor};
pub use state::ModuleState;
pub use task::{Action, PostAction, TaskKind};
