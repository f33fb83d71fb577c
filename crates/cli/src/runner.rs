use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use buildplan_core::command::run_task_command;
use buildplan_core::{Action, TaskInvocation, TaskKind, TaskRunner};
use buildplan_java::{JavadocOptions, ReplaceTokens, javac_args, render_pom};
use buildplan_utils::{collect_doc_files, collect_document_inputs, copy_artifact, write_artifact};
use tracing::{debug, info};

use crate::context::CommandContext;

pub const MANIFEST_FILE: &str = "MANIFEST.MF";
pub const PUBLICATION_FILE: &str = "publication.json";
pub const POM_FILE: &str = "pom.xml";
pub const JAVADOC_SOURCES_FILE: &str = "javadoc-sources.txt";
pub const JAVADOC_OPTIONS_FILE: &str = "javadoc.options";
pub const FILTERED_SOURCES_DIR: &str = "sources";
pub const DOC_FILES_DIR: &str = "doc-files";
pub const FILTERED_JAVADOC_DIR: &str = "javadoc";

/// Runs task actions as the shell commands configured in `tasks`, after
/// writing the artifacts each task consumes into `build/<module>/`.
pub struct ShellTaskRunner<'a> {
    context: &'a CommandContext,
}

impl<'a> ShellTaskRunner<'a> {
    #[must_use]
    pub const fn new(context: &'a CommandContext) -> Self {
        Self { context }
    }

    async fn prepare(
        &self,
        invocation: &TaskInvocation<'_>,
        build_dir: &Path,
        envs: &mut Vec<(&'static str, String)>,
    ) -> Result<()> {
        let context = self.context;
        let module = invocation.module;
        match invocation.action {
            Action::Task(TaskKind::Document) => {
                let source_dir = context.project_root.join(module.source_dir());
                let module_dir = context.module_dir(module);
                // Listed relative to the module directory, where the command runs.
                let listed_dir = source_dir.strip_prefix(&module_dir).unwrap_or(&source_dir);
                let sources = collect_document_inputs(&source_dir)?;
                let source_list = build_dir.join(JAVADOC_SOURCES_FILE);
                let listing: String = sources
                    .iter()
                    .map(|path| format!("{}\n", listed_dir.join(path).display()))
                    .collect();
                write_artifact(&source_list, listing).await?;

                let doc_files = collect_doc_files(&source_dir)?;
                if !doc_files.is_empty() {
                    let target = build_dir.join(DOC_FILES_DIR);
                    for path in &doc_files {
                        copy_artifact(&source_dir.join(path), &target.join(path)).await?;
                    }
                    debug!(module = module.name(), files = doc_files.len(), "doc-files copied");
                    envs.push(("BUILDPLAN_DOC_FILES", target.display().to_string()));
                }

                let options = JavadocOptions::new(
                    &context.config.project,
                    &context.snapshot,
                    &context.config.javadoc,
                    &context.project_root,
                )
                .with_source_list(&source_list);
                write_artifact(&build_dir.join(JAVADOC_OPTIONS_FILE), options.to_argfile())
                    .await?;
                debug!(module = module.name(), sources = sources.len(), "javadoc inputs written");
            }
            Action::Task(TaskKind::PackageJar) => {
                write_artifact(
                    &build_dir.join(MANIFEST_FILE),
                    invocation.attributes.to_manifest(),
                )
                .await?;
                let source_dir = context.project_root.join(module.source_dir());
                if source_dir.is_dir() {
                    let filtered = build_dir.join(FILTERED_SOURCES_DIR);
                    let tokens =
                        ReplaceTokens::for_project(&context.config.project, &context.snapshot);
                    let count = tokens.filter_tree(&source_dir, &filtered).await?;
                    debug!(module = module.name(), files = count, "sources filtered");
                    envs.push(("BUILDPLAN_FILTERED_SOURCES", filtered.display().to_string()));
                }
            }
            Action::Task(TaskKind::Publish) => {
                let descriptor = context.descriptor(module);
                write_artifact(
                    &build_dir.join(PUBLICATION_FILE),
                    serde_json::to_string_pretty(&descriptor)?,
                )
                .await?;
                write_artifact(&build_dir.join(POM_FILE), render_pom(&descriptor)?).await?;

                let javadoc_dir = context
                    .module_dir(module)
                    .join(context.config.javadoc.output_dir());
                if module.is_documented() && javadoc_dir.is_dir() {
                    let filtered = build_dir.join(FILTERED_JAVADOC_DIR);
                    let tokens =
                        ReplaceTokens::for_project(&context.config.project, &context.snapshot);
                    let count = tokens.filter_tree(&javadoc_dir, &filtered).await?;
                    debug!(module = module.name(), files = count, "javadoc filtered");
                    envs.push(("BUILDPLAN_FILTERED_JAVADOC", filtered.display().to_string()));
                }
                let sources = build_dir.join(FILTERED_SOURCES_DIR);
                if sources.is_dir() {
                    envs.push(("BUILDPLAN_FILTERED_SOURCES", sources.display().to_string()));
                }
                if context
                    .config
                    .task_command(module.name(), invocation.action.name())
                    .is_some()
                {
                    let (username, password) = descriptor.target.credentials()?;
                    envs.push(("BUILDPLAN_REPOSITORY_USERNAME", username.to_string()));
                    envs.push(("BUILDPLAN_REPOSITORY_PASSWORD", password.to_string()));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRunner for ShellTaskRunner<'_> {
    async fn run(&self, invocation: &TaskInvocation<'_>) -> Result<()> {
        let context = self.context;
        let module = invocation.module;
        let action = invocation.action.name();
        let build_dir = context.build_dir(module);
        let descriptor = context.descriptor(module);

        let mut envs: Vec<(&'static str, String)> = vec![
            ("BUILDPLAN_MODULE", module.name().to_string()),
            ("BUILDPLAN_TASK", action.to_string()),
            ("BUILDPLAN_VERSION", context.config.project.version.clone()),
            ("BUILDPLAN_BUILD_DIR", build_dir.display().to_string()),
            (
                "BUILDPLAN_MANIFEST",
                build_dir.join(MANIFEST_FILE).display().to_string(),
            ),
            (
                "BUILDPLAN_JAVAC_ARGS",
                javac_args(&context.config.java).join(" "),
            ),
            (
                "BUILDPLAN_JAVADOC_ARGS",
                format!("@{}", build_dir.join(JAVADOC_OPTIONS_FILE).display()),
            ),
            (
                "BUILDPLAN_DOC_EXCLUDES",
                buildplan_core::document::INTERNAL_EXCLUDE_PATTERN.to_string(),
            ),
            (
                "BUILDPLAN_REPOSITORY_URL",
                descriptor.target.repository_url.clone(),
            ),
        ];
        self.prepare(invocation, &build_dir, &mut envs)
            .await
            .with_context(|| format!("Failed to prepare {action}"))?;

        let Some(command) = context.config.task_command(module.name(), action) else {
            debug!(module = module.name(), action, "no command configured");
            return Ok(());
        };
        info!(module = module.name(), action, command, "running command");
        run_task_command(
            command,
            &context.module_dir(module),
            envs.iter().map(|(key, value)| (*key, value.as_str())),
        )
        .await
    }
}
