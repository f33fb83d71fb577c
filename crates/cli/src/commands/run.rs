use anyhow::Result;
use buildplan_core::{BuildReport, TaskKind};
use buildplan_utils::{display_module, display_report, get_relative_path};
use clap::Args;
use colored::Colorize;

use crate::{context::CommandContext, options::FormatOptions, runner::ShellTaskRunner};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Only build this module
    #[arg(short, long)]
    pub module: Option<String>,

    /// Print the plan without running any command
    #[arg(short, long)]
    pub dry_run: bool,

    #[arg(long, default_value = "stdout")]
    pub format: FormatOptions,

    /// Build property, overriding config and environment
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

/// Run `target` and everything it needs in every selected module.
///
/// # Errors
/// Returns error if the project cannot be configured or any task failed.
pub async fn handle_run(target: TaskKind, args: &RunArgs) -> Result<()> {
    let context = CommandContext::new(&args.properties).await?;
    let format = args.format;
    let version = &context.config.project.version;
    let mut builds = context.modules(args.module.as_deref())?;

    if args.dry_run {
        let mut plans = std::collections::BTreeMap::new();
        for build in &builds {
            let plan = build.plan(target)?;
            if format.is_stdout() {
                println!("{}", display_module(build.module().name(), version));
                if plan.is_empty() {
                    println!("  {}", format!("no {target} task").bright_black());
                }
                for task in &plan {
                    println!("  {} {task}", "→".bright_cyan());
                }
            }
            plans.insert(build.module().name().to_string(), plan);
        }
        if format.is_stdout() {
            println!("Dry run, no tasks were executed");
        }
        format.print_json(&plans)?;
        return Ok(());
    }

    let runner = ShellTaskRunner::new(&context);
    let mut reports: Vec<BuildReport> = Vec::with_capacity(builds.len());
    for build in &mut builds {
        if !build.graph().contains(target) {
            if format.is_stdout() {
                println!("{}", display_module(build.module().name(), version));
                println!("  {}", format!("no {target} task").bright_black());
            }
            continue;
        }
        let report = build.run(target, &runner).await?;
        if format.is_stdout() {
            println!("{}", display_module(&report.module, version));
            println!("{}", display_report(&report));
            let build_dir = context.build_dir(build.module());
            if build_dir.is_dir() {
                println!(
                    "  {} {}",
                    "artifacts in".bright_black(),
                    get_relative_path(&context.project_root, &build_dir)?
                );
            }
        }
        reports.push(report);
    }
    format.print_json(&reports)?;

    let failed: usize = reports.iter().map(|report| report.failed_tasks().count()).sum();
    if failed > 0 {
        anyhow::bail!("{target} failed: {failed} task(s) failed");
    }
    if format.is_stdout() {
        println!("{}", format!("{target} succeeded").green().bold());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    #[test]
    fn test_run_args_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert!(cli.run.module.is_none());
        assert!(!cli.run.dry_run);
        assert_eq!(cli.run.format, FormatOptions::Stdout);
        assert!(cli.run.properties.is_empty());
    }

    #[test]
    fn test_run_args_all_options() {
        let cli = TestCli::parse_from([
            "test",
            "--module",
            "jpx.jdbc",
            "--dry-run",
            "--format",
            "json",
            "-P",
            "nexus_username=franz",
            "--property",
            "nexus_password=secret",
        ]);
        assert_eq!(cli.run.module.as_deref(), Some("jpx.jdbc"));
        assert!(cli.run.dry_run);
        assert_eq!(cli.run.format, FormatOptions::Json);
        assert_eq!(
            cli.run.properties,
            vec!["nexus_username=franz", "nexus_password=secret"]
        );
    }
}
