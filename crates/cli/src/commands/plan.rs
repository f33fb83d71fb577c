use std::collections::BTreeMap;

use anyhow::Result;
use buildplan_core::{ModuleBuild, TaskKind};
use buildplan_utils::display_module;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::{context::CommandContext, options::FormatOptions};

#[derive(Args, Debug)]
#[command(about = "Show the task execution order of each module")]
pub struct PlanArgs {
    /// Only show this module
    #[arg(short, long)]
    module: Option<String>,

    /// Only show the tasks needed for this target
    #[arg(short, long)]
    target: Option<TaskKind>,

    #[arg(long, default_value = "stdout")]
    format: FormatOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlannedTask {
    task: TaskKind,
    depends_on: Vec<TaskKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finalizes: Option<TaskKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    post_actions: Vec<String>,
}

fn planned_tasks(build: &ModuleBuild, target: Option<TaskKind>) -> Result<Vec<PlannedTask>> {
    let graph = build.graph();
    let order = match target {
        Some(target) => graph.plan_for(target)?,
        None => graph.execution_order()?,
    };
    Ok(order
        .into_iter()
        .filter_map(|kind| graph.task(kind))
        .map(|task| PlannedTask {
            task: task.kind(),
            depends_on: task.dependencies().to_vec(),
            finalizes: task.finalized_task(),
            post_actions: task
                .post_actions()
                .iter()
                .map(|post| post.name().to_string())
                .collect(),
        })
        .collect())
}

/// Print the execution order of each module.
///
/// # Errors
/// Returns error if the project cannot be configured.
pub async fn handle_plan(args: &PlanArgs) -> Result<()> {
    let context = CommandContext::new(&[]).await?;
    let builds = context.modules(args.module.as_deref())?;

    let mut plans = BTreeMap::new();
    for build in &builds {
        let tasks = planned_tasks(build, args.target)?;
        if args.format.is_stdout() {
            println!(
                "{}",
                display_module(build.module().name(), &context.config.project.version)
            );
            for (idx, planned) in tasks.iter().enumerate() {
                let mut line = format!("  {}. {}", idx + 1, planned.task.to_string().bold());
                if let Some(finalized) = planned.finalizes {
                    line.push_str(&format!(" {}", format!("(finalizes {finalized})").bright_black()));
                }
                if !planned.post_actions.is_empty() {
                    line.push_str(&format!(
                        " {} {}",
                        "→".bright_cyan(),
                        planned.post_actions.join(", ")
                    ));
                }
                println!("{line}");
            }
        }
        plans.insert(build.module().name().to_string(), tasks);
    }
    args.format.print_json(&plans)?;
    Ok(())
}
