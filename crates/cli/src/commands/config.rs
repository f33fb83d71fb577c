use anyhow::Result;
use buildplan_core::config::Config;
use buildplan_core::{PostAction, TaskKind};
use buildplan_utils::get_buildplan_config;
use clap::Args;
use colored::Colorize;

use crate::context::CommandContext;

#[derive(Args, Debug)]
#[command(about = "Show the buildplan configuration")]
pub struct ConfigArgs {
    /// Show the command every task of every module resolves to
    #[arg(long)]
    tasks: bool,
}

/// `(key, command)` for each task and post-action of each module, in
/// execution-name order. Unconfigured commands resolve to `None`.
fn resolved_commands(config: &Config) -> Vec<(String, Option<&str>)> {
    let names: Vec<&str> = TaskKind::ALL
        .iter()
        .map(TaskKind::name)
        .chain([PostAction::ColorizeSource, PostAction::SourceToHtml].iter().map(PostAction::name))
        .collect();
    config
        .module_configs()
        .iter()
        .flat_map(|module| {
            names.iter().map(move |name| {
                (
                    format!("{}:{name}", module.name),
                    config.task_command(&module.name, name),
                )
            })
        })
        .collect()
}

/// Display the effective configuration, defaults filled in.
///
/// # Errors
/// Returns error if reading the configuration fails.
pub async fn handle_config(args: &ConfigArgs) -> Result<()> {
    let current_dir = CommandContext::current_dir()?;
    let config = get_buildplan_config(&current_dir).await?;
    if args.tasks {
        for (key, command) in resolved_commands(&config) {
            match command {
                Some(command) => println!("{} {command}", format!("{key}:").bright_blue()),
                None => println!("{} {}", format!("{key}:").bright_blue(), "-".bright_black()),
            }
        }
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
