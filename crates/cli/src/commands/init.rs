use tokio::fs::{create_dir_all, write};

use anyhow::Result;
use buildplan_core::{Config, EnvironmentSnapshot};
use buildplan_utils::{CONFIG_FILE, get_buildplan_dir};
use clap::Args;

use crate::context::CommandContext;

#[derive(Args, Debug)]
#[command(about = "Initialize a new buildplan project")]
pub struct InitArgs {
    /// If true, do not make any filesystem changes.
    #[arg(short, long, default_value = "false")]
    dry_run: bool,
}

/// Write a starter `.buildplan/config.json` named after the current directory.
///
/// # Errors
/// Returns error if the project is already initialized or writing fails.
pub async fn handle_init(args: &InitArgs) -> Result<()> {
    let current_dir = CommandContext::current_dir()?;
    let buildplan_dir = get_buildplan_dir(&current_dir);
    let config_file = buildplan_dir.join(CONFIG_FILE);
    if config_file.exists() {
        anyhow::bail!("buildplan project already initialized");
    }

    let id = current_dir
        .file_name()
        .map_or_else(|| "project".to_string(), |name| name.to_string_lossy().into_owned());
    let mut config = Config::starter(&id);
    config.project.author = EnvironmentSnapshot::capture(None).built_by().to_string();
    if !args.dry_run {
        create_dir_all(&buildplan_dir).await?;
        write(&config_file, serde_json::to_string_pretty(&config)?).await?;
    }

    println!(
        "buildplan project initialized in {}",
        buildplan_dir.display()
    );
    Ok(())
}
