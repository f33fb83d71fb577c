use anyhow::Result;
use buildplan_core::EnvironmentSnapshot;
use buildplan_utils::get_buildplan_config;
use clap::Args;
use colored::Colorize;

use crate::{context::CommandContext, options::FormatOptions};

#[derive(Args, Debug)]
#[command(about = "Show the build environment snapshot")]
pub struct EnvArgs {
    #[arg(long, default_value = "stdout")]
    format: FormatOptions,
}

/// Print the environment snapshot. Works outside a project, the copyright
/// range then only covers the current year.
///
/// # Errors
/// Returns error if the snapshot cannot be serialized.
pub async fn handle_env(args: &EnvArgs) -> Result<()> {
    let current_dir = CommandContext::current_dir()?;
    let inception_year = get_buildplan_config(&current_dir)
        .await
        .ok()
        .and_then(|config| config.project.inception_year);
    let snapshot = EnvironmentSnapshot::capture(inception_year);

    if args.format.is_stdout() {
        for (key, value) in [
            ("Build-Date", snapshot.build_date()),
            ("Build-JDK", snapshot.jdk_version()),
            ("Build-OS-Name", snapshot.os_name()),
            ("Build-OS-Arch", snapshot.os_arch()),
            ("Build-OS-Version", snapshot.os_version()),
            ("Built-By", snapshot.built_by()),
            ("Copyright-Year", snapshot.copyright_year()),
        ] {
            println!("{} {}", format!("{key}:").bright_blue(), value);
        }
    }
    args.format.print_json(&snapshot)?;
    Ok(())
}
