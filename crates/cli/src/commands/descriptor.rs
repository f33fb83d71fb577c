use std::collections::BTreeMap;

use anyhow::Result;
use buildplan_core::publish::Credential;
use buildplan_utils::display_module;
use clap::Args;
use colored::Colorize;

use crate::{context::CommandContext, options::FormatOptions};

#[derive(Args, Debug)]
#[command(about = "Show the publishing descriptor of each publishable module")]
pub struct DescriptorArgs {
    /// Only show this module
    #[arg(short, long)]
    module: Option<String>,

    #[arg(long, default_value = "stdout")]
    format: FormatOptions,

    /// Build property, overriding config and environment
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE")]
    properties: Vec<String>,
}

fn display_credential(credential: &Credential) -> String {
    match credential {
        Credential::Provided(_) => "***".green().to_string(),
        Credential::Missing { key } => format!("missing ({key})").yellow().to_string(),
    }
}

/// Print where and what each publishable module would publish. Credentials
/// are never shown.
///
/// # Errors
/// Returns error if the project cannot be configured.
pub async fn handle_descriptor(args: &DescriptorArgs) -> Result<()> {
    let context = CommandContext::new(&args.properties).await?;
    let builds = context.modules(args.module.as_deref())?;

    let mut descriptors = BTreeMap::new();
    for build in builds.iter().filter(|build| build.module().is_publishable()) {
        let descriptor = context.descriptor(build.module());
        if args.format.is_stdout() {
            let coordinates = &descriptor.coordinates;
            println!(
                "{}",
                display_module(build.module().name(), &coordinates.version)
            );
            println!(
                "  {}:{}:{}",
                coordinates.group_id, coordinates.artifact_id, coordinates.version
            );
            println!(
                "  {} {} {}",
                format!("{} →", descriptor.target.kind).bright_cyan(),
                descriptor.target.repository_url,
                format!(
                    "(username {}, password {})",
                    display_credential(&descriptor.target.username),
                    display_credential(&descriptor.target.password)
                )
                .bright_black()
            );
        }
        descriptors.insert(build.module().name().to_string(), descriptor);
    }
    if descriptors.is_empty() {
        args.format.print("No publishable modules", "{}");
        return Ok(());
    }
    args.format.print_json(&descriptors)?;
    Ok(())
}
