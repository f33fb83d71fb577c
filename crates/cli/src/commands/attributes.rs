use std::collections::BTreeMap;

use anyhow::Result;
use buildplan_utils::display_module;
use clap::Args;

use crate::{context::CommandContext, options::FormatOptions};

#[derive(Args, Debug)]
#[command(about = "Show the manifest attributes of each module")]
pub struct AttributesArgs {
    /// Only show this module
    #[arg(short, long)]
    module: Option<String>,

    #[arg(long, default_value = "stdout")]
    format: FormatOptions,
}

/// Print the composed manifest of each module.
///
/// # Errors
/// Returns error if the project cannot be configured.
pub async fn handle_attributes(args: &AttributesArgs) -> Result<()> {
    let context = CommandContext::new(&[]).await?;
    let builds = context.modules(args.module.as_deref())?;

    let mut attributes = BTreeMap::new();
    for build in &builds {
        if args.format.is_stdout() {
            println!(
                "{}",
                display_module(build.module().name(), &context.config.project.version)
            );
            print!("{}", build.attributes().to_manifest());
        }
        attributes.insert(build.module().name(), build.attributes());
    }
    args.format.print_json(&attributes)?;
    Ok(())
}
