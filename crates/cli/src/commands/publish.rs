use anyhow::Result;
use buildplan_core::TaskKind;
use clap::Args;

use crate::{
    commands::run::{RunArgs, handle_run},
    prompter::Prompter,
};

#[derive(Args, Debug)]
#[command(about = "Package and upload the publishable modules")]
pub struct PublishArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Publish modules after confirmation.
///
/// # Errors
/// Returns error if the user cancels the prompt or the publish build fails.
pub async fn handle_publish(args: &PublishArgs, prompter: &dyn Prompter) -> Result<()> {
    if !args.run.dry_run
        && !args.yes
        && !prompter.confirm("Are you sure you want to publish the modules?")?
    {
        args.run.format.print("Publish cancelled", "{}");
        return Ok(());
    }
    handle_run(TaskKind::Publish, &args.run).await
}
