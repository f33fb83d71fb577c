use anyhow::Result;

use buildplan_core::TaskKind;
use clap::{Parser, Subcommand};

use crate::{
    commands::{
        AttributesArgs, ConfigArgs, DescriptorArgs, EnvArgs, InitArgs, PlanArgs, PublishArgs,
        RunArgs, handle_attributes, handle_config, handle_descriptor, handle_env, handle_init,
        handle_plan, handle_publish, handle_run,
    },
    prompter::InquirePrompter,
};
pub mod commands;
mod context;
mod logging;
pub mod options;
pub mod prompter;
mod runner;

pub use prompter::UserCancelled;

#[derive(Parser, Debug)]
#[command(
    name = "buildplan",
    author,
    version,
    about = "Declarative build orchestration for multi-module Java libraries",
    help_template = "{name} {version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print debug logs to stderr
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init(InitArgs),
    Config(ConfigArgs),
    Env(EnvArgs),
    Plan(PlanArgs),
    Attributes(AttributesArgs),
    Descriptor(DescriptorArgs),
    /// Compile the main sources
    Compile(RunArgs),
    /// Run the unit tests, followed by the coverage report
    Test(RunArgs),
    /// Generate the coverage report
    CoverageReport(RunArgs),
    /// Generate the API documentation
    Document(RunArgs),
    /// Build the module jar with its manifest
    PackageJar(RunArgs),
    Publish(PublishArgs),
}

pub async fn main(args: &[String]) -> Result<()> {
    let cli = Cli::parse_from(args);
    logging::init_tracing(cli.verbose);
    match cli.command {
        Commands::Init(args) => handle_init(&args).await?,
        Commands::Config(args) => handle_config(&args).await?,
        Commands::Env(args) => handle_env(&args).await?,
        Commands::Plan(args) => handle_plan(&args).await?,
        Commands::Attributes(args) => handle_attributes(&args).await?,
        Commands::Descriptor(args) => handle_descriptor(&args).await?,
        Commands::Compile(args) => handle_run(TaskKind::Compile, &args).await?,
        Commands::Test(args) => handle_run(TaskKind::Test, &args).await?,
        Commands::CoverageReport(args) => handle_run(TaskKind::CoverageReport, &args).await?,
        Commands::Document(args) => handle_run(TaskKind::Document, &args).await?,
        Commands::PackageJar(args) => handle_run(TaskKind::PackageJar, &args).await?,
        Commands::Publish(args) => handle_publish(&args, &InquirePrompter).await?,
    }
    Ok(())
}
