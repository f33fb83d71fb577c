mod attributes;
mod config;
mod descriptor;
mod env;
mod init;
mod plan;
mod publish;
mod run;

pub use attributes::AttributesArgs;
pub use attributes::handle_attributes;
pub use config::ConfigArgs;
pub use config::handle_config;
pub use descriptor::DescriptorArgs;
pub use descriptor::handle_descriptor;
pub use env::EnvArgs;
pub use env::handle_env;
pub use init::InitArgs;
pub use init::handle_init;
pub use plan::PlanArgs;
pub use plan::handle_plan;
pub use publish::PublishArgs;
pub use publish::handle_publish;
pub use run::RunArgs;
pub use run::handle_run;
