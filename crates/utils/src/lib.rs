mod collect_doc_files;
mod collect_document_inputs;
mod display_report;
mod get_buildplan_dir;
mod get_relative_path;
mod resolve_properties;
mod write_artifact;

pub use collect_doc_files::{DOC_FILES_PATTERN, collect_doc_files};
pub use collect_document_inputs::collect_document_inputs;
pub use display_report::{display_module, display_report};
pub use get_buildplan_dir::{
    BUILDPLAN_DIR, CONFIG_FILE, find_buildplan_dir, get_buildplan_config, get_buildplan_dir,
    get_project_root,
};
pub use get_relative_path::get_relative_path;
pub use resolve_properties::{PROPERTY_ENV_PREFIX, parse_property, resolve_properties};
pub use write_artifact::{copy_artifact, write_artifact};
