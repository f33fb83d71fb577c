mod format_options;

pub use format_options::FormatOptions;
