use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// CLI output format selection.
///
/// Controls whether commands print human-readable output or JSON for CI integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatOptions {
    /// JSON format for CI/CD pipelines
    #[value(name = "json")]
    Json,
    /// Human-readable colored terminal output
    #[value(name = "stdout")]
    Stdout,
}

impl FormatOptions {
    pub fn print(&self, stdout_msg: &str, json_msg: &str) {
        match self {
            Self::Stdout => println!("{stdout_msg}"),
            Self::Json => println!("{json_msg}"),
        }
    }

    /// Print `value` as pretty JSON when JSON output is selected.
    ///
    /// # Errors
    /// Returns error if `value` cannot be serialized.
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if *self == Self::Json {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_stdout(&self) -> bool {
        *self == Self::Stdout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[arg(long, default_value = "stdout")]
        format: FormatOptions,
    }

    #[test]
    fn test_format_default_is_stdout() {
        let cli = TestCli::parse_from(["test"]);
        assert!(cli.format.is_stdout());
    }

    #[test]
    fn test_format_json() {
        let cli = TestCli::parse_from(["test", "--format", "json"]);
        assert_eq!(cli.format, FormatOptions::Json);
        assert!(cli.format.print_json(&vec!["compile"]).is_ok());
    }
}
