use buildplan_core::{BuildReport, TaskOutcome};
use colored::Colorize;

/// Header line of a module in command output.
#[must_use]
pub fn display_module(name: &str, version: &str) -> String {
    format!(
        "{} {}",
        format!("[{name}]").bright_blue().bold(),
        format!("(v{version})").bright_green()
    )
}

/// One line per task, indented under the module header.
#[must_use]
pub fn display_report(report: &BuildReport) -> String {
    let mut lines = Vec::with_capacity(report.results.len());
    for result in &report.results {
        let marker = match result.outcome {
            TaskOutcome::Succeeded => "✓".green(),
            TaskOutcome::Failed { .. } => "✗".red(),
            TaskOutcome::Skipped { .. } => "-".yellow(),
        };
        lines.push(format!(
            "  {marker} {} {}",
            result.task.to_string().bright_white().bold(),
            result.outcome
        ));
    }
    lines.join("\n")
}
