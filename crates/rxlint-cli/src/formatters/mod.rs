//! Output formatters for lint runs.

pub mod human;
pub mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::cli::lint::LintRun;

/// Trait for formatting lint results
pub trait Formatter {
    /// Format and print the run
    fn format(&self, run: &LintRun);
}

impl Formatter for HumanFormatter {
    fn format(&self, run: &LintRun) {
        human::print_results(run);
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, run: &LintRun) {
        json::print_json(run);
    }
}
