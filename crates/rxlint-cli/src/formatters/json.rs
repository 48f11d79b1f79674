//! JSON formatter for lint runs.

use crate::cli::lint::LintRun;

pub struct JsonFormatter;

pub fn to_json(run: &LintRun) -> serde_json::Result<String> {
    serde_json::to_string_pretty(run)
}

pub fn print_json(run: &LintRun) {
    match to_json(run) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}
