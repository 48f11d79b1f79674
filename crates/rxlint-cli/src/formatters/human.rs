//! Human-readable output with source snippets.

use crate::cli::lint::{FileResult, LintRun, Summary};
use crate::cli::rules::severity_label;
use colored::*;
use miette::{GraphicalReportHandler, LabeledSpan, NamedSource, SourceCode};
use rxlint_core::{Diagnostic, Severity};
use std::fmt;

pub struct HumanFormatter;

/// One diagnostic bound to its file, renderable by miette.
#[derive(Debug)]
struct Finding<'a> {
    diagnostic: &'a Diagnostic,
    source: &'a NamedSource<String>,
}

impl fmt::Display for Finding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message)
    }
}

impl std::error::Error for Finding<'_> {}

impl miette::Diagnostic for Finding<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        Some(Box::new(&self.diagnostic.rule))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diagnostic.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warn => miette::Severity::Warning,
        })
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let diagnostic = self.diagnostic;
        if diagnostic.fix.is_some() {
            return Some(Box::new("fixable with --fix"));
        }
        let suggestion = diagnostic.suggestions.first()?;
        Some(Box::new(format!("suggestion: {}", suggestion.message)))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diagnostic.span;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.diagnostic.message_id.clone()),
            (span.start as usize, span.len() as usize),
        ))))
    }
}

pub fn print_results(run: &LintRun) {
    let handler = GraphicalReportHandler::new();

    for file in &run.files {
        print_file(&handler, file);
    }

    print_summary(&run.summary);
}

fn print_file(handler: &GraphicalReportHandler, file: &FileResult) {
    let path = file.path.display().to_string();

    if let Some(error) = &file.error {
        eprintln!("{} {}: {}", "error".red().bold(), path, error);
        return;
    }

    let report = &file.report;
    if report.diagnostics.is_empty() && report.failures.is_empty() {
        return;
    }

    println!("{}", path.bold().underline());
    let source = NamedSource::new(&path, file.source.clone());
    for diagnostic in &report.diagnostics {
        let finding = Finding {
            diagnostic,
            source: &source,
        };
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, &finding) {
            Ok(()) => print!("{}", rendered),
            Err(_) => println!("{}", format_line(&path, diagnostic)),
        }
    }

    for failure in &report.failures {
        println!(
            "  {} rule '{}' failed: {}",
            "!".yellow().bold(),
            failure.rule,
            failure.message
        );
    }
    println!();
}

/// Compact `path:line:column: severity message [rule]` form.
pub fn format_line(path: &str, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{}: {} {} [{}]",
        path,
        diagnostic.location.line,
        diagnostic.location.column,
        severity_label(diagnostic.severity),
        diagnostic.message,
        diagnostic.rule.bright_black()
    )
}

fn print_summary(summary: &Summary) {
    let problems = summary.errors + summary.warnings;
    let files = format!(
        "{} file{}",
        summary.files_linted,
        if summary.files_linted == 1 { "" } else { "s" }
    );

    if problems == 0 && summary.rule_failures == 0 && summary.file_errors == 0 {
        println!("{} No problems found in {}", "✓".green().bold(), files);
    } else {
        let line = format!(
            "Found {} error{} and {} warning{} in {}",
            summary.errors,
            if summary.errors == 1 { "" } else { "s" },
            summary.warnings,
            if summary.warnings == 1 { "" } else { "s" },
            files
        );
        if summary.errors > 0 {
            println!("{}", line.red().bold());
        } else {
            println!("{}", line.yellow().bold());
        }
    }

    if summary.fixes_applied > 0 {
        println!("  {} fix(es) applied", summary.fixes_applied.to_string().green());
    }
    if summary.rule_failures > 0 {
        println!("  {} rule failure(s)", summary.rule_failures.to_string().yellow());
    }
    if summary.file_errors > 0 {
        println!("  {} file(s) could not be linted", summary.file_errors.to_string().red());
    }
    if summary.files_skipped > 0 {
        println!(
            "  {} file(s) skipped after --max-duration",
            summary.files_skipped.to_string().yellow()
        );
    }
    println!("  {}", format!("Finished in {}ms", summary.duration_ms).bright_black());
}
