//! rxlint CLI library components.
//!
//! The binary in `main.rs` parses arguments and hands off to
//! [`cli::lint::run_lint`]; formatters print the resulting [`LintRun`].

pub mod cli;
pub mod commands;
pub mod formatters;
pub mod ignore;

pub use cli::lint::{run_lint, FileResult, LintRun, LintRunOptions, Summary};
