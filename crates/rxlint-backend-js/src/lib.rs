//! JavaScript/TypeScript backend for rxlint.
//!
//! Parses source files with oxc, lowers the oxc AST into a
//! [`SyntaxTree`](rxlint_core::SyntaxTree) and drives the rule engine over
//! it. Also home to file discovery and the fixture-based [`RuleTester`].
//!
//! # Example
//!
//! ```
//! use rxlint_backend_js::JsLinter;
//! use rxlint_core::Severity;
//! use rxlint_rule_engine::{DeclarationTypes, LintEngine, RuleOptions, TypeContext};
//! use std::path::Path;
//!
//! let engine = LintEngine::builder()
//!     .rule("no-nested-subscribe", Severity::Error, RuleOptions::new())
//!     .unwrap()
//!     .build();
//! let linter = JsLinter::new(engine, TypeContext::with_provider(DeclarationTypes));
//!
//! let source = "import { of } from \"rxjs\";\nconst a = of(1);\nconst b = of(2);\na.subscribe(() => b.subscribe());\n";
//! let report = linter.lint_source(Path::new("example.ts"), source).unwrap();
//! assert_eq!(report.diagnostics.len(), 1);
//! ```

pub mod file_discovery;
pub mod linter;
pub mod lower;
pub mod parser;
pub mod tester;

pub use file_discovery::{discover_source_files, validate_project_root, DiscoveryConfig};
pub use linter::{FixResult, JsLinter, MAX_FIX_PASSES};
pub use parser::{is_supported_path, parse_source};
pub use tester::{ExpectedSuggestion, RuleTester};

use std::path::PathBuf;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Error types for the JavaScript backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Unsupported file type: {}", path.display())]
    UnsupportedFile { path: PathBuf },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File discovery failed: {0}")]
    Discovery(String),

    #[error(transparent)]
    Rule(#[from] rxlint_rule_engine::RuleError),

    #[error(transparent)]
    Core(#[from] rxlint_core::Error),

    #[error(transparent)]
    Fixture(#[from] rxlint_rule_engine::FixtureError),
}
