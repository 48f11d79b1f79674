//! rxlint rule engine - selector dispatch, type oracle and RxJS rules
//!
//! This crate holds everything between a lowered [`SyntaxTree`] and the
//! diagnostics a user sees:
//!
//! - **Selectors**: declarative node-shape predicates, validated once when a
//!   rule registers them and indexed by node type
//! - **Type oracle**: three-valued `could_be` queries answered by a pluggable
//!   [`TypeProvider`]; [`DeclarationTypes`] is the built-in one
//! - **Nested-call detector**: shared by `no-nested-subscribe` and
//!   `no-nested-pipe`
//! - **Reporter**: [`RuleContext::report`] turns message ids and template data
//!   into [`Diagnostic`]s
//! - **Engine**: one pre-order pass per file with per-rule failure isolation
//!
//! # Example
//!
//! ```
//! use rxlint_core::{NodeKind, Role, Severity, Span, SyntaxTree};
//! use rxlint_rule_engine::{LintEngine, RuleOptions, TypeContext};
//!
//! // Observable.create(fn)
//! let source = "Observable.create(fn)";
//! let mut tree = SyntaxTree::new(Span::new(0, 21));
//! let stmt = tree.push(tree.root(), Role::Body, NodeKind::ExpressionStatement, Span::new(0, 21));
//! let call = tree.push(stmt, Role::Expression, NodeKind::CallExpression { optional: false }, Span::new(0, 21));
//! let member = tree.push(call, Role::Callee, NodeKind::member(), Span::new(0, 17));
//! tree.push(member, Role::Object, NodeKind::identifier("Observable"), Span::new(0, 10));
//! tree.push(member, Role::Property, NodeKind::identifier("create"), Span::new(11, 17));
//! tree.push(call, Role::Argument, NodeKind::identifier("fn"), Span::new(18, 20));
//!
//! let engine = LintEngine::builder()
//!     .rule("no-create", Severity::Error, RuleOptions::new())
//!     .unwrap()
//!     .build();
//! let report = engine.lint(&tree, source, &TypeContext::none()).unwrap();
//! assert_eq!(report.diagnostics.len(), 1);
//! assert_eq!(report.diagnostics[0].message_id, "forbidden");
//! ```
//!
//! [`SyntaxTree`]: rxlint_core::SyntaxTree
//! [`Diagnostic`]: rxlint_core::Diagnostic

pub mod built_in;
pub mod constants;
pub mod context;
pub mod declarations;
pub mod engine;
pub mod fixer;
pub mod fixture;
pub mod nested;
pub mod oracle;
pub mod rule;
pub mod rules;
pub mod schema;
pub mod selector;

pub use built_in::{built_in_rules, find_rule, RuleEntry};
pub use context::{Report, RuleContext};
pub use declarations::DeclarationTypes;
pub use engine::{FileReport, LintEngine, LintEngineBuilder, RuleConfig, RuleFailure};
pub use fixer::{apply_fixes, primary_fixes, FixOutcome};
pub use fixture::{parse_fixture, ExpectedDiagnostic, Fixture, FixtureError};
pub use nested::{ArgumentRegistry, CallVerdict, WatchedCall};
pub use oracle::{
    Capability, StaticType, TypeAnswer, TypeContext, TypeOracle, TypePredicate, TypeProvider,
    TypeResolver,
};
pub use rule::{
    instantiate, DynRule, FilePass, Handler, Listeners, Rule, RuleCategory, RuleMeta, RuleOptions,
};
pub use schema::{OptionField, OptionKind, OptionSchema};
pub use selector::{compile_regex_safe, member_named, method_call, Selector, TextMatch};

/// Result type for rule operations
pub type Result<T> = std::result::Result<T, RuleError>;

/// Error types for the rule engine
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid options for rule '{rule}': {message}")]
    InvalidOptions { rule: String, message: String },

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Rule '{rule}' has no message with id '{message_id}'")]
    UnknownMessageId { rule: String, message_id: String },

    #[error("Rule '{rule}' failed: {message}")]
    Failed { rule: String, message: String },

    #[error(transparent)]
    Core(#[from] rxlint_core::Error),
}
