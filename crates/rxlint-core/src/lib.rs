//! rxlint Core - syntax tree and diagnostic types.
//!
//! This crate provides the backend-agnostic foundation every other rxlint
//! crate builds on:
//!
//! - [`SyntaxTree`]: arena of typed nodes for one source file, with parent
//!   back-references and named child roles
//! - [`Span`] and [`LineIndex`]: byte ranges and their line/column mapping
//! - [`Diagnostic`], [`Fix`] and [`Suggestion`]: findings emitted by rules
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   rxlint-cli     │  (discovery, config, output)
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────────┐
//! │rxlint-backend-js │────▶│ rxlint-rule-engine   │
//! │ (oxc lowering)   │     │ (selectors, oracle,  │
//! └────────┬─────────┘     │  rules, reporter)    │
//!          │               └──────────┬───────────┘
//!          ▼                          ▼
//! ┌─────────────────────────────────────────────┐
//! │            rxlint-core (this crate)         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use rxlint_core::{NodeKind, Role, Span, SyntaxTree};
//!
//! // `a.subscribe()`
//! let mut tree = SyntaxTree::new(Span::new(0, 13));
//! let stmt = tree.push(tree.root(), Role::Body, NodeKind::ExpressionStatement, Span::new(0, 13));
//! let call = tree.push(stmt, Role::Expression, NodeKind::CallExpression { optional: false }, Span::new(0, 13));
//! let member = tree.push(call, Role::Callee, NodeKind::member(), Span::new(0, 11));
//! tree.push(member, Role::Object, NodeKind::identifier("a"), Span::new(0, 1));
//! tree.push(member, Role::Property, NodeKind::identifier("subscribe"), Span::new(2, 11));
//!
//! assert_eq!(tree.member_call_name(call), Some("subscribe"));
//! ```

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod tree;

// Re-export core types for convenience
pub use diagnostic::{Diagnostic, Fix, Severity, Suggestion};
pub use error::{Error, Result};
pub use span::{LineIndex, Location, Span};
pub use tree::{Ancestors, Node, NodeId, NodeKind, NodeType, Preorder, Role, SyntaxTree};
