//! Diagnostic reporter
//!
//! Every handler receives a [`RuleContext`] bound to the current rule and
//! file. Reporting resolves a message id against the rule's catalogue,
//! substitutes `{{name}}` placeholders and appends exactly one
//! [`Diagnostic`].

use crate::oracle::TypeOracle;
use crate::rule::RuleMeta;
use crate::{Result, RuleError};
use rxlint_core::{Diagnostic, Fix, LineIndex, NodeId, Severity, Span, Suggestion, SyntaxTree};

/// Optional parts of a report.
#[derive(Debug, Clone, Default)]
pub struct Report {
    data: Vec<(String, String)>,
    fix: Option<Fix>,
    suggestions: Vec<PendingSuggestion>,
}

#[derive(Debug, Clone)]
struct PendingSuggestion {
    message_id: String,
    data: Vec<(String, String)>,
    fix: Fix,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template value for `{{key}}`.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    pub fn fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Attach a fix when one could be derived.
    pub fn maybe_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }

    /// Add a suggestion whose message shares the report's template data.
    pub fn suggest(mut self, message_id: impl Into<String>, fix: Fix) -> Self {
        self.suggestions.push(PendingSuggestion {
            message_id: message_id.into(),
            data: Vec::new(),
            fix,
        });
        self
    }

    /// Add a suggestion with its own template data. The report's data is
    /// not consulted for its message.
    pub fn suggest_with<I, K, V>(mut self, message_id: impl Into<String>, data: I, fix: Fix) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.suggestions.push(PendingSuggestion {
            message_id: message_id.into(),
            data: data.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            fix,
        });
        self
    }
}

/// Replace `{{key}}` placeholders. Placeholders without data are kept verbatim.
pub fn interpolate(template: &str, data: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = after[..close].trim();
        match data.iter().find(|(k, _)| k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Per-rule, per-file view handed to handlers.
pub struct RuleContext<'a> {
    tree: &'a SyntaxTree,
    source: &'a str,
    oracle: &'a TypeOracle<'a>,
    lines: &'a LineIndex,
    meta: &'static RuleMeta,
    severity: Severity,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        source: &'a str,
        oracle: &'a TypeOracle<'a>,
        lines: &'a LineIndex,
        meta: &'static RuleMeta,
        severity: Severity,
    ) -> Self {
        Self {
            tree,
            source,
            oracle,
            lines,
            meta,
            severity,
            diagnostics: Vec::new(),
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn oracle(&self) -> &'a TypeOracle<'a> {
        self.oracle
    }

    pub fn meta(&self) -> &'static RuleMeta {
        self.meta
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Source text covered by `node`.
    pub fn text_of(&self, node: NodeId) -> Result<&'a str> {
        Ok(self.tree.span(node).source_text(self.source)?)
    }

    /// Report on `node`'s span.
    pub fn report(&mut self, message_id: &str, node: NodeId, report: Report) -> Result<()> {
        let span = self.tree.span(node);
        self.report_span(message_id, span, report)
    }

    /// Report on an explicit span, such as a keyword that has no node of its
    /// own.
    pub fn report_span(&mut self, message_id: &str, span: Span, report: Report) -> Result<()> {
        let message = interpolate(self.template(message_id)?, &report.data);

        let suggestions = report
            .suggestions
            .into_iter()
            .map(|pending| {
                let template = self.template(&pending.message_id)?;
                let data = if pending.data.is_empty() {
                    &report.data
                } else {
                    &pending.data
                };
                Ok(Suggestion {
                    message: interpolate(template, data),
                    message_id: pending.message_id,
                    fix: pending.fix,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.diagnostics.push(Diagnostic {
            rule: self.meta.name.to_string(),
            message_id: message_id.to_string(),
            message,
            severity: self.severity,
            span,
            location: self.lines.location(span),
            fix: report.fix,
            suggestions,
        });
        Ok(())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn template(&self, message_id: &str) -> Result<&'static str> {
        self.meta
            .message(message_id)
            .ok_or_else(|| RuleError::UnknownMessageId {
                rule: self.meta.name.to_string(),
                message_id: message_id.to_string(),
            })
    }
}
