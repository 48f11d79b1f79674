//! Fixture-driven rule tester.
//!
//! ```
//! use rxlint_backend_js::RuleTester;
//!
//! let tester = RuleTester::new("no-create");
//! tester.valid("new Observable(subscriber => subscriber.complete());");
//! tester.invalid(
//!     r#"
//! Observable.create(subscriber => subscriber.complete());
//!            ~~~~~~ [forbidden]
//! "#,
//! );
//! ```

use crate::linter::JsLinter;
use crate::{BackendError, Result};
use rxlint_core::Diagnostic;
use rxlint_rule_engine::context::interpolate;
use rxlint_rule_engine::{
    apply_fixes, find_rule, parse_fixture, primary_fixes, DeclarationTypes, ExpectedDiagnostic,
    FileReport, LintEngine, RuleError, RuleOptions, TypeContext,
};
use serde_json::Value;
use std::path::PathBuf;

/// A suggestion an invalid fixture expects, identified by its position in
/// the list passed to [`RuleTester::invalid_with_suggestions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSuggestion {
    pub message_id: String,
    /// Whole source after applying the suggestion.
    pub output: String,
}

impl ExpectedSuggestion {
    pub fn new(message_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            output: output.into(),
        }
    }
}

/// Runs a single rule over fixtures and checks the diagnostics it reports.
///
/// Every check panics with a readable message on mismatch, which is what a
/// `#[test]` wants.
#[derive(Debug, Clone)]
pub struct RuleTester {
    rule: String,
    options: RuleOptions,
    type_information: bool,
    path: PathBuf,
}

impl RuleTester {
    /// Tester for a built-in rule, with type information and a `.ts` path.
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            options: RuleOptions::new(),
            type_information: true,
            path: PathBuf::from("fixture.ts"),
        }
    }

    /// Rule options as a JSON object.
    ///
    /// # Panics
    ///
    /// Panics if `options` is not an object.
    pub fn options(mut self, options: Value) -> Self {
        match options {
            Value::Object(map) => self.options = map,
            other => panic!("rule options must be a JSON object, got {}", other),
        }
        self
    }

    /// Lint without a type provider.
    pub fn without_types(mut self) -> Self {
        self.type_information = false;
        self
    }

    /// File path used to pick the source type.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Lint `source` with the configured rule.
    pub fn run(&self, source: &str) -> Result<FileReport> {
        let entry = find_rule(&self.rule).ok_or_else(|| RuleError::UnknownRule(self.rule.clone()))?;
        let engine = LintEngine::builder()
            .rule(&self.rule, entry.meta().default_severity, self.options.clone())?
            .build();
        let types = if self.type_information {
            TypeContext::with_provider(DeclarationTypes)
        } else {
            TypeContext::none()
        };
        JsLinter::new(engine, types).lint_source(&self.path, source)
    }

    /// Assert that `source` produces no diagnostics and no failures.
    #[track_caller]
    pub fn valid(&self, source: &str) {
        let report = self.run_or_panic(source);
        if !report.diagnostics.is_empty() || !report.failures.is_empty() {
            panic!(
                "expected no diagnostics from {}, got:\n{}{:?}\nsource:\n{}",
                self.rule,
                describe(&report.diagnostics),
                report.failures,
                source
            );
        }
    }

    /// Assert that the annotated fixture produces exactly the annotated
    /// diagnostics.
    #[track_caller]
    pub fn invalid(&self, fixture: &str) {
        self.check(fixture, None, &[]);
    }

    /// Like [`invalid`](Self::invalid), and applying every primary fix once
    /// must yield `output`.
    #[track_caller]
    pub fn invalid_with_output(&self, fixture: &str, output: &str) {
        self.check(fixture, Some(output), &[]);
    }

    /// Like [`invalid`](Self::invalid), with `suggest` annotations resolved
    /// against `suggestions`.
    #[track_caller]
    pub fn invalid_with_suggestions(&self, fixture: &str, suggestions: &[ExpectedSuggestion]) {
        self.check(fixture, None, suggestions);
    }

    #[track_caller]
    fn run_or_panic(&self, source: &str) -> FileReport {
        match self.run(source) {
            Ok(report) => report,
            Err(e) => panic!("failed to lint fixture with {}: {}", self.rule, e),
        }
    }

    #[track_caller]
    fn check(&self, fixture: &str, output: Option<&str>, suggestions: &[ExpectedSuggestion]) {
        let fixture = match parse_fixture(fixture) {
            Ok(fixture) => fixture,
            Err(e) => panic!("{}", BackendError::from(e)),
        };
        let report = self.run_or_panic(&fixture.source);
        if !report.failures.is_empty() {
            panic!("rule {} failed: {:?}", self.rule, report.failures);
        }

        let mut expected = fixture.expected.clone();
        expected.sort_by_key(|e| (e.line, e.column, e.end_line, e.end_column));
        let actual = &report.diagnostics;

        if expected.len() != actual.len() {
            panic!(
                "expected {} diagnostic(s) from {}, got {}:\n{}source:\n{}",
                expected.len(),
                self.rule,
                actual.len(),
                describe(actual),
                fixture.source
            );
        }

        for (want, got) in expected.iter().zip(actual) {
            if let Err(message) = self.compare(want, got, &fixture.source, suggestions) {
                panic!("{}\nsource:\n{}", message, fixture.source);
            }
        }

        if let Some(output) = output {
            let fixed = match apply_fixes(&fixture.source, primary_fixes(actual)) {
                Ok(outcome) => outcome.output,
                Err(e) => panic!("fix does not apply: {}", e),
            };
            assert_eq!(fixed, output, "fixed output of {} differs", self.rule);
        }
    }

    fn compare(
        &self,
        want: &ExpectedDiagnostic,
        got: &Diagnostic,
        source: &str,
        suggestions: &[ExpectedSuggestion],
    ) -> std::result::Result<(), String> {
        if got.message_id != want.message_id {
            return Err(format!(
                "expected message id '{}' at {}:{}, got '{}'",
                want.message_id, want.line, want.column, got.message_id
            ));
        }

        let loc = got.location;
        let got_pos = (loc.line, loc.column, loc.end_line, loc.end_column);
        let want_pos = (want.line, want.column, want.end_line, want.end_column);
        if got_pos != want_pos {
            return Err(format!(
                "'{}' expected at {:?}, reported at {:?}",
                want.message_id, want_pos, got_pos
            ));
        }

        if let Some(data) = &want.data {
            let template = find_rule(&self.rule)
                .and_then(|entry| entry.meta().message(&want.message_id))
                .ok_or_else(|| format!("unknown message id '{}'", want.message_id))?;
            let data: Vec<(String, String)> = data
                .iter()
                .map(|(key, value)| match value {
                    Value::String(s) => (key.clone(), s.clone()),
                    other => (key.clone(), other.to_string()),
                })
                .collect();
            let message = interpolate(template, &data);
            if got.message != message {
                return Err(format!(
                    "expected message \"{}\", got \"{}\"",
                    message, got.message
                ));
            }
        }

        if let Some(indices) = &want.suggestions {
            let wanted: Vec<&ExpectedSuggestion> = if indices.is_empty() {
                suggestions.iter().collect()
            } else {
                indices
                    .iter()
                    .map(|i| {
                        suggestions
                            .get(*i)
                            .ok_or_else(|| format!("no expected suggestion with index {}", i))
                    })
                    .collect::<std::result::Result<_, _>>()?
            };

            if wanted.len() != got.suggestions.len() {
                return Err(format!(
                    "expected {} suggestion(s), got {}",
                    wanted.len(),
                    got.suggestions.len()
                ));
            }
            for (want, got) in wanted.iter().zip(&got.suggestions) {
                let output = apply_fixes(source, [&got.fix])
                    .map_err(|e| format!("suggestion does not apply: {}", e))?
                    .output;
                if got.message_id != want.message_id || output != want.output {
                    return Err(format!(
                        "expected suggestion '{}' producing:\n{}\ngot '{}' producing:\n{}",
                        want.message_id, want.output, got.message_id, output
                    ));
                }
            }
        }

        Ok(())
    }
}

fn describe(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| {
            format!(
                "  {}:{}-{}:{} [{}] {}\n",
                d.location.line,
                d.location.column,
                d.location.end_line,
                d.location.end_column,
                d.message_id,
                d.message
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "expected 1 diagnostic(s)")]
    fn test_missing_diagnostic_panics() {
        RuleTester::new("no-create").invalid("new Observable(fn);\n~~~ [forbidden]");
    }

    #[test]
    #[should_panic(expected = "expected no diagnostics")]
    fn test_unexpected_diagnostic_panics() {
        RuleTester::new("no-create").valid("Observable.create(fn);");
    }

    #[test]
    #[should_panic(expected = "reported at")]
    fn test_wrong_position_panics() {
        RuleTester::new("no-create").invalid("Observable.create(fn);\n~~~~~~~~~~ [forbidden]");
    }

    #[test]
    fn test_unknown_rule_is_an_error() {
        let err = RuleTester::new("no-such-rule").run("x;").unwrap_err();
        assert!(matches!(err, BackendError::Rule(RuleError::UnknownRule(_))));
    }

    #[test]
    #[should_panic(expected = "must be a JSON object")]
    fn test_non_object_options_panic() {
        let _ = RuleTester::new("ban-operators").options(serde_json::json!(["tap"]));
    }
}
