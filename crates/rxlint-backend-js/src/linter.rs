//! File-level driver: parse, lint, fix.

use crate::parser::parse_source;
use crate::{BackendError, Result};
use rxlint_rule_engine::{apply_fixes, primary_fixes, FileReport, LintEngine, TypeContext};
use std::path::Path;
use tracing::debug;

/// Upper bound on lint-and-fix rounds for one file. Fixes that keep producing
/// new fixable diagnostics stop here.
pub const MAX_FIX_PASSES: usize = 10;

/// Outcome of [`JsLinter::fix_source`].
#[derive(Debug)]
pub struct FixResult {
    /// Source after every applied fix.
    pub output: String,
    /// Number of fixes applied across all passes.
    pub applied: usize,
    /// Report for `output`.
    pub report: FileReport,
}

impl FixResult {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Lints JavaScript and TypeScript sources with one engine configuration.
#[derive(Debug)]
pub struct JsLinter {
    engine: LintEngine,
    types: TypeContext,
}

impl JsLinter {
    pub fn new(engine: LintEngine, types: TypeContext) -> Self {
        Self { engine, types }
    }

    pub fn engine(&self) -> &LintEngine {
        &self.engine
    }

    pub fn types(&self) -> &TypeContext {
        &self.types
    }

    /// Lint in-memory source. `path` only selects the source type.
    pub fn lint_source(&self, path: &Path, source: &str) -> Result<FileReport> {
        let tree = parse_source(path, source)?;
        let report = self.engine.lint(&tree, source, &self.types)?;
        debug!(
            path = %path.display(),
            diagnostics = report.diagnostics.len(),
            failures = report.failures.len(),
            "linted file"
        );
        Ok(report)
    }

    /// Read and lint a file, returning its source alongside the report.
    pub fn lint_file(&self, path: &Path) -> Result<(String, FileReport)> {
        let source = std::fs::read_to_string(path).map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let report = self.lint_source(path, &source)?;
        Ok((source, report))
    }

    /// Apply primary fixes until none remain or [`MAX_FIX_PASSES`] is
    /// reached. Suggestions are never applied.
    pub fn fix_source(&self, path: &Path, source: &str) -> Result<FixResult> {
        let mut output = source.to_string();
        let mut applied = 0;

        for pass in 0..MAX_FIX_PASSES {
            let report = self.lint_source(path, &output)?;
            let outcome = apply_fixes(&output, primary_fixes(&report.diagnostics))?;
            if !outcome.changed() {
                return Ok(FixResult {
                    output,
                    applied,
                    report,
                });
            }

            debug!(
                path = %path.display(),
                pass,
                applied = outcome.applied,
                skipped = outcome.skipped,
                "applied fixes"
            );
            applied += outcome.applied;
            output = outcome.output;
        }

        let report = self.lint_source(path, &output)?;
        Ok(FixResult {
            output,
            applied,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxlint_core::Severity;
    use rxlint_rule_engine::{DeclarationTypes, RuleOptions};
    use std::fs;
    use tempfile::TempDir;

    fn linter(rules: &[&str]) -> JsLinter {
        let mut builder = LintEngine::builder();
        for rule in rules {
            builder = builder
                .rule(rule, Severity::Error, RuleOptions::new())
                .unwrap();
        }
        JsLinter::new(builder.build(), TypeContext::with_provider(DeclarationTypes))
    }

    #[test]
    fn test_fix_rewrites_internal_imports() {
        let source = "import { of } from \"rxjs/internal/observable/of\";\nimport { map } from 'rxjs/internal/operators/map';\n";
        let result = linter(&["no-internal"])
            .fix_source(Path::new("a.ts"), source)
            .unwrap();
        assert_eq!(
            result.output,
            "import { of } from \"rxjs\";\nimport { map } from 'rxjs/operators';\n"
        );
        assert_eq!(result.applied, 2);
        assert!(result.report.diagnostics.is_empty());
    }

    #[test]
    fn test_fix_without_fixable_diagnostics_is_identity() {
        let source = "Observable.create(() => {});\n";
        let result = linter(&["no-create"])
            .fix_source(Path::new("a.js"), source)
            .unwrap();
        assert!(!result.changed());
        assert_eq!(result.output, source);
        // The suggestion is still offered but not applied.
        assert_eq!(result.report.diagnostics.len(), 1);
        assert_eq!(result.report.diagnostics[0].suggestions.len(), 1);
    }

    #[test]
    fn test_lint_file_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("create.js");
        fs::write(&path, "Observable.create(fn);\n").unwrap();

        let (source, report) = linter(&["no-create"]).lint_file(&path).unwrap();
        assert_eq!(source, "Observable.create(fn);\n");
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_lint_file_missing() {
        let err = linter(&[])
            .lint_file(Path::new("/definitely/not/here.ts"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Io { .. }));
    }
}
