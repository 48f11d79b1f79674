//! Lint run orchestration.

use crate::cli::rules::select_rules;
use crate::ignore::{IgnorePatternBuilder, IgnoreSet};
use anyhow::{Context, Result};
use rxlint_backend_js::{discover_source_files, BackendError, DiscoveryConfig, JsLinter};
use rxlint_config::ConfigManager;
use rxlint_rule_engine::{DeclarationTypes, FileReport, LintEngine, TypeContext};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Options for one lint run.
#[derive(Debug, Clone, Default)]
pub struct LintRunOptions {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub fix: bool,
    pub rules: Vec<String>,
    pub no_type_info: bool,
    /// Stop before the next file once this much time has passed.
    pub max_duration: Option<Duration>,
    /// Disable all ignore patterns, including defaults and .gitignore.
    pub no_ignore: bool,
    /// Disable .gitignore respect only.
    pub no_gitignore: bool,
    pub ignore_patterns: Vec<String>,
}

/// Result for one file.
#[derive(Debug, Serialize)]
pub struct FileResult {
    pub path: PathBuf,
    /// Source the report refers to, after fixes when `--fix` is on.
    #[serde(skip)]
    pub source: String,
    #[serde(flatten)]
    pub report: FileReport,
    #[serde(skip_serializing_if = "is_zero")]
    pub fixes_applied: usize,
    /// Set when the file could not be read or parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Totals over a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files_linted: usize,
    /// Files left unvisited after `--max-duration` ran out.
    pub files_skipped: usize,
    pub errors: usize,
    pub warnings: usize,
    pub rule_failures: usize,
    pub file_errors: usize,
    pub fixes_applied: usize,
    pub duration_ms: u64,
}

impl Summary {
    /// Whether the process should exit with status 1.
    pub fn is_failure(&self) -> bool {
        self.errors > 0 || self.rule_failures > 0 || self.file_errors > 0
    }

    fn record(&mut self, file: &FileResult) {
        self.files_linted += 1;
        self.errors += file.report.error_count();
        self.warnings += file.report.warning_count();
        self.rule_failures += file.report.failures.len();
        self.fixes_applied += file.fixes_applied;
        if file.error.is_some() {
            self.file_errors += 1;
        }
    }
}

/// Everything a formatter needs.
#[derive(Debug, Serialize)]
pub struct LintRun {
    pub files: Vec<FileResult>,
    pub summary: Summary,
}

/// Lint `options.paths`, resolving relative paths and config against
/// `working_dir`.
pub fn run_lint(options: &LintRunOptions, working_dir: &Path) -> Result<LintRun> {
    let started = Instant::now();

    // Step 1: Load configuration
    let manager = match &options.config {
        Some(path) => {
            let path = resolve(working_dir, path);
            ConfigManager::load_from(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => ConfigManager::discover(working_dir).context("Failed to load config")?,
    };
    match manager.path() {
        Some(path) => info!("Using config {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    let config = manager.config();

    // Step 2: Build the engine
    let rules = select_rules(config, &options.rules)?;
    let engine = LintEngine::from_config(&rules).context("Invalid rule configuration")?;
    let types = if config.type_information && !options.no_type_info {
        TypeContext::with_provider(DeclarationTypes)
    } else {
        info!("Type information disabled; type-aware rules will not report");
        TypeContext::none()
    };
    let linter = JsLinter::new(engine, types);
    debug!(rules = rules.len(), "Built lint engine");

    // Step 3: Build ignore patterns
    let ignore = if options.no_ignore {
        IgnorePatternBuilder::new().no_defaults().build()
    } else {
        IgnorePatternBuilder::new()
            .add_patterns(&config.ignore)
            .context("Invalid ignore pattern in config")?
            .add_patterns(&options.ignore_patterns)
            .context("Invalid ignore pattern")?
            .build()
    }
    .context("Failed to build ignore patterns")?;

    // Step 4: Discover files
    let paths: Vec<PathBuf> = options
        .paths
        .iter()
        .map(|path| resolve(working_dir, path))
        .collect();
    let discovery = DiscoveryConfig {
        ignore_patterns: ignore.patterns().to_vec(),
        respect_gitignore: !options.no_ignore && !options.no_gitignore,
        ..DiscoveryConfig::default()
    };
    let mut files =
        discover_source_files(&paths, &discovery).context("Failed to discover source files")?;
    drop_ignored_explicit_files(&mut files, &paths, &ignore, working_dir);
    info!("Found {} file(s) to lint", files.len());

    // Step 5: Lint sequentially
    let mut results = Vec::with_capacity(files.len());
    let mut summary = Summary::default();
    for (index, path) in files.iter().enumerate() {
        if let Some(limit) = options.max_duration {
            if started.elapsed() >= limit {
                summary.files_skipped = files.len() - index;
                warn!(
                    "Stopped after {} of {} files: --max-duration of {}s exceeded",
                    index,
                    files.len(),
                    limit.as_secs_f64()
                );
                break;
            }
        }

        let result = lint_one(&linter, path, options.fix, working_dir);
        summary.record(&result);
        results.push(result);
    }

    summary.duration_ms = started.elapsed().as_millis() as u64;
    Ok(LintRun {
        files: results,
        summary,
    })
}

fn lint_one(linter: &JsLinter, path: &Path, fix: bool, working_dir: &Path) -> FileResult {
    let display_path = path.strip_prefix(working_dir).unwrap_or(path).to_path_buf();
    let failed = |source: String, error: BackendError| {
        warn!("Skipping {}: {}", display_path.display(), error);
        FileResult {
            path: display_path.clone(),
            source,
            report: FileReport::default(),
            fixes_applied: 0,
            error: Some(error.to_string()),
        }
    };

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(source) => {
            return failed(
                String::new(),
                BackendError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            )
        }
    };

    let outcome = if fix {
        linter.fix_source(path, &source).and_then(|fixed| {
            if fixed.changed() {
                std::fs::write(path, &fixed.output).map_err(|source| BackendError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!("Fixed {} problem(s) in {}", fixed.applied, display_path.display());
            }
            Ok((fixed.output, fixed.report, fixed.applied))
        })
    } else {
        linter
            .lint_source(path, &source)
            .map(|report| (source.clone(), report, 0))
    };

    match outcome {
        Ok((source, report, fixes_applied)) => {
            for failure in &report.failures {
                warn!(
                    "Rule '{}' failed on {}: {}",
                    failure.rule,
                    display_path.display(),
                    failure.message
                );
            }
            FileResult {
                path: display_path,
                source,
                report,
                fixes_applied,
                error: None,
            }
        }
        Err(error) => failed(source, error),
    }
}

/// Named files are always discovered; drop the ones an ignore pattern covers.
fn drop_ignored_explicit_files(
    files: &mut Vec<PathBuf>,
    explicit: &[PathBuf],
    ignore: &IgnoreSet,
    working_dir: &Path,
) {
    if ignore.is_empty() {
        return;
    }
    files.retain(|file| {
        if !explicit.iter().any(|path| path == file) {
            return true;
        }
        let relative = file.strip_prefix(working_dir).unwrap_or(file);
        match ignore.matching_pattern(relative) {
            Some(pattern) => {
                warn!(
                    "File ignored because of a matching ignore pattern ({}): {}",
                    pattern,
                    relative.display()
                );
                false
            }
            None => true,
        }
    });
}

fn resolve(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
