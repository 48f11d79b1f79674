//! Source file discovery.
//!
//! Walks the paths given on the command line and collects every file with a
//! supported extension, honoring `.gitignore` and extra ignore globs.

use crate::{BackendError, Result};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for file discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// File extensions to consider as source files
    pub extensions: Vec<String>,

    /// Additional ignore patterns beyond .gitignore
    pub ignore_patterns: Vec<String>,

    /// Maximum file size to consider (bytes)
    pub max_file_size: Option<u64>,

    /// Follow symlinks during traversal
    pub follow_symlinks: bool,

    /// Honor .gitignore and .git/info/exclude
    pub respect_gitignore: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: [".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".mts", ".cts"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            ignore_patterns: vec![],
            max_file_size: Some(10 * 1024 * 1024), // 10MB
            follow_symlinks: false,
            respect_gitignore: true,
        }
    }
}

impl DiscoveryConfig {
    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.trim_start_matches('.') == ext))
    }
}

/// Collect source files under `paths`, sorted and de-duplicated.
///
/// Files named explicitly are kept whenever their extension is supported,
/// even if an ignore pattern would skip them during a walk.
pub fn discover_source_files(paths: &[PathBuf], config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let mut discovered = BTreeSet::new();

    for path in paths {
        let metadata = std::fs::metadata(path).map_err(|source| BackendError::Io {
            path: path.clone(),
            source,
        })?;

        if metadata.is_file() {
            if config.has_source_extension(path) {
                discovered.insert(path.clone());
            }
            continue;
        }

        let canonical = path.canonicalize().map_err(|source| BackendError::Io {
            path: path.clone(),
            source,
        })?;
        validate_project_root(&canonical)?;
        walk(path, config, &mut discovered)?;
    }

    debug!(files = discovered.len(), "discovered source files");
    Ok(discovered.into_iter().collect())
}

fn walk(root: &Path, config: &DiscoveryConfig, discovered: &mut BTreeSet<PathBuf>) -> Result<()> {
    let mut walker = WalkBuilder::new(root);
    walker
        .follow_links(config.follow_symlinks)
        .hidden(true)
        .git_ignore(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .require_git(false)
        .max_filesize(config.max_file_size);

    if !config.ignore_patterns.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in &config.ignore_patterns {
            overrides
                .add(&format!("!{}", pattern))
                .map_err(|e| BackendError::Discovery(format!("invalid ignore pattern '{}': {}", pattern, e)))?;
        }
        let overrides = overrides
            .build()
            .map_err(|e| BackendError::Discovery(e.to_string()))?;
        walker.overrides(overrides);
    }

    for entry in walker.build() {
        let entry = entry.map_err(|e| BackendError::Discovery(e.to_string()))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if config.has_source_extension(entry.path()) {
            discovered.insert(entry.into_path());
        }
    }

    Ok(())
}

/// Validates that a directory is safe to scan.
///
/// Refuses the filesystem root and well-known system directories.
pub fn validate_project_root(root: &Path) -> Result<()> {
    if root == Path::new("/") {
        return Err(BackendError::Discovery(
            "Refusing to scan filesystem root".to_string(),
        ));
    }

    #[cfg(unix)]
    {
        let dangerous_paths = ["/bin", "/sbin", "/usr", "/etc", "/var", "/sys", "/proc"];
        for dangerous in &dangerous_paths {
            if root.starts_with(dangerous) {
                return Err(BackendError::Discovery(format!(
                    "Refusing to scan system directory: {}",
                    dangerous
                )));
            }
        }
    }

    #[cfg(windows)]
    {
        let root_str = root.to_string_lossy().to_lowercase();
        if root_str.starts_with("c:\\windows") || root_str.starts_with("c:\\program files") {
            return Err(BackendError::Discovery(
                "Refusing to scan Windows system directory".to_string(),
            ));
        }
    }

    Ok(())
}
