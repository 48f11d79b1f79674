//! Ignore patterns for rxlint runs.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Patterns rxlint skips unless `--no-ignore` is given.
///
/// Covers installed packages, build output and generated bundles:
/// - Dependencies (node_modules/, bower_components/)
/// - Build outputs (dist/, build/, out/, .next/, .angular/)
/// - Coverage and caches (coverage/, .cache/, .turbo/)
/// - Minified bundles (*.min.js)
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/node_modules/**",
    "**/bower_components/**",
    "**/.git/**",
    "**/.next/**",
    "**/.angular/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/.cache/**",
    "**/coverage/**",
    "**/.turbo/**",
    "**/*.min.js",
];

/// Builder for ignore pattern sets.
pub struct IgnorePatternBuilder {
    patterns: Vec<String>,
    use_defaults: bool,
}

impl IgnorePatternBuilder {
    /// Create a builder with the defaults enabled.
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            use_defaults: true,
        }
    }

    /// Disable [`DEFAULT_IGNORE_PATTERNS`].
    pub fn no_defaults(mut self) -> Self {
        self.use_defaults = false;
        self
    }

    /// Add patterns, rejecting any that is not a valid glob.
    pub fn add_patterns<I>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for pattern in patterns {
            Glob::new(pattern.as_ref())?;
            self.patterns.push(pattern.as_ref().to_string());
        }
        Ok(self)
    }

    /// Build the GlobSet along with the pattern at each index.
    pub fn build(self) -> Result<IgnoreSet> {
        let mut patterns: Vec<String> = Vec::new();
        if self.use_defaults {
            patterns.extend(DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()));
        }
        patterns.extend(self.patterns);

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            builder.add(Glob::new(pattern)?);
        }

        Ok(IgnoreSet {
            set: builder.build()?,
            patterns,
        })
    }
}

impl Default for IgnorePatternBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiled ignore patterns.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    set: GlobSet,
    patterns: Vec<String>,
}

impl IgnoreSet {
    /// Pattern strings, defaults first.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn should_ignore(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }

    /// The first pattern matching `path`, if any.
    pub fn matching_pattern(&self, path: &Path) -> Option<&str> {
        self.set
            .matches(path)
            .into_iter()
            .min()
            .and_then(|idx| self.patterns.get(idx))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let set = IgnorePatternBuilder::new().build().unwrap();

        assert!(set.should_ignore(Path::new("node_modules/rxjs/index.js")));
        assert!(set.should_ignore(Path::new("packages/app/dist/main.js")));
        assert!(set.should_ignore(Path::new("vendor/rx.min.js")));
        assert!(set.should_ignore(Path::new(".angular/cache/x.js")));

        assert!(!set.should_ignore(Path::new("src/app.component.ts")));
        assert!(!set.should_ignore(Path::new("src/distance.ts")));
    }

    #[test]
    fn test_custom_patterns() {
        let set = IgnorePatternBuilder::new()
            .add_patterns(["**/*.spec.ts", "**/generated/**"])
            .unwrap()
            .build()
            .unwrap();

        assert!(set.should_ignore(Path::new("src/app.spec.ts")));
        assert!(set.should_ignore(Path::new("src/generated/api.ts")));
        assert!(!set.should_ignore(Path::new("src/app.ts")));
    }

    #[test]
    fn test_no_defaults() {
        let set = IgnorePatternBuilder::new()
            .no_defaults()
            .add_patterns(["**/*.spec.ts"])
            .unwrap()
            .build()
            .unwrap();

        assert!(!set.should_ignore(Path::new("node_modules/rxjs/index.js")));
        assert!(set.should_ignore(Path::new("app.spec.ts")));
        assert_eq!(set.patterns(), ["**/*.spec.ts"]);
    }

    #[test]
    fn test_empty_set() {
        let set = IgnorePatternBuilder::new().no_defaults().build().unwrap();
        assert!(set.is_empty());
        assert!(!set.should_ignore(Path::new("anything.ts")));
        assert_eq!(set.matching_pattern(Path::new("anything.ts")), None);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(IgnorePatternBuilder::new().add_patterns(["[invalid"]).is_err());
    }

    #[test]
    fn test_matching_pattern_reports_first_match() {
        let set = IgnorePatternBuilder::new()
            .add_patterns(["**/*.js"])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            set.matching_pattern(Path::new("dist/main.js")),
            Some("**/dist/**")
        );
        assert_eq!(set.matching_pattern(Path::new("src/main.js")), Some("**/*.js"));
        assert_eq!(set.matching_pattern(Path::new("src/main.ts")), None);
    }
}
