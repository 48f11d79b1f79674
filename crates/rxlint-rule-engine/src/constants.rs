//! Limits applied while compiling selectors and inferring types
//!
//! Selector patterns come from rule code and from user options (for example
//! operator aliases), so regex compilation is bounded the same way for both.

/// Maximum regex pattern length (500 characters)
pub const MAX_REGEX_LENGTH: usize = 500;

/// Compiled regex size limit (10MB)
pub const REGEX_SIZE_LIMIT: usize = 10_000_000; // 10MB

/// Regex DFA size limit (2MB)
pub const REGEX_DFA_SIZE_LIMIT: usize = 2_000_000; // 2MB

/// Maximum number of declaration hops followed while inferring a type
///
/// `const b = a.pipe(); const c = b.pipe(); ...` chains are followed up to
/// this depth; cycles such as `const a = a.pipe()` stop here as well.
pub const MAX_INFERENCE_DEPTH: usize = 32;

/// Maximum length of a `class X extends Y` chain that is resolved
pub const MAX_CLASS_CHAIN: usize = 16;
