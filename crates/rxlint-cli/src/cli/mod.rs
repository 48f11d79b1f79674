//! Lint command implementation.

pub mod lint;
pub mod rules;
