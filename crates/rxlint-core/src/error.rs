//! Error types for rxlint core.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or querying syntax trees.
#[derive(Debug, Error)]
pub enum Error {
    /// A span does not fit inside the source text it refers to.
    #[error("Span {start}..{end} is outside the source text (length {len})")]
    SpanOutOfBounds {
        /// Start offset of the offending span.
        start: u32,
        /// End offset of the offending span.
        end: u32,
        /// Length of the source text in bytes.
        len: usize,
    },

    /// A span does not start and end on UTF-8 character boundaries.
    #[error("Span {start}..{end} does not fall on character boundaries")]
    SpanNotOnCharBoundary {
        /// Start offset of the offending span.
        start: u32,
        /// End offset of the offending span.
        end: u32,
    },

    /// The source file is too large to be addressed with 32-bit offsets.
    #[error("Source text of {len} bytes exceeds the maximum of {max} bytes")]
    SourceTooLarge {
        /// Length of the source text in bytes.
        len: usize,
        /// Largest supported length.
        max: usize,
    },
}
