//! Byte spans and line/column mapping.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Half-open byte range `start..end` into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    pub const fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two spans share at least one byte.
    pub const fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice `source` by this span.
    pub fn source_text<'s>(&self, source: &'s str) -> Result<&'s str> {
        let (start, end) = (self.start as usize, self.end as usize);
        if start > end || end > source.len() {
            return Err(Error::SpanOutOfBounds {
                start: self.start,
                end: self.end,
                len: source.len(),
            });
        }
        source.get(start..end).ok_or(Error::SpanNotOnCharBoundary {
            start: self.start,
            end: self.end,
        })
    }
}

/// 1-based line/column range of a span.
///
/// Columns count characters, not bytes. `end_column` points one past the
/// last character, matching how editors and the fixture annotations count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

/// Maps byte offsets of one source file to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset at which every line starts. Always begins with 0.
    line_starts: Vec<u32>,
    text: String,
}

impl LineIndex {
    /// Largest source length addressable by [`Span`].
    pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

    pub fn new(source: &str) -> Result<Self> {
        if source.len() > Self::MAX_SOURCE_LEN {
            return Err(Error::SourceTooLarge {
                len: source.len(),
                max: Self::MAX_SOURCE_LEN,
            });
        }

        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );

        Ok(Self {
            line_starts,
            text: source.to_string(),
        })
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based (line, column) of a byte offset. Offsets past the end clamp
    /// to the end of the text.
    pub fn position(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.text.len() as u32);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line] as usize;
        let column = self
            .text
            .get(line_start..offset as usize)
            .map_or(offset as usize - line_start, |prefix| prefix.chars().count());

        (line as u32 + 1, column as u32 + 1)
    }

    pub fn location(&self, span: Span) -> Location {
        let (line, column) = self.position(span.start);
        let (end_line, end_column) = self.position(span.end);
        Location {
            line,
            column,
            end_line,
            end_column,
        }
    }
}
