//! Applying fixes to source text

use crate::Result;
use rxlint_core::{Diagnostic, Fix};

/// Result of applying a batch of fixes to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub output: String,
    pub applied: usize,
    /// Fixes dropped because they overlapped an earlier one.
    pub skipped: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Apply non-overlapping fixes in position order.
///
/// Fixes are sorted by start offset; a fix that overlaps one already accepted
/// is skipped and counted. Two insertions at the same offset are treated as
/// overlapping. A fix whose span does not fit `source` is an error.
pub fn apply_fixes<'f, I>(source: &str, fixes: I) -> Result<FixOutcome>
where
    I: IntoIterator<Item = &'f Fix>,
{
    let mut fixes: Vec<&Fix> = fixes.into_iter().collect();
    fixes.sort_by_key(|fix| (fix.span.start, fix.span.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0usize;
    let mut last: Option<(u32, u32)> = None;
    let (mut applied, mut skipped) = (0, 0);

    for fix in fixes {
        // Validates bounds and char boundaries.
        fix.span.source_text(source)?;

        if let Some((last_start, last_end)) = last {
            let collides = fix.span.start < last_end
                || (fix.span.start == last_start && fix.span.start == last_end);
            if collides {
                skipped += 1;
                continue;
            }
        }

        output.push_str(&source[cursor..fix.span.start as usize]);
        output.push_str(&fix.replacement);
        cursor = fix.span.end as usize;
        last = Some((fix.span.start, fix.span.end));
        applied += 1;
    }
    output.push_str(&source[cursor..]);

    Ok(FixOutcome {
        output,
        applied,
        skipped,
    })
}

/// Primary fixes of `diagnostics`. Suggestions are never included.
pub fn primary_fixes(diagnostics: &[Diagnostic]) -> impl Iterator<Item = &Fix> {
    diagnostics.iter().filter_map(|d| d.fix.as_ref())
}
