//! Imports from `rxjs/internal/...`.
//!
//! Internal paths are not part of the public API and move between releases.
//! Where a public module exports the same thing the finding carries a fix
//! that rewrites the path; otherwise it is reported without one.

use crate::context::{Report, RuleContext};
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::OptionSchema;
use crate::selector::{Selector, TextMatch};
use crate::Result;
use rxlint_core::{Fix, NodeId, NodeType, Role, Severity};

static META: RuleMeta = RuleMeta {
    name: "no-internal",
    description: "Forbids importing internal modules.",
    category: RuleCategory::Correctness,
    default_severity: Severity::Error,
    requires_type_information: false,
    fixable: true,
    has_suggestions: false,
    messages: &[("forbidden", "Importing from internal modules is forbidden.")],
    schema: OptionSchema::EMPTY,
};

/// Internal path prefixes and the public module re-exporting them. Checked
/// in order, so longer prefixes come first.
const PUBLIC_PATHS: &[(&str, &str)] = &[
    ("rxjs/internal/ajax", "rxjs/ajax"),
    ("rxjs/internal/observable/dom/ajax", "rxjs/ajax"),
    ("rxjs/internal/observable/dom/fetch", "rxjs/fetch"),
    ("rxjs/internal/observable/dom/webSocket", "rxjs/webSocket"),
    ("rxjs/internal/observable/dom/WebSocketSubject", "rxjs/webSocket"),
    ("rxjs/internal/observable", "rxjs"),
    ("rxjs/internal/operators", "rxjs/operators"),
    ("rxjs/internal/scheduled", "rxjs"),
    ("rxjs/internal/scheduler", "rxjs"),
    ("rxjs/internal/testing", "rxjs/testing"),
];

/// Whether `path` is `prefix` or lies below it.
fn within(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Public module for an internal import path, if there is one.
pub fn public_path(internal: &str) -> Option<&'static str> {
    PUBLIC_PATHS
        .iter()
        .find(|(prefix, _)| within(internal, prefix))
        .map(|(_, public)| *public)
}

pub struct NoInternal {
    internal: TextMatch,
}

impl NoInternal {
    fn check_source(&self, _: &mut (), ctx: &mut RuleContext<'_>, source: NodeId) -> Result<()> {
        let tree = ctx.tree();
        let Some(path) = tree.text(source) else {
            return Ok(());
        };

        // Keep the original quote character.
        let fix = match (public_path(path), ctx.text_of(source)?.chars().next()) {
            (Some(public), Some(quote @ ('"' | '\''))) => Some(Fix::replace(
                tree.span(source),
                format!("{quote}{public}{quote}"),
            )),
            _ => None,
        };
        ctx.report("forbidden", source, Report::new().maybe_fix(fix))
    }
}

impl Rule for NoInternal {
    type State = ();

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(_options: &RuleOptions) -> Result<Self> {
        Ok(Self {
            internal: TextMatch::pattern(r"^rxjs/internal(/|$)")?,
        })
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        let source = Selector::of(NodeType::StringLiteral)
            .in_role(Role::Source)
            .with_text(self.internal.clone())
            .with_parent(Selector::of(NodeType::ImportDeclaration));
        listeners.on(source, Self::check_source)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_path_mapping() {
        assert_eq!(public_path("rxjs/internal/operators/map"), Some("rxjs/operators"));
        assert_eq!(public_path("rxjs/internal/observable/of"), Some("rxjs"));
        assert_eq!(public_path("rxjs/internal/observable/dom/fetch"), Some("rxjs/fetch"));
        assert_eq!(public_path("rxjs/internal/testing/TestScheduler"), Some("rxjs/testing"));
        assert_eq!(public_path("rxjs/internal/util/pipe"), None);
    }

    #[test]
    fn test_public_path_matches_whole_segments() {
        assert_eq!(public_path("rxjs/internal/operators"), Some("rxjs/operators"));
        assert_eq!(public_path("rxjs/internal/operatorsX"), None);
        assert_eq!(public_path("rxjs/internal/operatorsX/map"), None);
        assert_eq!(public_path("rxjs/internal/observable/domino"), Some("rxjs"));
        assert_eq!(public_path("rxjs/internal/ajaxy/ajax"), None);
    }
}
