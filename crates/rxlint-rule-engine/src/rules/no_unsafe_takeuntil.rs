//! Operators placed after `takeUntil` in a `pipe`.
//!
//! An operator that subscribes to another source after `takeUntil` can keep
//! the subscription alive once the notifier fires. Walking the `pipe`
//! arguments from the end, the first `takeUntil` is unsafe if any operator
//! after it is not on the allow list.

use super::call_receiver;
use crate::context::{Report, RuleContext};
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::{string_list, OptionField, OptionKind, OptionSchema};
use crate::selector::{method_call, Selector, TextMatch};
use crate::Result;
use rxlint_core::{NodeId, NodeKind, NodeType, Role, Severity, SyntaxTree};

/// Operators that are safe to place after `takeUntil`.
pub const DEFAULT_ALLOW: &[&str] = &[
    "count",
    "defaultIfEmpty",
    "endWith",
    "every",
    "finalize",
    "finally",
    "isEmpty",
    "last",
    "max",
    "min",
    "publish",
    "publishBehavior",
    "publishLast",
    "publishReplay",
    "reduce",
    "share",
    "shareReplay",
    "skipLast",
    "takeLast",
    "throwIfEmpty",
    "toArray",
];

static FIELDS: &[OptionField] = &[
    OptionField {
        name: "alias",
        kind: OptionKind::StringList,
        description: "Other operator names to treat like `takeUntil`.",
    },
    OptionField {
        name: "allow",
        kind: OptionKind::StringList,
        description: "Operators allowed after `takeUntil`. Replaces the default list.",
    },
];

static META: RuleMeta = RuleMeta {
    name: "no-unsafe-takeuntil",
    description: "Forbids the application of operators after `takeUntil`.",
    category: RuleCategory::Correctness,
    default_severity: Severity::Error,
    requires_type_information: true,
    fixable: false,
    has_suggestions: false,
    messages: &[("forbidden", "Applying operators after takeUntil is forbidden.")],
    schema: OptionSchema::new(FIELDS),
};

pub struct NoUnsafeTakeuntil {
    checked: Vec<String>,
    allow: Vec<String>,
}

impl NoUnsafeTakeuntil {
    fn operator_name<'t>(tree: &'t SyntaxTree, argument: NodeId) -> Option<&'t str> {
        if !matches!(tree.kind(argument), NodeKind::CallExpression { .. }) {
            return None;
        }
        tree.callee(argument).and_then(|callee| tree.identifier_name(callee))
    }

    fn check_operator(&self, _: &mut (), ctx: &mut RuleContext<'_>, operator: NodeId) -> Result<()> {
        let tree = ctx.tree();
        let Some(pipe) = tree.parent(operator) else {
            return Ok(());
        };
        let Some(receiver) = call_receiver(tree, pipe) else {
            return Ok(());
        };
        if !ctx.oracle().could_be_observable(receiver).is_yes() {
            return Ok(());
        }

        // Scan from the last operator back to this one.
        let arguments: Vec<NodeId> = tree.arguments(pipe).collect();
        let mut disallowed = false;
        for argument in arguments.into_iter().rev() {
            if argument == operator {
                if disallowed {
                    if let Some(callee) = tree.callee(operator) {
                        ctx.report("forbidden", callee, Report::new())?;
                    }
                }
                break;
            }
            match Self::operator_name(tree, argument) {
                Some(name) if self.allow.iter().any(|allowed| allowed == name) => {}
                _ => disallowed = true,
            }
        }
        Ok(())
    }
}

impl Rule for NoUnsafeTakeuntil {
    type State = ();

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(options: &RuleOptions) -> Result<Self> {
        let mut checked = vec!["takeUntil".to_string()];
        checked.extend(string_list(options, "alias"));

        let allow = if options.contains_key("allow") {
            string_list(options, "allow")
        } else {
            DEFAULT_ALLOW.iter().map(|name| name.to_string()).collect()
        };

        Ok(Self { checked, allow })
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        let operator = Selector::of(NodeType::CallExpression)
            .in_role(Role::Argument)
            .with_child(
                Role::Callee,
                Selector::of(NodeType::Identifier).with_text(TextMatch::one_of(self.checked.clone())),
            )
            .with_parent(method_call("pipe"));
        listeners.on(operator, Self::check_operator)?;
        Ok(())
    }
}
