//! Async functions passed to `subscribe`.
//!
//! Errors thrown after the first `await` never reach the observable's error
//! handling. The finding is reported on the `async` keyword.

use super::call_receiver;
use crate::context::{Report, RuleContext};
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::OptionSchema;
use crate::selector::{method_call, Selector};
use crate::Result;
use rxlint_core::{NodeId, NodeType, Role, Severity, Span};

static META: RuleMeta = RuleMeta {
    name: "no-async-subscribe",
    description: "Forbids passing async functions to `subscribe`.",
    category: RuleCategory::Suspicious,
    default_severity: Severity::Error,
    requires_type_information: true,
    fixable: false,
    has_suggestions: false,
    messages: &[("forbidden", "Passing async functions to subscribe is forbidden.")],
    schema: OptionSchema::EMPTY,
};

const ASYNC: &str = "async";

pub struct NoAsyncSubscribe;

impl NoAsyncSubscribe {
    fn check_function(&self, _: &mut (), ctx: &mut RuleContext<'_>, function: NodeId) -> Result<()> {
        let tree = ctx.tree();
        if !tree.kind(function).is_async_function() {
            return Ok(());
        }
        let Some(call) = tree.parent(function) else {
            return Ok(());
        };
        let Some(receiver) = call_receiver(tree, call) else {
            return Ok(());
        };
        if !ctx.oracle().could_be_observable(receiver).is_yes() {
            return Ok(());
        }

        let span = tree.span(function);
        let keyword = Span::new(span.start, span.start + ASYNC.len() as u32);
        let target = match keyword.source_text(ctx.source()) {
            Ok(ASYNC) => keyword,
            _ => span,
        };
        ctx.report_span("forbidden", target, Report::new())
    }
}

impl Rule for NoAsyncSubscribe {
    type State = ();

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(_options: &RuleOptions) -> Result<Self> {
        Ok(Self)
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        for function in [NodeType::ArrowFunctionExpression, NodeType::FunctionExpression] {
            let selector = Selector::of(function)
                .in_role(Role::Argument)
                .with_parent(method_call("subscribe"));
            listeners.on(selector, Self::check_function)?;
        }
        Ok(())
    }
}
