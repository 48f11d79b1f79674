use super::call_receiver;
use crate::context::{Report, RuleContext};
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::OptionSchema;
use crate::selector::method_call;
use crate::Result;
use rxlint_core::{NodeId, Severity};

static META: RuleMeta = RuleMeta {
    name: "no-ignored-subscribe",
    description: "Forbids calling `subscribe` without any arguments.",
    category: RuleCategory::Suspicious,
    default_severity: Severity::Warn,
    requires_type_information: true,
    fixable: false,
    has_suggestions: false,
    messages: &[("forbidden", "Calling subscribe without arguments is forbidden.")],
    schema: OptionSchema::EMPTY,
};

pub struct NoIgnoredSubscribe;

impl NoIgnoredSubscribe {
    fn check_call(&self, _: &mut (), ctx: &mut RuleContext<'_>, call: NodeId) -> Result<()> {
        let tree = ctx.tree();
        if tree.arguments(call).next().is_some() {
            return Ok(());
        }
        let Some(receiver) = call_receiver(tree, call) else {
            return Ok(());
        };
        if !ctx.oracle().could_be_observable(receiver).is_yes() {
            return Ok(());
        }
        match tree.callee(call).and_then(|callee| tree.member_parts(callee)) {
            Some((_, property)) => ctx.report("forbidden", property, Report::new()),
            None => Ok(()),
        }
    }
}

impl Rule for NoIgnoredSubscribe {
    type State = ();

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(_options: &RuleOptions) -> Result<Self> {
        Ok(Self)
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        listeners.on(method_call("subscribe"), Self::check_call)?;
        Ok(())
    }
}
