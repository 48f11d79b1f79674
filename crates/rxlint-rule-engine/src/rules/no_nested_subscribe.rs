use super::report_nested;
use crate::context::RuleContext;
use crate::nested::{ArgumentRegistry, WatchedCall};
use crate::oracle::Capability;
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::OptionSchema;
use crate::Result;
use rxlint_core::{NodeId, Severity};

static META: RuleMeta = RuleMeta {
    name: "no-nested-subscribe",
    description: "Forbids calling `subscribe` within a `subscribe` callback.",
    category: RuleCategory::Correctness,
    default_severity: Severity::Error,
    requires_type_information: true,
    fixable: false,
    has_suggestions: false,
    messages: &[("forbidden", "Nested subscribe calls are forbidden.")],
    schema: OptionSchema::EMPTY,
};

pub struct NoNestedSubscribe {
    watched: WatchedCall,
}

impl NoNestedSubscribe {
    fn check_call(&self, registry: &mut ArgumentRegistry, ctx: &mut RuleContext<'_>, call: NodeId) -> Result<()> {
        report_nested(&self.watched, registry, ctx, call)
    }
}

impl Rule for NoNestedSubscribe {
    type State = ArgumentRegistry;

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(_options: &RuleOptions) -> Result<Self> {
        Ok(Self {
            watched: WatchedCall::new(
                "subscribe",
                vec![Capability::Observable.into(), Capability::Subscribable.into()],
            ),
        })
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        listeners.on(self.watched.selector(), Self::check_call)?;
        Ok(())
    }
}
