//! Reading `.value` or calling `.getValue()` on a BehaviorSubject.

use crate::context::{Report, RuleContext};
use crate::oracle::{Capability, TypePredicate};
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::OptionSchema;
use crate::selector::{Selector, TextMatch};
use crate::Result;
use rxlint_core::{NodeId, NodeType, Role, Severity};

static META: RuleMeta = RuleMeta {
    name: "no-subject-value",
    description: "Forbids accessing the `value` of a BehaviorSubject.",
    category: RuleCategory::Restriction,
    default_severity: Severity::Error,
    requires_type_information: true,
    fixable: false,
    has_suggestions: false,
    messages: &[(
        "forbidden",
        "Accessing the value property of a BehaviorSubject is forbidden.",
    )],
    schema: OptionSchema::EMPTY,
};

pub struct NoSubjectValue {
    receiver: TypePredicate,
}

impl NoSubjectValue {
    fn check_property(&self, _: &mut (), ctx: &mut RuleContext<'_>, property: NodeId) -> Result<()> {
        let tree = ctx.tree();
        let Some((object, _)) = tree.parent(property).and_then(|member| tree.member_parts(member)) else {
            return Ok(());
        };
        if ctx.oracle().could_be(object, &self.receiver).is_yes() {
            ctx.report("forbidden", property, Report::new())?;
        }
        Ok(())
    }
}

impl Rule for NoSubjectValue {
    type State = ();

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(_options: &RuleOptions) -> Result<Self> {
        Ok(Self {
            receiver: Capability::BehaviorSubject.into(),
        })
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        let property = Selector::of(NodeType::Identifier)
            .in_role(Role::Property)
            .with_text(TextMatch::one_of(["value", "getValue"]))
            .with_parent(Selector::of(NodeType::MemberExpression));
        listeners.on(property, Self::check_property)?;
        Ok(())
    }
}
