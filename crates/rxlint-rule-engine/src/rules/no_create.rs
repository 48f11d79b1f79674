//! Deprecated `Observable.create(...)`.

use crate::context::{Report, RuleContext};
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::OptionSchema;
use crate::selector::Selector;
use crate::Result;
use rxlint_core::{Fix, NodeId, NodeType, Role, Severity};

static META: RuleMeta = RuleMeta {
    name: "no-create",
    description: "Forbids the calling of `Observable.create`.",
    category: RuleCategory::Style,
    default_severity: Severity::Error,
    requires_type_information: false,
    fixable: false,
    has_suggestions: true,
    messages: &[
        ("forbidden", "Observable.create is forbidden; use new Observable."),
        ("suggestion", "Use new Observable(...) instead."),
    ],
    schema: OptionSchema::EMPTY,
};

pub struct NoCreate;

impl NoCreate {
    fn check_create(&self, _: &mut (), ctx: &mut RuleContext<'_>, create: NodeId) -> Result<()> {
        let tree = ctx.tree();
        let Some(member) = tree.parent(create) else {
            return Ok(());
        };
        let suggestion = Fix::replace(tree.span(member), "new Observable");
        ctx.report("forbidden", create, Report::new().suggest("suggestion", suggestion))
    }
}

impl Rule for NoCreate {
    type State = ();

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(_options: &RuleOptions) -> Result<Self> {
        Ok(Self)
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        let create = Selector::of(NodeType::Identifier)
            .in_role(Role::Property)
            .named("create")
            .with_parent(
                Selector::of(NodeType::MemberExpression)
                    .in_role(Role::Callee)
                    .with_child(Role::Object, Selector::of(NodeType::Identifier).named("Observable"))
                    .with_parent(Selector::of(NodeType::CallExpression)),
            );
        listeners.on(create, Self::check_create)?;
        Ok(())
    }
}
