//! Project-configured operator bans.
//!
//! Keys of the `operators` option are patterns matched against the whole
//! imported name; a string value is shown as the reason.

use crate::context::{Report, RuleContext};
use crate::rule::{Listeners, Rule, RuleCategory, RuleMeta, RuleOptions};
use crate::schema::{ban_map, OptionField, OptionKind, OptionSchema};
use crate::selector::{compile_regex_safe, Selector, TextMatch};
use crate::Result;
use regex::Regex;
use rxlint_core::{NodeId, NodeKind, NodeType, Role, Severity};

static FIELDS: &[OptionField] = &[OptionField {
    name: "operators",
    kind: OptionKind::BanMap,
    description: "Banned operator names (or patterns) mapped to `true` or a reason.",
}];

static META: RuleMeta = RuleMeta {
    name: "ban-operators",
    description: "Forbids the use of banned operators.",
    category: RuleCategory::Restriction,
    default_severity: Severity::Error,
    requires_type_information: false,
    fixable: false,
    has_suggestions: false,
    messages: &[("forbidden", "RxJS operator is banned: {{name}}{{explanation}}")],
    schema: OptionSchema::new(FIELDS),
};

struct Ban {
    pattern: Regex,
    reason: Option<String>,
}

pub struct BanOperators {
    bans: Vec<Ban>,
    module: TextMatch,
}

impl BanOperators {
    fn check_specifier(&self, _: &mut (), ctx: &mut RuleContext<'_>, specifier: NodeId) -> Result<()> {
        let NodeKind::ImportSpecifier { imported, .. } = ctx.tree().kind(specifier) else {
            return Ok(());
        };
        let Some(ban) = self.bans.iter().find(|ban| ban.pattern.is_match(imported)) else {
            return Ok(());
        };
        let explanation = ban
            .reason
            .as_deref()
            .map(|reason| format!(": {}", reason))
            .unwrap_or_default();
        ctx.report(
            "forbidden",
            specifier,
            Report::new().data("name", imported.as_str()).data("explanation", explanation),
        )
    }
}

impl Rule for BanOperators {
    type State = ();

    fn meta() -> &'static RuleMeta {
        &META
    }

    fn from_options(options: &RuleOptions) -> Result<Self> {
        let bans = ban_map(options, "operators")
            .into_iter()
            .map(|(name, reason)| {
                Ok(Ban {
                    pattern: compile_regex_safe(&format!("^(?:{})$", name))?,
                    reason,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bans,
            module: TextMatch::pattern(r"^rxjs(/operators)?$")?,
        })
    }

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
        if self.bans.is_empty() {
            return Ok(());
        }
        let specifier = Selector::of(NodeType::ImportSpecifier).with_parent(
            Selector::of(NodeType::ImportDeclaration).with_child(
                Role::Source,
                Selector::of(NodeType::StringLiteral).with_text(self.module.clone()),
            ),
        );
        listeners.on(specifier, Self::check_specifier)?;
        Ok(())
    }
}
