//! Built-in rule catalogue
//!
//! Every rule shipped with rxlint is listed here once. The engine resolves
//! rule names from configuration against this table.

use crate::rule::{instantiate, DynRule, Rule, RuleMeta, RuleOptions};
use crate::rules::{
    BanOperators, NoAsyncSubscribe, NoCreate, NoIgnoredSubscribe, NoInternal, NoNestedPipe,
    NoNestedSubscribe, NoSubjectValue, NoUnsafeTakeuntil,
};
use crate::Result;

/// A catalogue entry: rule metadata plus a constructor.
#[derive(Clone, Copy)]
pub struct RuleEntry {
    meta: fn() -> &'static RuleMeta,
    create: fn(&RuleOptions) -> Result<Box<dyn DynRule>>,
}

impl RuleEntry {
    const fn of<R: Rule>() -> Self {
        Self {
            meta: R::meta,
            create: instantiate::<R>,
        }
    }

    pub fn meta(&self) -> &'static RuleMeta {
        (self.meta)()
    }

    pub fn name(&self) -> &'static str {
        self.meta().name
    }

    /// Validate options and build the rule.
    pub fn create(&self, options: &RuleOptions) -> Result<Box<dyn DynRule>> {
        (self.create)(options)
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RuleEntry").field(&self.name()).finish()
    }
}

static BUILT_IN: &[RuleEntry] = &[
    RuleEntry::of::<NoNestedSubscribe>(),
    RuleEntry::of::<NoNestedPipe>(),
    RuleEntry::of::<NoSubjectValue>(),
    RuleEntry::of::<NoIgnoredSubscribe>(),
    RuleEntry::of::<NoAsyncSubscribe>(),
    RuleEntry::of::<NoUnsafeTakeuntil>(),
    RuleEntry::of::<NoInternal>(),
    RuleEntry::of::<NoCreate>(),
    RuleEntry::of::<BanOperators>(),
];

/// All built-in rules, in catalogue order.
///
/// # Example
///
/// ```
/// use rxlint_rule_engine::built_in_rules;
///
/// let names: Vec<_> = built_in_rules().iter().map(|entry| entry.name()).collect();
/// assert!(names.contains(&"no-nested-subscribe"));
/// ```
pub fn built_in_rules() -> &'static [RuleEntry] {
    BUILT_IN
}

pub fn find_rule(name: &str) -> Option<&'static RuleEntry> {
    BUILT_IN.iter().find(|entry| entry.name() == name)
}
