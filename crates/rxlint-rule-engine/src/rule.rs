//! Rule trait and listener registration
//!
//! A rule is a plain struct built from its options. It registers
//! `(selector, handler)` pairs once; the engine then calls the handlers for
//! every matching node of every file, threading a fresh `State` value through
//! the calls of one file.

use crate::context::RuleContext;
use crate::schema::OptionSchema;
use crate::selector::Selector;
use crate::Result;
use rxlint_core::{NodeId, Severity};

/// Options of one rule: a JSON object validated against its [`OptionSchema`].
pub type RuleOptions = serde_json::Map<String, serde_json::Value>;

/// Rule category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Code that is likely to be incorrect
    Correctness,
    /// Usages that hide bugs or leak resources
    Suspicious,
    /// Project-specific restrictions, configured through options
    Restriction,
    /// Deprecated or non-idiomatic usage
    Style,
}

/// Static description of a rule.
#[derive(Debug)]
pub struct RuleMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub default_severity: Severity,
    /// Whether the rule only reports when type information is available.
    pub requires_type_information: bool,
    pub fixable: bool,
    pub has_suggestions: bool,
    /// Message catalogue: `(message_id, template)`. Templates may contain
    /// `{{name}}` placeholders.
    pub messages: &'static [(&'static str, &'static str)],
    pub schema: OptionSchema,
}

impl RuleMeta {
    pub fn message(&self, message_id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }
}

/// Callback fired for a node matching a registered selector.
pub type Handler<R> =
    fn(&R, &mut <R as Rule>::State, &mut RuleContext<'_>, NodeId) -> Result<()>;

pub trait Rule: Sized + Send + Sync + 'static {
    /// Per-file state, created fresh for every file.
    type State: Default + 'static;

    fn meta() -> &'static RuleMeta;

    /// Build the rule from options already validated against
    /// [`RuleMeta::schema`].
    fn from_options(options: &RuleOptions) -> Result<Self>;

    fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()>;
}

/// Listener table of one rule, in registration order.
pub struct Listeners<R: Rule> {
    entries: Vec<(Selector, Handler<R>)>,
}

impl<R: Rule> Default for Listeners<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R: Rule> Listeners<R> {
    /// Register `handler` for nodes matching `selector`. Malformed selectors
    /// are rejected here rather than at dispatch time.
    pub fn on(&mut self, selector: Selector, handler: Handler<R>) -> Result<&mut Self> {
        selector.validate()?;
        self.entries.push((selector, handler));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Object-safe view of a configured [`Rule`], as held by the engine.
pub trait DynRule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;

    /// Selectors in registration order. Listener indices passed to
    /// [`FilePass::dispatch`] refer to positions in this slice.
    fn selectors(&self) -> Vec<&Selector>;

    /// Start a pass over one file with fresh state.
    fn start(&self) -> Box<dyn FilePass + '_>;
}

/// A rule's pass over a single file.
pub trait FilePass {
    fn dispatch(&mut self, listener: usize, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()>;
}

/// A rule together with its registered listeners.
pub(crate) struct Registered<R: Rule> {
    rule: R,
    listeners: Listeners<R>,
}

impl<R: Rule> Registered<R> {
    pub(crate) fn new(rule: R) -> Result<Self> {
        let mut listeners = Listeners::default();
        rule.listeners(&mut listeners)?;
        Ok(Self { rule, listeners })
    }
}

struct Pass<'r, R: Rule> {
    registered: &'r Registered<R>,
    state: R::State,
}

impl<R: Rule> FilePass for Pass<'_, R> {
    fn dispatch(&mut self, listener: usize, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
        match self.registered.listeners.entries.get(listener) {
            Some((_, handler)) => handler(&self.registered.rule, &mut self.state, ctx, node),
            None => Ok(()),
        }
    }
}

impl<R: Rule> DynRule for Registered<R> {
    fn meta(&self) -> &'static RuleMeta {
        R::meta()
    }

    fn selectors(&self) -> Vec<&Selector> {
        self.listeners
            .entries
            .iter()
            .map(|(selector, _)| selector)
            .collect()
    }

    fn start(&self) -> Box<dyn FilePass + '_> {
        Box::new(Pass {
            registered: self,
            state: R::State::default(),
        })
    }
}

/// Validate `options` against `R`'s schema, build the rule and register its
/// listeners.
pub fn instantiate<R: Rule>(options: &RuleOptions) -> Result<Box<dyn DynRule>> {
    let meta = R::meta();
    meta.schema.validate(meta.name, options)?;
    let rule = R::from_options(options)?;
    Ok(Box::new(Registered::new(rule)?))
}
