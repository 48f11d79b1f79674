//! Lint engine - dispatches configured rules over one file at a time
//!
//! The engine is built once per run. Building validates every rule's options
//! and selectors and indexes listeners by node type. Linting a file walks its
//! tree once in pre-order and fires, for each node, every matching listener
//! exactly once in registration order.

use crate::built_in::find_rule;
use crate::context::RuleContext;
use crate::oracle::TypeContext;
use crate::rule::{instantiate, DynRule, FilePass, Rule, RuleOptions};
use crate::selector::Selector;
use crate::{Result, RuleError};
use rustc_hash::FxHashMap;
use rxlint_core::{Diagnostic, LineIndex, NodeType, Severity, SyntaxTree};
use serde::Serialize;
use tracing::{debug, warn};

/// One enabled rule as it appears in configuration.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub name: String,
    pub severity: Severity,
    pub options: RuleOptions,
}

/// A rule that returned an error while analyzing a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub rule: String,
    pub message: String,
}

/// Outcome of linting one file.
#[derive(Debug, Default, Serialize)]
pub struct FileReport {
    /// Diagnostics sorted by position.
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<RuleFailure>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

/// A listener reference: (rule index, listener index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ListenerRef {
    rule: usize,
    listener: usize,
}

struct EnabledRule {
    rule: Box<dyn DynRule>,
    severity: Severity,
}

/// The engine executes configured rules against syntax trees
pub struct LintEngine {
    rules: Vec<EnabledRule>,
    selectors: Vec<Vec<Selector>>,
    by_type: FxHashMap<NodeType, Vec<ListenerRef>>,
    wildcard: Vec<ListenerRef>,
}

impl std::fmt::Debug for LintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintEngine")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct LintEngineBuilder {
    rules: Vec<EnabledRule>,
}

impl std::fmt::Debug for LintEngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintEngineBuilder")
            .field(
                "rules",
                &self.rules.iter().map(|enabled| enabled.rule.meta().name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl LintEngineBuilder {
    /// Enable a built-in rule by name.
    pub fn rule(mut self, name: &str, severity: Severity, options: RuleOptions) -> Result<Self> {
        let entry = find_rule(name).ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;
        let rule = entry.create(&options)?;
        self.rules.push(EnabledRule { rule, severity });
        Ok(self)
    }

    /// Enable a rule type that is not part of the built-in catalogue.
    pub fn register<R: Rule>(mut self, severity: Severity, options: RuleOptions) -> Result<Self> {
        let rule = instantiate::<R>(&options)?;
        self.rules.push(EnabledRule { rule, severity });
        Ok(self)
    }

    pub fn build(self) -> LintEngine {
        let mut selectors = Vec::with_capacity(self.rules.len());
        let mut by_type: FxHashMap<NodeType, Vec<ListenerRef>> = FxHashMap::default();
        let mut wildcard = Vec::new();

        for (rule_index, enabled) in self.rules.iter().enumerate() {
            let rule_selectors: Vec<Selector> =
                enabled.rule.selectors().into_iter().cloned().collect();
            for (listener, selector) in rule_selectors.iter().enumerate() {
                let entry = ListenerRef {
                    rule: rule_index,
                    listener,
                };
                match selector.node_type() {
                    Some(node_type) => by_type.entry(node_type).or_default().push(entry),
                    None => wildcard.push(entry),
                }
            }
            selectors.push(rule_selectors);
        }

        LintEngine {
            rules: self.rules,
            selectors,
            by_type,
            wildcard,
        }
    }
}

struct RuleRun<'a, 'r> {
    pass: Box<dyn FilePass + 'r>,
    ctx: RuleContext<'a>,
    failed: bool,
}

impl LintEngine {
    pub fn builder() -> LintEngineBuilder {
        LintEngineBuilder::default()
    }

    /// Build an engine from configured rules, in order.
    pub fn from_config(rules: &[RuleConfig]) -> Result<Self> {
        rules
            .iter()
            .try_fold(Self::builder(), |builder, config| {
                builder.rule(&config.name, config.severity, config.options.clone())
            })
            .map(LintEngineBuilder::build)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|enabled| enabled.rule.meta().name)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Lint one file.
    ///
    /// Errors only when the source cannot be indexed. Rule errors are
    /// isolated: the failing rule stops receiving callbacks for this file,
    /// its diagnostics for the file are dropped and a [`RuleFailure`] is
    /// recorded.
    pub fn lint(&self, tree: &SyntaxTree, source: &str, types: &TypeContext) -> Result<FileReport> {
        let lines = LineIndex::new(source)?;
        let oracle = types.oracle_for(tree);

        if !oracle.has_type_information() {
            for enabled in &self.rules {
                let meta = enabled.rule.meta();
                if meta.requires_type_information {
                    debug!(rule = meta.name, "no type information; rule will not report");
                }
            }
        }

        let mut runs: Vec<RuleRun<'_, '_>> = self
            .rules
            .iter()
            .map(|enabled| RuleRun {
                pass: enabled.rule.start(),
                ctx: RuleContext::new(
                    tree,
                    source,
                    &oracle,
                    &lines,
                    enabled.rule.meta(),
                    enabled.severity,
                ),
                failed: false,
            })
            .collect();

        let mut failures = Vec::new();
        let mut dispatched = 0usize;

        for node in tree.preorder() {
            let typed = self
                .by_type
                .get(&tree.node_type(node))
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            for listener in merge_ordered(typed, &self.wildcard) {
                let run = &mut runs[listener.rule];
                if run.failed {
                    continue;
                }
                if !self.selectors[listener.rule][listener.listener].matches(tree, node) {
                    continue;
                }
                dispatched += 1;
                if let Err(error) = run.pass.dispatch(listener.listener, &mut run.ctx, node) {
                    let rule = run.ctx.meta().name;
                    warn!(rule, node = node.index(), %error, "rule failed; skipping it for this file");
                    run.failed = true;
                    failures.push(RuleFailure {
                        rule: rule.to_string(),
                        message: error.to_string(),
                    });
                }
            }
        }

        let mut diagnostics: Vec<Diagnostic> = runs
            .into_iter()
            .filter(|run| !run.failed)
            .flat_map(|run| run.ctx.into_diagnostics())
            .collect();
        sort_diagnostics(&mut diagnostics);

        debug!(
            nodes = tree.len(),
            dispatched,
            diagnostics = diagnostics.len(),
            failures = failures.len(),
            "file linted"
        );

        Ok(FileReport {
            diagnostics,
            failures,
        })
    }
}

/// Merge two listener lists, each already in registration order.
fn merge_ordered(a: &[ListenerRef], b: &[ListenerRef]) -> Vec<ListenerRef> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] <= b[j] {
            merged.push(a[i]);
            i += 1;
        } else {
            merged.push(b[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

pub(crate) fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (a.span.start, a.span.end, &a.rule, &a.message_id).cmp(&(
            b.span.start,
            b.span.end,
            &b.rule,
            &b.message_id,
        ))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Report;
    use crate::rule::{Listeners, RuleCategory, RuleMeta};
    use crate::schema::OptionSchema;
    use rxlint_core::{NodeId, NodeKind, Role, Span};

    struct Order;

    static ORDER_META: RuleMeta = RuleMeta {
        name: "order",
        description: "",
        category: RuleCategory::Correctness,
        default_severity: Severity::Warn,
        requires_type_information: false,
        fixable: false,
        has_suggestions: false,
        messages: &[("seen", "{{what}}")],
        schema: OptionSchema::EMPTY,
    };

    impl Order {
        fn typed(&self, _: &mut (), ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
            ctx.report("seen", node, Report::new().data("what", "typed"))
        }

        fn any(&self, _: &mut (), ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
            if ctx.tree().node_type(node) == NodeType::Identifier {
                ctx.report("seen", node, Report::new().data("what", "any"))?;
            }
            Ok(())
        }
    }

    impl Rule for Order {
        type State = ();

        fn meta() -> &'static RuleMeta {
            &ORDER_META
        }

        fn from_options(_: &RuleOptions) -> Result<Self> {
            Ok(Order)
        }

        fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
            listeners
                .on(Selector::any(), Self::any)?
                .on(Selector::of(NodeType::Identifier), Self::typed)?;
            Ok(())
        }
    }

    /// Fails on the second identifier it sees, after reporting the first.
    struct Flaky;

    static FLAKY_META: RuleMeta = RuleMeta {
        name: "flaky",
        description: "",
        category: RuleCategory::Correctness,
        default_severity: Severity::Error,
        requires_type_information: false,
        fixable: false,
        has_suggestions: false,
        messages: &[("seen", "seen")],
        schema: OptionSchema::EMPTY,
    };

    impl Flaky {
        fn on_identifier(&self, seen: &mut usize, ctx: &mut RuleContext<'_>, node: NodeId) -> Result<()> {
            *seen += 1;
            if *seen > 1 {
                return Err(RuleError::Failed {
                    rule: "flaky".into(),
                    message: "boom".into(),
                });
            }
            ctx.report("seen", node, Report::new())
        }
    }

    impl Rule for Flaky {
        type State = usize;

        fn meta() -> &'static RuleMeta {
            &FLAKY_META
        }

        fn from_options(_: &RuleOptions) -> Result<Self> {
            Ok(Flaky)
        }

        fn listeners(&self, listeners: &mut Listeners<Self>) -> Result<()> {
            listeners.on(Selector::of(NodeType::Identifier), Self::on_identifier)?;
            Ok(())
        }
    }

    /// `b; a;` with identifiers at 3 and 0.
    fn two_identifiers() -> (SyntaxTree, &'static str) {
        let source = "a; b;";
        let mut tree = SyntaxTree::new(Span::new(0, 5));
        let first = tree.push(tree.root(), Role::Body, NodeKind::ExpressionStatement, Span::new(3, 5));
        tree.push(first, Role::Expression, NodeKind::identifier("b"), Span::new(3, 4));
        let second = tree.push(tree.root(), Role::Body, NodeKind::ExpressionStatement, Span::new(0, 2));
        tree.push(second, Role::Expression, NodeKind::identifier("a"), Span::new(0, 1));
        (tree, source)
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let (tree, source) = two_identifiers();
        let engine = LintEngine::builder()
            .register::<Order>(Severity::Warn, RuleOptions::new())
            .unwrap()
            .build();
        let report = engine.lint(&tree, source, &TypeContext::none()).unwrap();

        let messages: Vec<&str> = report.diagnostics.iter().map(|d| d.message.as_str()).collect();
        // Sorted by position; at equal positions the stable sort keeps
        // registration order.
        assert_eq!(messages, vec!["any", "typed", "any", "typed"]);
        assert_eq!(report.diagnostics[0].span, Span::new(0, 1));
    }

    #[test]
    fn test_failing_rule_is_isolated() {
        let (tree, source) = two_identifiers();
        let engine = LintEngine::builder()
            .register::<Flaky>(Severity::Error, RuleOptions::new())
            .unwrap()
            .register::<Order>(Severity::Warn, RuleOptions::new())
            .unwrap()
            .build();
        let report = engine.lint(&tree, source, &TypeContext::none()).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule, "flaky");
        assert!(report.failures[0].message.contains("boom"));
        assert!(report.diagnostics.iter().all(|d| d.rule == "order"));
        assert_eq!(report.diagnostics.len(), 4);
    }

    #[test]
    fn test_state_is_fresh_per_file() {
        let (tree, source) = two_identifiers();
        let engine = LintEngine::builder()
            .register::<Flaky>(Severity::Error, RuleOptions::new())
            .unwrap()
            .build();
        for _ in 0..2 {
            let report = engine.lint(&tree, source, &TypeContext::none()).unwrap();
            assert_eq!(report.failures.len(), 1);
        }
    }

    #[test]
    fn test_unknown_rule_is_rejected() {
        let err = LintEngine::builder()
            .rule("no-such-rule", Severity::Error, RuleOptions::new())
            .unwrap_err();
        assert!(matches!(err, RuleError::UnknownRule(_)));
    }

    #[test]
    fn test_from_config_keeps_order() {
        let configs = vec![
            RuleConfig {
                name: "no-internal".into(),
                severity: Severity::Error,
                options: RuleOptions::new(),
            },
            RuleConfig {
                name: "no-create".into(),
                severity: Severity::Warn,
                options: RuleOptions::new(),
            },
        ];
        let engine = LintEngine::from_config(&configs).unwrap();
        assert_eq!(engine.rule_names().collect::<Vec<_>>(), vec!["no-internal", "no-create"]);
    }

    #[test]
    fn test_merge_ordered() {
        let r = |rule, listener| ListenerRef { rule, listener };
        let merged = merge_ordered(&[r(0, 1), r(2, 0)], &[r(0, 0), r(1, 0)]);
        assert_eq!(merged, vec![r(0, 0), r(0, 1), r(1, 0), r(2, 0)]);
    }
}
