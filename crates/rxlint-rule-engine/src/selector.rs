//! Typed node selectors
//!
//! A [`Selector`] is a composable predicate over a node: its [`NodeType`], the
//! [`Role`] it occupies in its parent, its text (identifier name or literal
//! value), selectors over its direct children in named roles, and a selector
//! over its direct parent. Matching never looks further than one level up or
//! down per nested selector, so the cost of a match is bounded by the
//! selector's size, not by the depth of the tree.
//!
//! ```
//! use rxlint_core::{NodeType, Role};
//! use rxlint_rule_engine::Selector;
//!
//! // receiver.subscribe(...)
//! let selector = Selector::of(NodeType::CallExpression).with_child(
//!     Role::Callee,
//!     Selector::of(NodeType::MemberExpression)
//!         .with_child(Role::Property, Selector::of(NodeType::Identifier).named("subscribe")),
//! );
//! assert!(selector.validate().is_ok());
//! ```

use crate::constants::{MAX_REGEX_LENGTH, REGEX_DFA_SIZE_LIMIT, REGEX_SIZE_LIMIT};
use crate::{Result, RuleError};
use regex::{Regex, RegexBuilder};
use rxlint_core::{NodeId, NodeType, Role, SyntaxTree};

/// Compile a regex with size limits
///
/// Patterns longer than [`MAX_REGEX_LENGTH`] are rejected outright; the
/// compiled program and DFA are capped so that pathological patterns fail at
/// rule construction instead of during a lint pass.
pub fn compile_regex_safe(pattern: &str) -> Result<Regex> {
    if pattern.len() > MAX_REGEX_LENGTH {
        return Err(RuleError::InvalidPattern(format!(
            "Pattern exceeds maximum length of {} characters",
            MAX_REGEX_LENGTH
        )));
    }

    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| RuleError::InvalidPattern(e.to_string()))
}

/// Test applied to a node's text.
#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    OneOf(Vec<String>),
    Pattern(Regex),
}

impl TextMatch {
    /// Compile a regex text test.
    pub fn pattern(pattern: &str) -> Result<Self> {
        compile_regex_safe(pattern).map(TextMatch::Pattern)
    }

    pub fn one_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextMatch::OneOf(names.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => expected == text,
            TextMatch::OneOf(names) => names.iter().any(|name| name == text),
            TextMatch::Pattern(regex) => regex.is_match(text),
        }
    }
}

/// Declarative node-shape predicate.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    node_type: Option<NodeType>,
    role: Option<Role>,
    text: Option<TextMatch>,
    children: Vec<(Role, Selector)>,
    parent: Option<Box<Selector>>,
}

impl Selector {
    /// Match nodes of one type.
    pub fn of(node_type: NodeType) -> Self {
        Self {
            node_type: Some(node_type),
            ..Self::default()
        }
    }

    /// Match nodes of any type. Further constraints are still applied.
    pub fn any() -> Self {
        Self::default()
    }

    /// Require the node to occupy `role` in its parent.
    pub fn in_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Require the node's text to equal `text`.
    pub fn named(self, text: impl Into<String>) -> Self {
        self.with_text(TextMatch::Exact(text.into()))
    }

    pub fn with_text(mut self, text: TextMatch) -> Self {
        self.text = Some(text);
        self
    }

    /// Require at least one child in `role` to match `selector`.
    pub fn with_child(mut self, role: Role, selector: Selector) -> Self {
        self.children.push((role, selector));
        self
    }

    /// Require the direct parent to match `selector`.
    pub fn with_parent(mut self, selector: Selector) -> Self {
        self.parent = Some(Box::new(selector));
        self
    }

    /// The node type this selector is restricted to, if any.
    pub fn node_type(&self) -> Option<NodeType> {
        self.node_type
    }

    /// Reject selectors that can never match.
    pub fn validate(&self) -> Result<()> {
        if let (Some(node_type), Some(_)) = (self.node_type, &self.text) {
            if !node_type.has_text() {
                return Err(RuleError::InvalidSelector(format!(
                    "{:?} nodes carry no text to compare against",
                    node_type
                )));
            }
        }

        if self.node_type == Some(NodeType::Program) {
            if self.parent.is_some() {
                return Err(RuleError::InvalidSelector(
                    "Program nodes have no parent".to_string(),
                ));
            }
            if matches!(self.role, Some(role) if role != Role::Root) {
                return Err(RuleError::InvalidSelector(
                    "Program nodes only occupy the root role".to_string(),
                ));
            }
        }

        if self.role == Some(Role::Root) && self.parent.is_some() {
            return Err(RuleError::InvalidSelector(
                "Root nodes have no parent".to_string(),
            ));
        }

        for (role, child) in &self.children {
            if *role == Role::Root {
                return Err(RuleError::InvalidSelector(
                    "Children never occupy the root role".to_string(),
                ));
            }
            child.validate()?;
        }

        if let Some(parent) = &self.parent {
            parent.validate()?;
        }

        Ok(())
    }

    pub fn matches(&self, tree: &SyntaxTree, node: NodeId) -> bool {
        if let Some(node_type) = self.node_type {
            if tree.node_type(node) != node_type {
                return false;
            }
        }

        if let Some(role) = self.role {
            if tree.role(node) != role {
                return false;
            }
        }

        if let Some(text) = &self.text {
            match tree.text(node) {
                Some(actual) if text.matches(actual) => {}
                _ => return false,
            }
        }

        let children_match = self.children.iter().all(|(role, selector)| {
            tree.children_in(node, *role)
                .any(|child| selector.matches(tree, child))
        });
        if !children_match {
            return false;
        }

        match &self.parent {
            Some(parent) => tree
                .parent(node)
                .is_some_and(|p| parent.matches(tree, p)),
            None => true,
        }
    }
}

/// `receiver.method(...)`: a call whose callee is a non-computed member
/// access named `method`.
pub fn method_call(method: &str) -> Selector {
    Selector::of(NodeType::CallExpression).with_child(Role::Callee, member_named(method))
}

/// `receiver.name`, non-computed.
pub fn member_named(name: &str) -> Selector {
    Selector::of(NodeType::MemberExpression)
        .with_child(Role::Property, Selector::of(NodeType::Identifier).named(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxlint_core::{NodeKind, Span};

    /// `import { map } from "rxjs/operators"; a.pipe(map(x => x));`
    fn sample() -> (SyntaxTree, NodeId, NodeId, NodeId) {
        let mut tree = SyntaxTree::new(Span::new(0, 60));
        let import = tree.push(tree.root(), Role::Body, NodeKind::ImportDeclaration, Span::new(0, 37));
        let specifier = tree.push(
            import,
            Role::Specifier,
            NodeKind::ImportSpecifier {
                imported: "map".to_string(),
                local: "map".to_string(),
            },
            Span::new(9, 12),
        );
        tree.push(import, Role::Source, NodeKind::string("rxjs/operators"), Span::new(20, 36));
        let stmt = tree.push(tree.root(), Role::Body, NodeKind::ExpressionStatement, Span::new(38, 60));
        let call = tree.push(stmt, Role::Expression, NodeKind::CallExpression { optional: false }, Span::new(38, 59));
        let member = tree.push(call, Role::Callee, NodeKind::member(), Span::new(38, 44));
        tree.push(member, Role::Object, NodeKind::identifier("a"), Span::new(38, 39));
        let property = tree.push(member, Role::Property, NodeKind::identifier("pipe"), Span::new(40, 44));
        (tree, specifier, call, property)
    }

    #[test]
    fn test_method_call_matches_callee_shape() {
        let (tree, _, call, _) = sample();
        assert!(method_call("pipe").matches(&tree, call));
        assert!(!method_call("subscribe").matches(&tree, call));
    }

    #[test]
    fn test_role_and_parent_constraints() {
        let (tree, _, call, property) = sample();
        let selector = Selector::of(NodeType::Identifier)
            .in_role(Role::Property)
            .with_parent(Selector::of(NodeType::MemberExpression).in_role(Role::Callee));
        assert!(selector.matches(&tree, property));
        assert!(!selector.matches(&tree, call));
    }

    #[test]
    fn test_pattern_on_child_literal() {
        let (tree, specifier, _, _) = sample();
        let selector = Selector::of(NodeType::ImportSpecifier).with_parent(
            Selector::of(NodeType::ImportDeclaration).with_child(
                Role::Source,
                Selector::of(NodeType::StringLiteral)
                    .with_text(TextMatch::pattern("^rxjs/operators$").unwrap()),
            ),
        );
        assert!(selector.matches(&tree, specifier));

        let other = Selector::of(NodeType::ImportSpecifier).with_parent(
            Selector::of(NodeType::ImportDeclaration).with_child(
                Role::Source,
                Selector::of(NodeType::StringLiteral).named("rxjs"),
            ),
        );
        assert!(!other.matches(&tree, specifier));
    }

    #[test]
    fn test_one_of_text() {
        let text = TextMatch::one_of(["takeUntil", "untilDestroyed"]);
        assert!(text.matches("untilDestroyed"));
        assert!(!text.matches("take"));
    }

    #[test]
    fn test_any_selector_matches_every_node() {
        let (tree, ..) = sample();
        let any = Selector::any();
        assert!(tree.preorder().all(|node| any.matches(&tree, node)));
    }

    #[test]
    fn test_text_on_textless_type_is_rejected() {
        let selector = Selector::of(NodeType::CallExpression).named("pipe");
        assert!(matches!(selector.validate(), Err(RuleError::InvalidSelector(_))));

        let nested = method_call("pipe").with_child(
            Role::Argument,
            Selector::of(NodeType::ArrowFunctionExpression).named("x"),
        );
        assert!(nested.validate().is_err());
    }

    #[test]
    fn test_program_with_parent_is_rejected() {
        let selector = Selector::of(NodeType::Program).with_parent(Selector::any());
        assert!(selector.validate().is_err());
        assert!(Selector::of(NodeType::Program).validate().is_ok());
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        assert!(matches!(
            TextMatch::pattern("(unclosed"),
            Err(RuleError::InvalidPattern(_))
        ));
        let long = "a".repeat(MAX_REGEX_LENGTH + 1);
        assert!(matches!(
            TextMatch::pattern(&long),
            Err(RuleError::InvalidPattern(_))
        ));
    }
}
