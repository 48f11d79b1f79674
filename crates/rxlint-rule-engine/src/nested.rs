//! Nested-call detection
//!
//! Finds calls of a watched method (`subscribe`, `pipe`) made lexically inside
//! the arguments of another call of the same method. The first watched call
//! seen in traversal order registers its argument nodes as roots; any later
//! watched call with a registered root among its ancestors is nested.
//!
//! The detector depends on pre-order dispatch: an outer call is always
//! visited before anything inside its arguments. The registry is owned by the
//! rule's per-file state, so it starts empty for every file and is dropped
//! with it.

use crate::oracle::{TypeOracle, TypePredicate};
use crate::selector::{method_call, Selector};
use rustc_hash::FxHashSet;
use rxlint_core::{NodeId, SyntaxTree};

/// Argument roots of watched calls seen so far in the current file.
#[derive(Debug, Default)]
pub struct ArgumentRegistry {
    roots: FxHashSet<NodeId>,
}

impl ArgumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, argument: NodeId) {
        self.roots.insert(argument);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.roots.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The nearest registered root among `node`'s strict ancestors.
    pub fn enclosing_root(&self, tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
        if self.roots.is_empty() {
            return None;
        }
        tree.ancestors(node).find(|ancestor| self.contains(*ancestor))
    }
}

/// Outcome of inspecting one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallVerdict {
    /// Not a watched call, or the receiver is not provably of the watched
    /// capability.
    Ignored,
    /// A watched call outside any registered argument; its arguments are now
    /// registered.
    Outer { registered: usize },
    /// A watched call inside the arguments of an earlier watched call.
    Nested {
        /// The callee's property node, where the finding is reported.
        token: NodeId,
        /// The argument root the call was found in.
        root: NodeId,
    },
}

/// The method a nesting rule guards and the receivers it applies to.
#[derive(Debug, Clone)]
pub struct WatchedCall {
    method: String,
    receivers: Vec<TypePredicate>,
}

impl WatchedCall {
    /// Watch `method` on receivers that could satisfy any of `receivers`.
    pub fn new(method: impl Into<String>, receivers: Vec<TypePredicate>) -> Self {
        Self {
            method: method.into(),
            receivers,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Selector for candidate calls; receiver types are checked in
    /// [`WatchedCall::inspect`].
    pub fn selector(&self) -> Selector {
        method_call(&self.method)
    }

    pub fn inspect(
        &self,
        registry: &mut ArgumentRegistry,
        tree: &SyntaxTree,
        oracle: &TypeOracle<'_>,
        call: NodeId,
    ) -> CallVerdict {
        let Some((object, property)) = tree.callee(call).and_then(|c| tree.member_parts(c)) else {
            return CallVerdict::Ignored;
        };
        if tree.text(property) != Some(self.method.as_str()) {
            return CallVerdict::Ignored;
        }
        if !oracle.could_be_any(object, &self.receivers).is_yes() {
            return CallVerdict::Ignored;
        }

        if let Some(root) = registry.enclosing_root(tree, call) {
            return CallVerdict::Nested {
                token: property,
                root,
            };
        }

        let mut registered = 0;
        for argument in tree.arguments(call) {
            registry.register(argument);
            registered += 1;
        }
        CallVerdict::Outer { registered }
    }
}
