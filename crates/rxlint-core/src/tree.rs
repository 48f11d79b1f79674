//! Arena-backed syntax tree for a single source file.
//!
//! Nodes are stored in a flat vector and addressed by [`NodeId`]. Each node
//! keeps a back-reference to its parent and the [`Role`] it plays there, so
//! rules can walk upwards in O(depth) without re-scanning subtrees. A tree is
//! built once per file by a backend and dropped when the file's lint pass
//! ends.

use crate::Span;
use serde::{Deserialize, Serialize};

/// Identity of a node inside one [`SyntaxTree`].
///
/// Two structurally identical nodes always have distinct ids. Ids are only
/// meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The named field a node occupies inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Only the program node has this role.
    Root,
    /// Statement inside a program, block or function body, or an
    /// expression-bodied arrow function's expression.
    Body,
    Expression,
    Source,
    Specifier,
    Declarator,
    Init,
    Callee,
    Argument,
    Object,
    Property,
    Value,
    Element,
    SuperClass,
    /// Class body member, or one member of a union type.
    Member,
    /// Formal parameter of a function.
    Param,
    /// Declared type of a declarator, parameter or class property.
    TypeAnnotation,
    Test,
    Consequent,
    Alternate,
    /// Any other child of a loosely modelled construct.
    Child,
}

/// Kind tag plus kind-specific data of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Program,
    /// `import ... from "source"`; the source literal is a [`Role::Source`] child.
    ImportDeclaration,
    /// One imported binding. `imported` is `"default"` or `"*"` for default
    /// and namespace imports.
    ImportSpecifier { imported: String, local: String },
    VariableDeclaration,
    VariableDeclarator { name: Option<String> },
    FunctionDeclaration { name: Option<String>, is_async: bool },
    ClassDeclaration { name: Option<String> },
    /// Formal parameter. A default value is a [`Role::Init`] child.
    Parameter { name: Option<String> },
    ExpressionStatement,
    ReturnStatement,
    BlockStatement,
    CallExpression { optional: bool },
    NewExpression,
    /// `object.property` or `object[property]`.
    MemberExpression { computed: bool, optional: bool },
    /// Identifier reference, or the name in a non-computed member access.
    Identifier { name: String },
    ArrowFunctionExpression { is_async: bool },
    FunctionExpression { name: Option<String>, is_async: bool },
    StringLiteral { value: String },
    /// Numeric, boolean, null and other literals, kept as raw source text.
    Literal { raw: String },
    ObjectExpression,
    /// `key: value` entry of an object literal.
    Property { key: Option<String> },
    ArrayExpression,
    SpreadElement,
    ThisExpression,
    /// Named type such as `Observable<T>`, reduced to its (possibly
    /// dotted) head name.
    TypeReference { name: String },
    /// `A | B`; members are [`Role::Member`] children.
    UnionType,
    /// `any`, `undefined`, `string` and the other keyword types.
    TypeKeyword { name: String },
    /// Construct without a dedicated variant. Its children are still
    /// lowered so nested calls stay visible.
    Other { label: String },
}

impl NodeKind {
    pub fn identifier(name: impl Into<String>) -> Self {
        NodeKind::Identifier { name: name.into() }
    }

    pub fn member() -> Self {
        NodeKind::MemberExpression {
            computed: false,
            optional: false,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        NodeKind::StringLiteral {
            value: value.into(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Program => NodeType::Program,
            NodeKind::ImportDeclaration => NodeType::ImportDeclaration,
            NodeKind::ImportSpecifier { .. } => NodeType::ImportSpecifier,
            NodeKind::VariableDeclaration => NodeType::VariableDeclaration,
            NodeKind::VariableDeclarator { .. } => NodeType::VariableDeclarator,
            NodeKind::FunctionDeclaration { .. } => NodeType::FunctionDeclaration,
            NodeKind::ClassDeclaration { .. } => NodeType::ClassDeclaration,
            NodeKind::Parameter { .. } => NodeType::Parameter,
            NodeKind::ExpressionStatement => NodeType::ExpressionStatement,
            NodeKind::ReturnStatement => NodeType::ReturnStatement,
            NodeKind::BlockStatement => NodeType::BlockStatement,
            NodeKind::CallExpression { .. } => NodeType::CallExpression,
            NodeKind::NewExpression => NodeType::NewExpression,
            NodeKind::MemberExpression { .. } => NodeType::MemberExpression,
            NodeKind::Identifier { .. } => NodeType::Identifier,
            NodeKind::ArrowFunctionExpression { .. } => NodeType::ArrowFunctionExpression,
            NodeKind::FunctionExpression { .. } => NodeType::FunctionExpression,
            NodeKind::StringLiteral { .. } => NodeType::StringLiteral,
            NodeKind::Literal { .. } => NodeType::Literal,
            NodeKind::ObjectExpression => NodeType::ObjectExpression,
            NodeKind::Property { .. } => NodeType::Property,
            NodeKind::ArrayExpression => NodeType::ArrayExpression,
            NodeKind::SpreadElement => NodeType::SpreadElement,
            NodeKind::ThisExpression => NodeType::ThisExpression,
            NodeKind::TypeReference { .. } => NodeType::TypeReference,
            NodeKind::UnionType => NodeType::UnionType,
            NodeKind::TypeKeyword { .. } => NodeType::TypeKeyword,
            NodeKind::Other { .. } => NodeType::Other,
        }
    }

    /// The text selectors compare against, if this kind carries any.
    pub fn text(&self) -> Option<&str> {
        match self {
            NodeKind::Identifier { name } => Some(name),
            NodeKind::StringLiteral { value } => Some(value),
            NodeKind::Literal { raw } => Some(raw),
            NodeKind::ImportSpecifier { imported, .. } => Some(imported),
            NodeKind::VariableDeclarator { name }
            | NodeKind::FunctionDeclaration { name, .. }
            | NodeKind::FunctionExpression { name, .. }
            | NodeKind::ClassDeclaration { name }
            | NodeKind::Parameter { name } => name.as_deref(),
            NodeKind::TypeReference { name } | NodeKind::TypeKeyword { name } => Some(name),
            NodeKind::Property { key } => key.as_deref(),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration { .. }
                | NodeKind::FunctionExpression { .. }
                | NodeKind::ArrowFunctionExpression { .. }
        )
    }

    pub fn is_async_function(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration { is_async: true, .. }
                | NodeKind::FunctionExpression { is_async: true, .. }
                | NodeKind::ArrowFunctionExpression { is_async: true }
        )
    }
}

/// Field-less tag of a [`NodeKind`], used to index selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    Program,
    ImportDeclaration,
    ImportSpecifier,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    ClassDeclaration,
    Parameter,
    ExpressionStatement,
    ReturnStatement,
    BlockStatement,
    CallExpression,
    NewExpression,
    MemberExpression,
    Identifier,
    ArrowFunctionExpression,
    FunctionExpression,
    StringLiteral,
    Literal,
    ObjectExpression,
    Property,
    ArrayExpression,
    SpreadElement,
    ThisExpression,
    TypeReference,
    UnionType,
    TypeKeyword,
    Other,
}

impl NodeType {
    /// Whether nodes of this type can carry text (names, literal values).
    pub fn has_text(self) -> bool {
        matches!(
            self,
            NodeType::Identifier
                | NodeType::StringLiteral
                | NodeType::Literal
                | NodeType::ImportSpecifier
                | NodeType::VariableDeclarator
                | NodeType::FunctionDeclaration
                | NodeType::FunctionExpression
                | NodeType::ClassDeclaration
                | NodeType::Parameter
                | NodeType::TypeReference
                | NodeType::TypeKeyword
                | NodeType::Property
        )
    }
}

/// A single node of the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub role: Role,
    pub children: Vec<NodeId>,
}

/// Syntax tree of one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Create a tree holding only the program node.
    pub fn new(program_span: Span) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Program,
                span: program_span,
                parent: None,
                role: Role::Root,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Append a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this tree.
    pub fn push(&mut self, parent: NodeId, role: Role, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            parent: Some(parent),
            role,
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The program node is always present.
        false
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.kind(id).node_type()
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn role(&self, id: NodeId) -> Role {
        self.node(id).role
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.kind(id).text()
    }

    /// Children of `id` occupying `role`, in source order.
    pub fn children_in(&self, id: NodeId, role: Role) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.role(*child) == role)
    }

    /// First child of `id` occupying `role`.
    pub fn child(&self, id: NodeId, role: Role) -> Option<NodeId> {
        self.children_in(id, role).next()
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Every node in pre-order (parent before descendants, children in
    /// source order).
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Callee of a call or `new` expression.
    pub fn callee(&self, call: NodeId) -> Option<NodeId> {
        self.child(call, Role::Callee)
    }

    /// Arguments of a call or `new` expression, in source order.
    pub fn arguments(&self, call: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_in(call, Role::Argument)
    }

    /// `(object, property)` of a non-computed member expression.
    pub fn member_parts(&self, member: NodeId) -> Option<(NodeId, NodeId)> {
        match self.kind(member) {
            NodeKind::MemberExpression {
                computed: false, ..
            } => Some((self.child(member, Role::Object)?, self.child(member, Role::Property)?)),
            _ => None,
        }
    }

    /// Method name of a call such as `receiver.name(...)`.
    pub fn member_call_name(&self, call: NodeId) -> Option<&str> {
        if self.node_type(call) != NodeType::CallExpression {
            return None;
        }
        let (_, property) = self.member_parts(self.callee(call)?)?;
        self.text(property)
    }

    /// Name of an identifier node.
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order traversal driven by an explicit stack.
pub struct Preorder<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
