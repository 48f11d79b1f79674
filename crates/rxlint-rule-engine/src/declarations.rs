//! Declaration-based type provider
//!
//! [`DeclarationTypes`] infers types from what a single file declares:
//! imports from `rxjs`, type annotations, variable initializers and class
//! heritage. Names resolve through lexical scopes (program, functions,
//! blocks and `for` heads), so a parameter or inner declaration shadows an
//! outer binding of the same name. `var` is treated as block scoped.
//! Anything it cannot follow resolves to [`StaticType::Unresolved`], which
//! the oracle reports as `No`.

use crate::constants::{MAX_CLASS_CHAIN, MAX_INFERENCE_DEPTH};
use crate::oracle::{Capability, StaticType, TypeProvider, TypeResolver};
use rustc_hash::FxHashMap;
use rxlint_core::{NodeId, NodeKind, Role, SyntaxTree};

/// RxJS classes and their base classes, nearest first.
const RXJS_CLASSES: &[(&str, &[&str])] = &[
    ("Observable", &[]),
    ("Subject", &["Observable"]),
    ("BehaviorSubject", &["Subject", "Observable"]),
    ("ReplaySubject", &["Subject", "Observable"]),
    ("AsyncSubject", &["Subject", "Observable"]),
    ("ConnectableObservable", &["Observable"]),
    ("Subscription", &[]),
    ("Subscriber", &["Subscription"]),
];

/// Functions exported by `rxjs` that return an observable.
const CREATION_FUNCTIONS: &[&str] = &[
    "of",
    "from",
    "interval",
    "timer",
    "defer",
    "merge",
    "concat",
    "combineLatest",
    "forkJoin",
    "zip",
    "race",
    "fromEvent",
    "fromEventPattern",
    "range",
    "iif",
    "throwError",
    "generate",
    "onErrorResumeNext",
];

/// Observable constants exported by `rxjs`.
const OBSERVABLE_CONSTANTS: &[&str] = &["EMPTY", "NEVER"];

fn is_rxjs_module(module: &str) -> bool {
    module == "rxjs" || module.starts_with("rxjs/")
}

fn rxjs_class(name: &str) -> Option<StaticType> {
    RXJS_CLASSES
        .iter()
        .find(|(class, _)| *class == name)
        .map(|(class, bases)| StaticType::with_bases(*class, bases.iter().copied()))
}

fn observable() -> StaticType {
    StaticType::named("Observable")
}

fn is_class(kind: &NodeKind) -> bool {
    match kind {
        NodeKind::ClassDeclaration { .. } => true,
        NodeKind::Other { label } => label == "ClassExpression",
        _ => false,
    }
}

/// Nodes that open a lexical scope.
fn is_scope(kind: &NodeKind) -> bool {
    match kind {
        NodeKind::Program | NodeKind::BlockStatement => true,
        NodeKind::Other { label } => {
            matches!(label.as_str(), "ForStatement" | "ForOfStatement" | "ForInStatement")
        }
        kind => kind.is_function(),
    }
}

/// The built-in [`TypeProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationTypes;

impl TypeProvider for DeclarationTypes {
    fn name(&self) -> &str {
        "declarations"
    }

    fn resolver<'t>(&self, tree: &'t SyntaxTree) -> Box<dyn TypeResolver + 't> {
        Box::new(DeclarationResolver::new(tree))
    }
}

/// What a name is bound to within one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    Import { module: String, imported: String },
    /// Variable declarator or formal parameter. The annotation wins over
    /// the initializer or default value.
    Variable {
        annotation: Option<NodeId>,
        init: Option<NodeId>,
    },
    Class { node: NodeId },
    Function,
}

/// Per-file resolver built by [`DeclarationTypes`].
pub struct DeclarationResolver<'t> {
    tree: &'t SyntaxTree,
    /// Bindings per scope node.
    scopes: FxHashMap<NodeId, FxHashMap<&'t str, Binding>>,
}

impl<'t> DeclarationResolver<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        let mut scopes: FxHashMap<NodeId, FxHashMap<&'t str, Binding>> = FxHashMap::default();

        for id in tree.preorder() {
            let (name, binding) = match tree.kind(id) {
                NodeKind::ImportSpecifier { imported, local } => {
                    let module = tree
                        .parent(id)
                        .and_then(|decl| tree.child(decl, Role::Source))
                        .and_then(|source| tree.text(source))
                        .unwrap_or_default();
                    (
                        local.as_str(),
                        Binding::Import {
                            module: module.to_string(),
                            imported: imported.clone(),
                        },
                    )
                }
                NodeKind::VariableDeclarator { name: Some(name) }
                | NodeKind::Parameter { name: Some(name) } => (
                    name.as_str(),
                    Binding::Variable {
                        annotation: tree.child(id, Role::TypeAnnotation),
                        init: tree.child(id, Role::Init),
                    },
                ),
                NodeKind::ClassDeclaration { name: Some(name) } => {
                    (name.as_str(), Binding::Class { node: id })
                }
                NodeKind::FunctionDeclaration { name: Some(name), .. } => {
                    (name.as_str(), Binding::Function)
                }
                _ => continue,
            };
            let scope = match tree.kind(id) {
                // Parameters belong to their function.
                NodeKind::Parameter { .. } => tree.parent(id),
                _ => tree.ancestors(id).find(|a| is_scope(tree.kind(*a))),
            };
            if let Some(scope) = scope {
                scopes
                    .entry(scope)
                    .or_default()
                    .entry(name)
                    .or_insert(binding);
            }
        }

        Self { tree, scopes }
    }

    /// Binding `name` refers to at `node`, nearest scope first.
    fn lookup(&self, node: NodeId, name: &str) -> Option<&Binding> {
        self.tree
            .ancestors(node)
            .filter_map(|scope| self.scopes.get(&scope))
            .find_map(|bindings| bindings.get(name))
    }

    fn rxjs_import(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.lookup(node, name)? {
            Binding::Import { module, imported } if is_rxjs_module(module) => {
                Some(imported.as_str())
            }
            _ => None,
        }
    }

    /// Name exported by `rxjs` that `node` refers to: `name` for a named
    /// import, `rx.name` for a namespace import.
    fn rxjs_export(&self, node: NodeId) -> Option<&str> {
        if let Some(name) = self.tree.identifier_name(node) {
            return self.rxjs_import(node, name).filter(|imported| *imported != "*");
        }
        let (object, property) = self.tree.member_parts(node)?;
        let namespace = self.tree.identifier_name(object)?;
        if self.rxjs_import(object, namespace)? == "*" {
            self.tree.text(property)
        } else {
            None
        }
    }

    fn infer(&self, node: NodeId, depth: usize) -> StaticType {
        if depth > MAX_INFERENCE_DEPTH {
            return StaticType::Unresolved;
        }

        match self.tree.kind(node) {
            NodeKind::Identifier { name } => self.identifier_type(node, name, depth),
            NodeKind::CallExpression { .. } => self.call_type(node, depth),
            NodeKind::NewExpression => self
                .tree
                .callee(node)
                .map_or(StaticType::Unresolved, |callee| self.instance_type(callee)),
            NodeKind::MemberExpression { .. } => self.member_type(node, depth),
            NodeKind::ThisExpression => self
                .enclosing_class(node)
                .map_or(StaticType::Unresolved, |class| self.class_type(class)),
            NodeKind::StringLiteral { .. } => StaticType::Primitive("string".to_string()),
            NodeKind::Literal { raw } => StaticType::Primitive(literal_type(raw).to_string()),
            NodeKind::ArrowFunctionExpression { .. } | NodeKind::FunctionExpression { .. } => {
                StaticType::Function
            }
            NodeKind::ObjectExpression => StaticType::named("Object"),
            NodeKind::ArrayExpression => StaticType::named("Array"),
            _ => StaticType::Unresolved,
        }
    }

    fn identifier_type(&self, node: NodeId, name: &str, depth: usize) -> StaticType {
        match self.lookup(node, name) {
            Some(Binding::Import { .. }) => match self.rxjs_export(node) {
                Some(export) if OBSERVABLE_CONSTANTS.contains(&export) => observable(),
                _ => StaticType::Unresolved,
            },
            Some(Binding::Variable {
                annotation: Some(annotation),
                ..
            }) => self.annotation_type(*annotation),
            Some(Binding::Variable {
                init: Some(init), ..
            }) => self.infer(*init, depth + 1),
            Some(Binding::Class { .. }) | Some(Binding::Function) => StaticType::Function,
            Some(Binding::Variable { .. }) | None => StaticType::Unresolved,
        }
    }

    fn member_type(&self, member: NodeId, depth: usize) -> StaticType {
        if self
            .rxjs_export(member)
            .is_some_and(|export| OBSERVABLE_CONSTANTS.contains(&export))
        {
            return observable();
        }

        let Some((object, property)) = self.tree.member_parts(member) else {
            return StaticType::Unresolved;
        };
        match (self.tree.kind(object), self.tree.text(property)) {
            (NodeKind::ThisExpression, Some(field)) => self
                .enclosing_class(object)
                .map_or(StaticType::Unresolved, |class| {
                    self.field_type(class, field, depth)
                }),
            _ => StaticType::Unresolved,
        }
    }

    /// Class whose instance `this` refers to at `node`. Arrow functions keep
    /// the outer `this`; any other function not declared in a class body
    /// rebinds it.
    fn enclosing_class(&self, node: NodeId) -> Option<NodeId> {
        let mut from = node;
        for ancestor in self.tree.ancestors(node) {
            let kind = self.tree.kind(ancestor);
            if is_class(kind) {
                let member = self.tree.role(from) == Role::Member
                    && matches!(
                        self.tree.kind(from),
                        NodeKind::FunctionExpression { .. } | NodeKind::Property { .. }
                    );
                return member.then_some(ancestor);
            }
            if matches!(
                kind,
                NodeKind::FunctionDeclaration { .. } | NodeKind::FunctionExpression { .. }
            ) && self.tree.role(ancestor) != Role::Member
            {
                return None;
            }
            from = ancestor;
        }
        None
    }

    /// Type of the instance field `field` declared in `class`.
    fn field_type(&self, class: NodeId, field: &str, depth: usize) -> StaticType {
        let declared = self.tree.children_in(class, Role::Member).find(|member| {
            matches!(self.tree.kind(*member), NodeKind::Property { key: Some(key) } if key == field)
        });
        let Some(declared) = declared else {
            return StaticType::Unresolved;
        };

        if let Some(annotation) = self.tree.child(declared, Role::TypeAnnotation) {
            return self.annotation_type(annotation);
        }
        self.tree
            .child(declared, Role::Value)
            .map_or(StaticType::Unresolved, |value| self.infer(value, depth + 1))
    }

    /// Type a lowered annotation describes. Type arguments are not kept, so
    /// `Observable<number>` is `Observable`.
    fn annotation_type(&self, annotation: NodeId) -> StaticType {
        match self.tree.kind(annotation) {
            NodeKind::TypeReference { name } => self.reference_type(annotation, name),
            NodeKind::UnionType => StaticType::Union(
                self.tree
                    .children_in(annotation, Role::Member)
                    .map(|member| self.annotation_type(member))
                    .collect(),
            ),
            NodeKind::TypeKeyword { name } if name == "any" => StaticType::Any,
            NodeKind::TypeKeyword { name } => StaticType::Primitive(name.clone()),
            _ => StaticType::Unresolved,
        }
    }

    fn reference_type(&self, node: NodeId, name: &str) -> StaticType {
        if let Some((namespace, member)) = name.rsplit_once('.') {
            return match self.rxjs_import(node, namespace) {
                Some("*") => rxjs_class(member).unwrap_or_else(|| StaticType::named(member)),
                _ => StaticType::named(member),
            };
        }

        match self.lookup(node, name) {
            Some(Binding::Import { module, imported }) if is_rxjs_module(module) => {
                rxjs_class(imported).unwrap_or_else(|| StaticType::named(imported.as_str()))
            }
            Some(Binding::Class { node: class }) => self.class_type(*class),
            _ => StaticType::named(name),
        }
    }

    fn call_type(&self, call: NodeId, depth: usize) -> StaticType {
        let Some(callee) = self.tree.callee(call) else {
            return StaticType::Unresolved;
        };

        if let Some(export) = self.rxjs_export(callee) {
            return if CREATION_FUNCTIONS.contains(&export) {
                observable()
            } else {
                StaticType::Unresolved
            };
        }

        let Some((object, property)) = self.tree.member_parts(callee) else {
            return StaticType::Unresolved;
        };
        let receiver = self.infer(object, depth + 1);
        if !receiver.could_be(&Capability::Observable.into()) {
            return StaticType::Unresolved;
        }
        match self.tree.text(property) {
            Some("pipe") | Some("asObservable") => observable(),
            Some("subscribe") => rxjs_class("Subscription").unwrap_or(StaticType::Unresolved),
            _ => StaticType::Unresolved,
        }
    }

    /// Type of `new <callee>(...)`.
    fn instance_type(&self, callee: NodeId) -> StaticType {
        if let Some(export) = self.rxjs_export(callee) {
            return rxjs_class(export).unwrap_or(StaticType::Unresolved);
        }

        let Some(name) = self.tree.identifier_name(callee) else {
            return StaticType::Unresolved;
        };
        match self.lookup(callee, name) {
            Some(Binding::Class { node }) => self.class_type(*node),
            _ => StaticType::Unresolved,
        }
    }

    /// Instance type of a locally declared class.
    fn class_type(&self, class: NodeId) -> StaticType {
        match self.tree.kind(class) {
            NodeKind::ClassDeclaration { name: Some(name) } => {
                StaticType::with_bases(name.as_str(), self.class_bases(class))
            }
            _ => StaticType::Unresolved,
        }
    }

    /// Base classes of a locally declared class, nearest first, including
    /// the RxJS hierarchy above the first imported base.
    fn class_bases(&self, class: NodeId) -> Vec<String> {
        let mut bases: Vec<String> = Vec::new();
        let mut current = class;

        for _ in 0..MAX_CLASS_CHAIN {
            let Some(super_class) = self.tree.child(current, Role::SuperClass) else {
                break;
            };

            if let Some(export) = self.rxjs_export(super_class) {
                if let Some(StaticType::Named { name: base, bases: above }) = rxjs_class(export) {
                    bases.push(base);
                    bases.extend(above);
                }
                break;
            }

            let Some(parent) = self.tree.identifier_name(super_class) else {
                break;
            };
            match self.lookup(super_class, parent) {
                _ if bases.iter().any(|b| b == parent) => break,
                Some(Binding::Class { node }) if *node == class => break,
                Some(Binding::Class { node }) => {
                    bases.push(parent.to_string());
                    current = *node;
                }
                // Not a class this file declares; keep the name only.
                _ => {
                    bases.push(parent.to_string());
                    break;
                }
            }
        }

        bases
    }
}

impl TypeResolver for DeclarationResolver<'_> {
    fn type_of(&self, node: NodeId) -> StaticType {
        self.infer(node, 0)
    }
}

fn literal_type(raw: &str) -> &'static str {
    match raw {
        "true" | "false" => "boolean",
        "null" => "null",
        "undefined" => "undefined",
        _ if raw.ends_with('n') && raw[..raw.len() - 1].chars().all(|c| c.is_ascii_digit()) => {
            "bigint"
        }
        _ if raw.starts_with(|c: char| c.is_ascii_digit() || c == '.') => "number",
        _ if raw.starts_with('/') => "RegExp",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{TypeAnswer, TypeContext};
    use rxlint_core::Span;

    struct Builder {
        tree: SyntaxTree,
        offset: u32,
    }

    impl Builder {
        fn new() -> Self {
            Self {
                tree: SyntaxTree::new(Span::new(0, 1000)),
                offset: 0,
            }
        }

        fn span(&mut self) -> Span {
            self.offset += 1;
            Span::new(self.offset, self.offset + 1)
        }

        fn push(&mut self, parent: NodeId, role: Role, kind: NodeKind) -> NodeId {
            let span = self.span();
            self.tree.push(parent, role, kind, span)
        }

        fn import(&mut self, names: &[(&str, &str)], module: &str) {
            let root = self.tree.root();
            let decl = self.push(root, Role::Body, NodeKind::ImportDeclaration);
            for (imported, local) in names {
                self.push(
                    decl,
                    Role::Specifier,
                    NodeKind::ImportSpecifier {
                        imported: imported.to_string(),
                        local: local.to_string(),
                    },
                );
            }
            self.push(decl, Role::Source, NodeKind::string(module));
        }

        /// `const name = <init>`; returns the declarator.
        fn declare(&mut self, name: &str) -> NodeId {
            let root = self.tree.root();
            self.declare_in(root, name)
        }

        fn declare_in(&mut self, parent: NodeId, name: &str) -> NodeId {
            let decl = self.push(parent, Role::Body, NodeKind::VariableDeclaration);
            self.push(
                decl,
                Role::Declarator,
                NodeKind::VariableDeclarator {
                    name: Some(name.to_string()),
                },
            )
        }

        fn call(&mut self, parent: NodeId, role: Role, callee: &str) -> NodeId {
            let call = self.push(parent, role, NodeKind::CallExpression { optional: false });
            self.push(call, Role::Callee, NodeKind::identifier(callee));
            call
        }

        fn method_call(&mut self, parent: NodeId, role: Role, receiver: &str, method: &str) -> NodeId {
            let call = self.push(parent, role, NodeKind::CallExpression { optional: false });
            let member = self.push(call, Role::Callee, NodeKind::member());
            self.push(member, Role::Object, NodeKind::identifier(receiver));
            self.push(member, Role::Property, NodeKind::identifier(method));
            call
        }

        fn new_expr(&mut self, parent: NodeId, role: Role, class: &str) -> NodeId {
            let expr = self.push(parent, role, NodeKind::NewExpression);
            self.push(expr, Role::Callee, NodeKind::identifier(class));
            expr
        }

        fn reference(&mut self, name: &str) -> NodeId {
            let root = self.tree.root();
            self.reference_in(root, name)
        }

        fn reference_in(&mut self, parent: NodeId, name: &str) -> NodeId {
            let stmt = self.push(parent, Role::Body, NodeKind::ExpressionStatement);
            self.push(stmt, Role::Expression, NodeKind::identifier(name))
        }

        fn function(&mut self, name: &str) -> NodeId {
            let root = self.tree.root();
            self.push(
                root,
                Role::Body,
                NodeKind::FunctionDeclaration {
                    name: Some(name.to_string()),
                    is_async: false,
                },
            )
        }

        fn param(&mut self, function: NodeId, name: &str) -> NodeId {
            self.push(
                function,
                Role::Param,
                NodeKind::Parameter {
                    name: Some(name.to_string()),
                },
            )
        }

        fn type_ref(&mut self, parent: NodeId, role: Role, name: &str) -> NodeId {
            self.push(
                parent,
                role,
                NodeKind::TypeReference {
                    name: name.to_string(),
                },
            )
        }

        /// `this.<field>` as an expression statement under `parent`.
        fn this_member(&mut self, parent: NodeId, field: &str) -> NodeId {
            let stmt = self.push(parent, Role::Body, NodeKind::ExpressionStatement);
            let member = self.push(stmt, Role::Expression, NodeKind::member());
            self.push(member, Role::Object, NodeKind::ThisExpression);
            self.push(member, Role::Property, NodeKind::identifier(field));
            member
        }
    }

    fn type_of(builder: &Builder, node: NodeId) -> StaticType {
        DeclarationResolver::new(&builder.tree).type_of(node)
    }

    #[test]
    fn test_creation_function_is_observable() {
        let mut b = Builder::new();
        b.import(&[("of", "of")], "rxjs");
        let a = b.declare("a");
        b.call(a, Role::Init, "of");
        let reference = b.reference("a");
        assert_eq!(type_of(&b, reference), observable());
    }

    #[test]
    fn test_unimported_function_is_unresolved() {
        let mut b = Builder::new();
        let a = b.declare("a");
        b.call(a, Role::Init, "of");
        let reference = b.reference("a");
        assert_eq!(type_of(&b, reference), StaticType::Unresolved);
    }

    #[test]
    fn test_new_behavior_subject_has_bases() {
        let mut b = Builder::new();
        b.import(&[("BehaviorSubject", "BehaviorSubject")], "rxjs");
        let s = b.declare("s");
        b.new_expr(s, Role::Init, "BehaviorSubject");
        let reference = b.reference("s");
        let ty = type_of(&b, reference);
        assert!(ty.could_be(&Capability::BehaviorSubject.into()));
        assert!(ty.could_be(&Capability::Subject.into()));
        assert!(ty.could_be(&Capability::Observable.into()));
    }

    #[test]
    fn test_pipe_result_is_observable() {
        let mut b = Builder::new();
        b.import(&[("interval", "interval")], "rxjs");
        let source = b.declare("source");
        b.call(source, Role::Init, "interval");
        let piped = b.declare("piped");
        b.method_call(piped, Role::Init, "source", "pipe");
        let reference = b.reference("piped");
        assert_eq!(type_of(&b, reference), observable());
    }

    #[test]
    fn test_subscribe_result_is_subscription() {
        let mut b = Builder::new();
        b.import(&[("of", "of")], "rxjs");
        let a = b.declare("a");
        b.call(a, Role::Init, "of");
        let sub = b.declare("sub");
        b.method_call(sub, Role::Init, "a", "subscribe");
        let reference = b.reference("sub");
        let ty = type_of(&b, reference);
        assert!(ty.could_be(&crate::oracle::TypePredicate::named("Subscription")));
        assert!(!ty.could_be(&Capability::Observable.into()));
    }

    #[test]
    fn test_local_class_extending_subject() {
        let mut b = Builder::new();
        b.import(&[("Subject", "Subject")], "rxjs");
        let root = b.tree.root();
        let class = b.push(
            root,
            Role::Body,
            NodeKind::ClassDeclaration {
                name: Some("Bus".to_string()),
            },
        );
        b.push(class, Role::SuperClass, NodeKind::identifier("Subject"));
        let bus = b.declare("bus");
        b.new_expr(bus, Role::Init, "Bus");
        let reference = b.reference("bus");
        assert_eq!(
            type_of(&b, reference),
            StaticType::with_bases("Bus", ["Subject", "Observable"])
        );
    }

    #[test]
    fn test_namespace_import() {
        let mut b = Builder::new();
        b.import(&[("*", "rx")], "rxjs");
        let a = b.declare("a");
        let call = b.push(a, Role::Init, NodeKind::CallExpression { optional: false });
        let member = b.push(call, Role::Callee, NodeKind::member());
        b.push(member, Role::Object, NodeKind::identifier("rx"));
        b.push(member, Role::Property, NodeKind::identifier("timer"));
        let reference = b.reference("a");
        assert_eq!(type_of(&b, reference), observable());
    }

    #[test]
    fn test_empty_constant() {
        let mut b = Builder::new();
        b.import(&[("EMPTY", "EMPTY")], "rxjs");
        let reference = b.reference("EMPTY");
        assert_eq!(type_of(&b, reference), observable());
    }

    #[test]
    fn test_self_referencing_declaration_terminates() {
        let mut b = Builder::new();
        let a = b.declare("a");
        b.method_call(a, Role::Init, "a", "pipe");
        let reference = b.reference("a");
        assert_eq!(type_of(&b, reference), StaticType::Unresolved);
    }

    #[test]
    fn test_parameter_shadows_outer_variable() {
        let mut b = Builder::new();
        b.import(&[("of", "of")], "rxjs");
        let outer = b.declare("b");
        b.call(outer, Role::Init, "of");
        let g = b.function("g");
        b.param(g, "b");
        let inner = b.reference_in(g, "b");
        let top = b.reference("b");

        assert_eq!(type_of(&b, inner), StaticType::Unresolved);
        assert_eq!(type_of(&b, top), observable());
    }

    #[test]
    fn test_inner_declaration_does_not_hide_outer() {
        let mut b = Builder::new();
        b.import(&[("of", "of")], "rxjs");
        let h = b.function("h");
        let inner_decl = b.declare_in(h, "b");
        b.push(inner_decl, Role::Init, NodeKind::ObjectExpression);
        let inner = b.reference_in(h, "b");
        let outer_decl = b.declare("b");
        b.call(outer_decl, Role::Init, "of");
        let top = b.reference("b");

        assert_eq!(type_of(&b, inner), StaticType::named("Object"));
        assert_eq!(type_of(&b, top), observable());
    }

    #[test]
    fn test_block_declaration_is_scoped_to_block() {
        let mut b = Builder::new();
        b.import(&[("of", "of")], "rxjs");
        let root = b.tree.root();
        let block = b.push(root, Role::Body, NodeKind::BlockStatement);
        let decl = b.declare_in(block, "a");
        b.call(decl, Role::Init, "of");
        let inside = b.reference_in(block, "a");
        let outside = b.reference("a");

        assert_eq!(type_of(&b, inside), observable());
        assert_eq!(type_of(&b, outside), StaticType::Unresolved);
    }

    #[test]
    fn test_local_parameter_hides_rxjs_import() {
        let mut b = Builder::new();
        b.import(&[("of", "of")], "rxjs");
        let f = b.function("f");
        b.param(f, "of");
        let decl = b.declare_in(f, "a");
        b.call(decl, Role::Init, "of");
        let reference = b.reference_in(f, "a");
        assert_eq!(type_of(&b, reference), StaticType::Unresolved);
    }

    #[test]
    fn test_annotated_parameter() {
        let mut b = Builder::new();
        b.import(&[("Observable", "Observable")], "rxjs");
        let f = b.function("f");
        let a = b.param(f, "a");
        b.type_ref(a, Role::TypeAnnotation, "Observable");
        let reference = b.reference_in(f, "a");
        assert_eq!(type_of(&b, reference), observable());
    }

    #[test]
    fn test_parameter_default_value() {
        let mut b = Builder::new();
        b.import(&[("timer", "timer")], "rxjs");
        let f = b.function("f");
        let a = b.param(f, "a");
        b.call(a, Role::Init, "timer");
        let reference = b.reference_in(f, "a");
        assert_eq!(type_of(&b, reference), observable());
    }

    #[test]
    fn test_annotated_union_wins_over_initializer() {
        let mut b = Builder::new();
        b.import(&[("BehaviorSubject", "BehaviorSubject")], "rxjs");
        let s = b.declare("s");
        let union = b.push(s, Role::TypeAnnotation, NodeKind::UnionType);
        b.type_ref(union, Role::Member, "BehaviorSubject");
        b.push(
            union,
            Role::Member,
            NodeKind::TypeKeyword {
                name: "undefined".to_string(),
            },
        );
        b.call(s, Role::Init, "make");
        let reference = b.reference("s");

        let ty = type_of(&b, reference);
        assert_eq!(
            ty,
            StaticType::Union(vec![
                StaticType::with_bases("BehaviorSubject", ["Subject", "Observable"]),
                StaticType::Primitive("undefined".to_string()),
            ])
        );
        assert!(ty.could_be(&Capability::BehaviorSubject.into()));
    }

    #[test]
    fn test_unimported_annotation_keeps_its_name() {
        let mut b = Builder::new();
        let s = b.declare("s");
        b.type_ref(s, Role::TypeAnnotation, "Subject");
        let any = b.declare("x");
        b.push(
            any,
            Role::TypeAnnotation,
            NodeKind::TypeKeyword {
                name: "any".to_string(),
            },
        );
        let subject = b.reference("s");
        let erased = b.reference("x");

        assert_eq!(type_of(&b, subject), StaticType::named("Subject"));
        assert_eq!(type_of(&b, erased), StaticType::Any);
    }

    #[test]
    fn test_namespace_qualified_annotation() {
        let mut b = Builder::new();
        b.import(&[("*", "rx")], "rxjs");
        let s = b.declare("s");
        b.type_ref(s, Role::TypeAnnotation, "rx.ReplaySubject");
        let reference = b.reference("s");
        assert!(type_of(&b, reference).could_be(&Capability::Subject.into()));
    }

    /// `class C { s = new BehaviorSubject(0); m() {} }`; returns `(class, m)`.
    fn class_with_subject_field(b: &mut Builder) -> (NodeId, NodeId) {
        b.import(&[("BehaviorSubject", "BehaviorSubject")], "rxjs");
        let root = b.tree.root();
        let class = b.push(
            root,
            Role::Body,
            NodeKind::ClassDeclaration {
                name: Some("C".to_string()),
            },
        );
        let field = b.push(
            class,
            Role::Member,
            NodeKind::Property {
                key: Some("s".to_string()),
            },
        );
        b.new_expr(field, Role::Value, "BehaviorSubject");
        let method = b.push(
            class,
            Role::Member,
            NodeKind::FunctionExpression {
                name: Some("m".to_string()),
                is_async: false,
            },
        );
        (class, method)
    }

    #[test]
    fn test_this_field_from_initializer() {
        let mut b = Builder::new();
        let (_, method) = class_with_subject_field(&mut b);
        let arrow = b.push(method, Role::Body, NodeKind::ArrowFunctionExpression { is_async: false });
        let direct = b.this_member(method, "s");
        let in_arrow = b.this_member(arrow, "s");
        let missing = b.this_member(method, "t");

        let subject = StaticType::with_bases("BehaviorSubject", ["Subject", "Observable"]);
        assert_eq!(type_of(&b, direct), subject);
        assert_eq!(type_of(&b, in_arrow), subject);
        assert_eq!(type_of(&b, missing), StaticType::Unresolved);
    }

    #[test]
    fn test_this_in_nested_function_is_unresolved() {
        let mut b = Builder::new();
        let (_, method) = class_with_subject_field(&mut b);
        let inner = b.push(
            method,
            Role::Body,
            NodeKind::FunctionExpression {
                name: None,
                is_async: false,
            },
        );
        let member = b.this_member(inner, "s");
        let top = b.this_member(b.tree.root(), "s");

        assert_eq!(type_of(&b, member), StaticType::Unresolved);
        assert_eq!(type_of(&b, top), StaticType::Unresolved);
    }

    #[test]
    fn test_this_is_the_class_instance() {
        let mut b = Builder::new();
        b.import(&[("Subject", "Subject")], "rxjs");
        let root = b.tree.root();
        let class = b.push(
            root,
            Role::Body,
            NodeKind::ClassDeclaration {
                name: Some("Bus".to_string()),
            },
        );
        b.push(class, Role::SuperClass, NodeKind::identifier("Subject"));
        let method = b.push(
            class,
            Role::Member,
            NodeKind::FunctionExpression {
                name: Some("emit".to_string()),
                is_async: false,
            },
        );
        let stmt = b.push(method, Role::Body, NodeKind::ExpressionStatement);
        let this = b.push(stmt, Role::Expression, NodeKind::ThisExpression);

        assert_eq!(
            type_of(&b, this),
            StaticType::with_bases("Bus", ["Subject", "Observable"])
        );
    }

    #[test]
    fn test_class_cycle_terminates() {
        let mut b = Builder::new();
        let root = b.tree.root();
        for (name, base) in [("A", "B"), ("B", "A")] {
            let class = b.push(
                root,
                Role::Body,
                NodeKind::ClassDeclaration {
                    name: Some(name.to_string()),
                },
            );
            b.push(class, Role::SuperClass, NodeKind::identifier(base));
        }
        let a = b.declare("a");
        b.new_expr(a, Role::Init, "A");
        let reference = b.reference("a");
        assert_eq!(type_of(&b, reference), StaticType::with_bases("A", ["B"]));
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(literal_type("42"), "number");
        assert_eq!(literal_type("true"), "boolean");
        assert_eq!(literal_type("10n"), "bigint");
        assert_eq!(literal_type("null"), "null");
    }

    #[test]
    fn test_provider_through_context() {
        let mut b = Builder::new();
        b.import(&[("of", "of")], "rxjs");
        let a = b.declare("a");
        b.call(a, Role::Init, "of");
        let reference = b.reference("a");
        let other = b.reference("unknown");

        let context = TypeContext::with_provider(DeclarationTypes);
        let oracle = context.oracle_for(&b.tree);
        assert_eq!(context.provider_name(), Some("declarations"));
        assert_eq!(oracle.could_be_observable(reference), TypeAnswer::Yes);
        assert_eq!(oracle.could_be_observable(other), TypeAnswer::No);
    }
}
