//! Lowering of the oxc AST into a [`SyntaxTree`].
//!
//! Only the shapes the rules and the declaration provider look at get
//! dedicated node kinds. Everything else becomes [`NodeKind::Other`] with its
//! expression and statement children still lowered, so calls nested inside
//! loops, conditionals, template literals and the like stay visible.
//! Parenthesized expressions and TypeScript expression wrappers (`as`, `!`,
//! `satisfies`, angle-bracket assertions) are transparent.
//!
//! Type annotations on declarators, parameters and class properties are kept
//! as small type subtrees: references reduced to their head name, unions and
//! keyword types. Type arguments are dropped.

use oxc_ast::ast::{
    Argument, ArrayExpressionElement, BindingPattern, BindingPatternKind, CallExpression, Class,
    ClassElement, Declaration, ExportDefaultDeclarationKind, Expression, ForStatementInit,
    FormalParameters, Function, FunctionBody, ImportDeclaration, ImportDeclarationSpecifier,
    MemberExpression, ObjectPropertyKind, Program, Statement, TSType, TSTypeAnnotation,
    TSTypeName, VariableDeclaration,
};
use oxc_span::GetSpan;
use rxlint_core::{NodeId, NodeKind, Role, Span, SyntaxTree};

fn span_of(span: oxc_span::Span) -> Span {
    Span::new(span.start, span.end)
}

fn other(label: &str) -> NodeKind {
    NodeKind::Other {
        label: label.to_string(),
    }
}

fn keyword(name: &str) -> NodeKind {
    NodeKind::TypeKeyword {
        name: name.to_string(),
    }
}

/// `rx.Observable` for a qualified name.
fn type_name(name: &TSTypeName<'_>) -> String {
    match name {
        TSTypeName::IdentifierReference(ident) => ident.name.to_string(),
        TSTypeName::QualifiedName(qualified) => {
            format!("{}.{}", type_name(&qualified.left), qualified.right.name)
        }
        TSTypeName::ThisExpression(_) => "this".to_string(),
    }
}

/// Annotation of a binding; a default value wraps the annotated pattern.
fn pattern_annotation<'p, 'a>(
    pattern: &'p BindingPattern<'a>,
) -> Option<&'p TSTypeAnnotation<'a>> {
    pattern.type_annotation.as_deref().or(match &pattern.kind {
        BindingPatternKind::AssignmentPattern(assign) => assign.left.type_annotation.as_deref(),
        _ => None,
    })
}

/// Lower a parsed program.
pub fn lower_program(program: &Program<'_>, source: &str) -> SyntaxTree {
    let mut lowerer = Lowerer {
        tree: SyntaxTree::new(span_of(program.span)),
        source,
    };
    let root = lowerer.tree.root();
    for statement in &program.body {
        lowerer.statement(root, Role::Body, statement);
    }
    lowerer.tree
}

struct Lowerer<'s> {
    tree: SyntaxTree,
    source: &'s str,
}

impl Lowerer<'_> {
    fn push(&mut self, parent: NodeId, role: Role, kind: NodeKind, span: oxc_span::Span) -> NodeId {
        self.tree.push(parent, role, kind, span_of(span))
    }

    fn statements(&mut self, parent: NodeId, role: Role, statements: &[Statement<'_>]) {
        for statement in statements {
            self.statement(parent, role, statement);
        }
    }

    fn statement(&mut self, parent: NodeId, role: Role, statement: &Statement<'_>) {
        match statement {
            Statement::ExpressionStatement(stmt) => {
                let id = self.push(parent, role, NodeKind::ExpressionStatement, stmt.span);
                self.expression(id, Role::Expression, &stmt.expression);
            }
            Statement::VariableDeclaration(decl) => self.variable_declaration(parent, role, decl),
            Statement::FunctionDeclaration(function) => {
                let kind = NodeKind::FunctionDeclaration {
                    name: function.id.as_ref().map(|id| id.name.to_string()),
                    is_async: function.r#async,
                };
                self.function(parent, role, kind, function);
            }
            Statement::ClassDeclaration(class) => {
                let kind = NodeKind::ClassDeclaration {
                    name: class.id.as_ref().map(|id| id.name.to_string()),
                };
                self.class(parent, role, kind, class);
            }
            Statement::ImportDeclaration(decl) => self.import_declaration(parent, role, decl),
            Statement::ExportNamedDeclaration(export) => {
                let id = self.push(parent, role, other("ExportNamedDeclaration"), export.span);
                if let Some(declaration) = &export.declaration {
                    self.declaration(id, declaration);
                }
            }
            Statement::ExportDefaultDeclaration(export) => {
                let id = self.push(parent, role, other("ExportDefaultDeclaration"), export.span);
                match &export.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(function) => {
                        let kind = NodeKind::FunctionDeclaration {
                            name: function.id.as_ref().map(|id| id.name.to_string()),
                            is_async: function.r#async,
                        };
                        self.function(id, Role::Child, kind, function);
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        let kind = NodeKind::ClassDeclaration {
                            name: class.id.as_ref().map(|id| id.name.to_string()),
                        };
                        self.class(id, Role::Child, kind, class);
                    }
                    declaration => {
                        if let Some(expression) = declaration.as_expression() {
                            self.expression(id, Role::Expression, expression);
                        }
                    }
                }
            }
            Statement::ReturnStatement(stmt) => {
                let id = self.push(parent, role, NodeKind::ReturnStatement, stmt.span);
                if let Some(argument) = &stmt.argument {
                    self.expression(id, Role::Expression, argument);
                }
            }
            Statement::BlockStatement(block) => {
                let id = self.push(parent, role, NodeKind::BlockStatement, block.span);
                self.statements(id, Role::Body, &block.body);
            }
            Statement::IfStatement(stmt) => {
                let id = self.push(parent, role, other("IfStatement"), stmt.span);
                self.expression(id, Role::Test, &stmt.test);
                self.statement(id, Role::Consequent, &stmt.consequent);
                if let Some(alternate) = &stmt.alternate {
                    self.statement(id, Role::Alternate, alternate);
                }
            }
            Statement::WhileStatement(stmt) => {
                let id = self.push(parent, role, other("WhileStatement"), stmt.span);
                self.expression(id, Role::Test, &stmt.test);
                self.statement(id, Role::Body, &stmt.body);
            }
            Statement::DoWhileStatement(stmt) => {
                let id = self.push(parent, role, other("DoWhileStatement"), stmt.span);
                self.statement(id, Role::Body, &stmt.body);
                self.expression(id, Role::Test, &stmt.test);
            }
            Statement::ForStatement(stmt) => {
                let id = self.push(parent, role, other("ForStatement"), stmt.span);
                match &stmt.init {
                    Some(ForStatementInit::VariableDeclaration(decl)) => {
                        self.variable_declaration(id, Role::Child, decl)
                    }
                    Some(init) => {
                        if let Some(expression) = init.as_expression() {
                            self.expression(id, Role::Child, expression);
                        }
                    }
                    None => {}
                }
                if let Some(test) = &stmt.test {
                    self.expression(id, Role::Test, test);
                }
                if let Some(update) = &stmt.update {
                    self.expression(id, Role::Child, update);
                }
                self.statement(id, Role::Body, &stmt.body);
            }
            Statement::ForOfStatement(stmt) => {
                let id = self.push(parent, role, other("ForOfStatement"), stmt.span);
                self.expression(id, Role::Child, &stmt.right);
                self.statement(id, Role::Body, &stmt.body);
            }
            Statement::ForInStatement(stmt) => {
                let id = self.push(parent, role, other("ForInStatement"), stmt.span);
                self.expression(id, Role::Child, &stmt.right);
                self.statement(id, Role::Body, &stmt.body);
            }
            Statement::TryStatement(stmt) => {
                let id = self.push(parent, role, other("TryStatement"), stmt.span);
                let block = self.push(id, Role::Child, NodeKind::BlockStatement, stmt.block.span);
                self.statements(block, Role::Body, &stmt.block.body);
                if let Some(handler) = &stmt.handler {
                    let catch = self.push(id, Role::Child, NodeKind::BlockStatement, handler.body.span);
                    self.statements(catch, Role::Body, &handler.body.body);
                }
                if let Some(finalizer) = &stmt.finalizer {
                    let block = self.push(id, Role::Child, NodeKind::BlockStatement, finalizer.span);
                    self.statements(block, Role::Body, &finalizer.body);
                }
            }
            Statement::SwitchStatement(stmt) => {
                let id = self.push(parent, role, other("SwitchStatement"), stmt.span);
                self.expression(id, Role::Test, &stmt.discriminant);
                for case in &stmt.cases {
                    let case_id = self.push(id, Role::Child, other("SwitchCase"), case.span);
                    if let Some(test) = &case.test {
                        self.expression(case_id, Role::Test, test);
                    }
                    self.statements(case_id, Role::Body, &case.consequent);
                }
            }
            Statement::ThrowStatement(stmt) => {
                let id = self.push(parent, role, other("ThrowStatement"), stmt.span);
                self.expression(id, Role::Expression, &stmt.argument);
            }
            Statement::LabeledStatement(stmt) => {
                let id = self.push(parent, role, other("LabeledStatement"), stmt.span);
                self.statement(id, Role::Body, &stmt.body);
            }
            other_statement => {
                self.push(parent, role, other("Statement"), other_statement.span());
            }
        }
    }

    fn declaration(&mut self, parent: NodeId, declaration: &Declaration<'_>) {
        match declaration {
            Declaration::VariableDeclaration(decl) => {
                self.variable_declaration(parent, Role::Child, decl)
            }
            Declaration::FunctionDeclaration(function) => {
                let kind = NodeKind::FunctionDeclaration {
                    name: function.id.as_ref().map(|id| id.name.to_string()),
                    is_async: function.r#async,
                };
                self.function(parent, Role::Child, kind, function);
            }
            Declaration::ClassDeclaration(class) => {
                let kind = NodeKind::ClassDeclaration {
                    name: class.id.as_ref().map(|id| id.name.to_string()),
                };
                self.class(parent, Role::Child, kind, class);
            }
            other_declaration => {
                self.push(parent, Role::Child, other("Declaration"), other_declaration.span());
            }
        }
    }

    fn variable_declaration(&mut self, parent: NodeId, role: Role, decl: &VariableDeclaration<'_>) {
        let id = self.push(parent, role, NodeKind::VariableDeclaration, decl.span);
        for declarator in &decl.declarations {
            let kind = NodeKind::VariableDeclarator {
                name: declarator.id.get_identifier_name().map(|name| name.to_string()),
            };
            let declarator_id = self.push(id, Role::Declarator, kind, declarator.span);
            if let Some(annotation) = &declarator.id.type_annotation {
                self.type_annotation(declarator_id, annotation);
            }
            if let Some(init) = &declarator.init {
                self.expression(declarator_id, Role::Init, init);
            }
        }
    }

    fn import_declaration(&mut self, parent: NodeId, role: Role, decl: &ImportDeclaration<'_>) {
        let id = self.push(parent, role, NodeKind::ImportDeclaration, decl.span);
        for specifier in decl.specifiers.iter().flatten() {
            let (imported, local, span) = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    (s.imported.name().to_string(), s.local.name.to_string(), s.span)
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    ("default".to_string(), s.local.name.to_string(), s.span)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    ("*".to_string(), s.local.name.to_string(), s.span)
                }
            };
            self.push(id, Role::Specifier, NodeKind::ImportSpecifier { imported, local }, span);
        }
        self.push(id, Role::Source, NodeKind::string(decl.source.value.as_str()), decl.source.span);
    }

    fn function(&mut self, parent: NodeId, role: Role, kind: NodeKind, function: &Function<'_>) {
        let id = self.push(parent, role, kind, function.span);
        self.parameters(id, &function.params);
        if let Some(body) = &function.body {
            self.function_body(id, body);
        }
    }

    fn parameters(&mut self, function: NodeId, params: &FormalParameters<'_>) {
        for param in &params.items {
            self.parameter(function, &param.pattern, param.span);
        }
        if let Some(rest) = &params.rest {
            self.parameter(function, &rest.argument, rest.span);
        }
    }

    fn parameter(&mut self, function: NodeId, pattern: &BindingPattern<'_>, span: oxc_span::Span) {
        let kind = NodeKind::Parameter {
            name: pattern.get_identifier_name().map(|name| name.to_string()),
        };
        let id = self.push(function, Role::Param, kind, span);
        if let Some(annotation) = pattern_annotation(pattern) {
            self.type_annotation(id, annotation);
        }
        if let BindingPatternKind::AssignmentPattern(assign) = &pattern.kind {
            self.expression(id, Role::Init, &assign.right);
        }
    }

    fn type_annotation(&mut self, parent: NodeId, annotation: &TSTypeAnnotation<'_>) {
        self.ts_type(parent, Role::TypeAnnotation, &annotation.type_annotation);
    }

    fn ts_type(&mut self, parent: NodeId, role: Role, ty: &TSType<'_>) {
        let kind = match ty {
            TSType::TSTypeReference(reference) => NodeKind::TypeReference {
                name: type_name(&reference.type_name),
            },
            TSType::TSUnionType(union) => {
                let id = self.push(parent, role, NodeKind::UnionType, union.span);
                for member in &union.types {
                    self.ts_type(id, Role::Member, member);
                }
                return;
            }
            TSType::TSParenthesizedType(inner) => {
                return self.ts_type(parent, role, &inner.type_annotation);
            }
            TSType::TSAnyKeyword(_) => keyword("any"),
            TSType::TSUnknownKeyword(_) => keyword("unknown"),
            TSType::TSUndefinedKeyword(_) => keyword("undefined"),
            TSType::TSNullKeyword(_) => keyword("null"),
            TSType::TSVoidKeyword(_) => keyword("void"),
            TSType::TSNeverKeyword(_) => keyword("never"),
            TSType::TSStringKeyword(_) => keyword("string"),
            TSType::TSNumberKeyword(_) => keyword("number"),
            TSType::TSBooleanKeyword(_) => keyword("boolean"),
            TSType::TSBigIntKeyword(_) => keyword("bigint"),
            _ => other("Type"),
        };
        self.push(parent, role, kind, ty.span());
    }

    fn function_body(&mut self, id: NodeId, body: &FunctionBody<'_>) {
        self.statements(id, Role::Body, &body.statements);
    }

    fn class(&mut self, parent: NodeId, role: Role, kind: NodeKind, class: &Class<'_>) {
        let id = self.push(parent, role, kind, class.span);
        if let Some(super_class) = &class.super_class {
            self.expression(id, Role::SuperClass, super_class);
        }
        for element in &class.body.body {
            match element {
                ClassElement::MethodDefinition(method) => {
                    let kind = NodeKind::FunctionExpression {
                        name: method.key.static_name().map(|name| name.to_string()),
                        is_async: method.value.r#async,
                    };
                    self.function(id, Role::Member, kind, &method.value);
                }
                ClassElement::PropertyDefinition(property) => {
                    if property.value.is_none() && property.type_annotation.is_none() {
                        continue;
                    }
                    let kind = NodeKind::Property {
                        key: property.key.static_name().map(|name| name.to_string()),
                    };
                    let property_id = self.push(id, Role::Member, kind, property.span);
                    if let Some(annotation) = &property.type_annotation {
                        self.type_annotation(property_id, annotation);
                    }
                    if let Some(value) = &property.value {
                        self.expression(property_id, Role::Value, value);
                    }
                }
                ClassElement::StaticBlock(block) => {
                    let block_id = self.push(id, Role::Member, NodeKind::BlockStatement, block.span);
                    self.statements(block_id, Role::Body, &block.body);
                }
                _ => {}
            }
        }
    }

    fn call(&mut self, parent: NodeId, role: Role, call: &CallExpression<'_>) {
        let id = self.push(
            parent,
            role,
            NodeKind::CallExpression {
                optional: call.optional,
            },
            call.span,
        );
        self.expression(id, Role::Callee, &call.callee);
        self.arguments(id, &call.arguments);
    }

    fn arguments(&mut self, call: NodeId, arguments: &[Argument<'_>]) {
        for argument in arguments {
            match argument {
                Argument::SpreadElement(spread) => {
                    let id = self.push(call, Role::Argument, NodeKind::SpreadElement, spread.span);
                    self.expression(id, Role::Expression, &spread.argument);
                }
                argument => {
                    if let Some(expression) = argument.as_expression() {
                        self.expression(call, Role::Argument, expression);
                    }
                }
            }
        }
    }

    fn member(&mut self, parent: NodeId, role: Role, member: &MemberExpression<'_>) {
        match member {
            MemberExpression::StaticMemberExpression(expr) => {
                let kind = NodeKind::MemberExpression {
                    computed: false,
                    optional: expr.optional,
                };
                let id = self.push(parent, role, kind, expr.span);
                self.expression(id, Role::Object, &expr.object);
                self.push(
                    id,
                    Role::Property,
                    NodeKind::identifier(expr.property.name.as_str()),
                    expr.property.span,
                );
            }
            MemberExpression::ComputedMemberExpression(expr) => {
                let kind = NodeKind::MemberExpression {
                    computed: true,
                    optional: expr.optional,
                };
                let id = self.push(parent, role, kind, expr.span);
                self.expression(id, Role::Object, &expr.object);
                self.expression(id, Role::Property, &expr.expression);
            }
            MemberExpression::PrivateFieldExpression(expr) => {
                let kind = NodeKind::MemberExpression {
                    computed: false,
                    optional: expr.optional,
                };
                let id = self.push(parent, role, kind, expr.span);
                self.expression(id, Role::Object, &expr.object);
                self.push(
                    id,
                    Role::Property,
                    NodeKind::identifier(format!("#{}", expr.field.name)),
                    expr.field.span,
                );
            }
        }
    }

    fn expression(&mut self, parent: NodeId, role: Role, expression: &Expression<'_>) {
        match expression {
            Expression::Identifier(ident) => {
                self.push(parent, role, NodeKind::identifier(ident.name.as_str()), ident.span);
            }
            Expression::CallExpression(call) => self.call(parent, role, call),
            Expression::NewExpression(new) => {
                let id = self.push(parent, role, NodeKind::NewExpression, new.span);
                self.expression(id, Role::Callee, &new.callee);
                self.arguments(id, &new.arguments);
            }
            Expression::StaticMemberExpression(_)
            | Expression::ComputedMemberExpression(_)
            | Expression::PrivateFieldExpression(_) => {
                if let Some(member) = expression.as_member_expression() {
                    self.member(parent, role, member);
                }
            }
            Expression::ChainExpression(chain) => {
                use oxc_ast::ast::ChainElement;
                match &chain.expression {
                    ChainElement::CallExpression(call) => self.call(parent, role, call),
                    ChainElement::TSNonNullExpression(expr) => {
                        self.expression(parent, role, &expr.expression)
                    }
                    element => {
                        if let Some(member) = element.as_member_expression() {
                            self.member(parent, role, member);
                        }
                    }
                }
            }
            Expression::ArrowFunctionExpression(arrow) => {
                let kind = NodeKind::ArrowFunctionExpression {
                    is_async: arrow.r#async,
                };
                let id = self.push(parent, role, kind, arrow.span);
                self.parameters(id, &arrow.params);
                match (arrow.expression, arrow.body.statements.first()) {
                    (true, Some(Statement::ExpressionStatement(stmt))) => {
                        self.expression(id, Role::Body, &stmt.expression)
                    }
                    _ => self.function_body(id, &arrow.body),
                }
            }
            Expression::FunctionExpression(function) => {
                let kind = NodeKind::FunctionExpression {
                    name: function.id.as_ref().map(|id| id.name.to_string()),
                    is_async: function.r#async,
                };
                self.function(parent, role, kind, function);
            }
            Expression::ClassExpression(class) => {
                self.class(parent, role, other("ClassExpression"), class);
            }
            Expression::ThisExpression(this) => {
                self.push(parent, role, NodeKind::ThisExpression, this.span);
            }
            Expression::StringLiteral(lit) => {
                self.push(parent, role, NodeKind::string(lit.value.as_str()), lit.span);
            }
            Expression::NumericLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::RegExpLiteral(_) => {
                let span = expression.span();
                let raw = span.source_text(self.source).to_string();
                self.push(parent, role, NodeKind::Literal { raw }, span);
            }
            Expression::TemplateLiteral(template) => {
                let id = self.push(parent, role, other("TemplateLiteral"), template.span);
                for part in &template.expressions {
                    self.expression(id, Role::Child, part);
                }
            }
            Expression::TaggedTemplateExpression(tagged) => {
                let id = self.push(parent, role, other("TaggedTemplateExpression"), tagged.span);
                self.expression(id, Role::Callee, &tagged.tag);
                for part in &tagged.quasi.expressions {
                    self.expression(id, Role::Child, part);
                }
            }
            Expression::ObjectExpression(object) => {
                let id = self.push(parent, role, NodeKind::ObjectExpression, object.span);
                for property in &object.properties {
                    match property {
                        ObjectPropertyKind::ObjectProperty(prop) => {
                            let kind = NodeKind::Property {
                                key: prop.key.static_name().map(|name| name.to_string()),
                            };
                            let prop_id = self.push(id, Role::Property, kind, prop.span);
                            self.expression(prop_id, Role::Value, &prop.value);
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            let spread_id =
                                self.push(id, Role::Property, NodeKind::SpreadElement, spread.span);
                            self.expression(spread_id, Role::Expression, &spread.argument);
                        }
                    }
                }
            }
            Expression::ArrayExpression(array) => {
                let id = self.push(parent, role, NodeKind::ArrayExpression, array.span);
                for element in &array.elements {
                    match element {
                        ArrayExpressionElement::SpreadElement(spread) => {
                            let spread_id =
                                self.push(id, Role::Element, NodeKind::SpreadElement, spread.span);
                            self.expression(spread_id, Role::Expression, &spread.argument);
                        }
                        element => {
                            if let Some(expression) = element.as_expression() {
                                self.expression(id, Role::Element, expression);
                            }
                        }
                    }
                }
            }
            Expression::ParenthesizedExpression(expr) => {
                self.expression(parent, role, &expr.expression)
            }
            Expression::TSAsExpression(expr) => self.expression(parent, role, &expr.expression),
            Expression::TSSatisfiesExpression(expr) => {
                self.expression(parent, role, &expr.expression)
            }
            Expression::TSNonNullExpression(expr) => self.expression(parent, role, &expr.expression),
            Expression::TSTypeAssertion(expr) => self.expression(parent, role, &expr.expression),
            Expression::TSInstantiationExpression(expr) => {
                self.expression(parent, role, &expr.expression)
            }
            Expression::AssignmentExpression(assign) => {
                let id = self.push(parent, role, other("AssignmentExpression"), assign.span);
                self.expression(id, Role::Value, &assign.right);
            }
            Expression::AwaitExpression(expr) => {
                let id = self.push(parent, role, other("AwaitExpression"), expr.span);
                self.expression(id, Role::Expression, &expr.argument);
            }
            Expression::YieldExpression(expr) => {
                let id = self.push(parent, role, other("YieldExpression"), expr.span);
                if let Some(argument) = &expr.argument {
                    self.expression(id, Role::Expression, argument);
                }
            }
            Expression::UnaryExpression(expr) => {
                let id = self.push(parent, role, other("UnaryExpression"), expr.span);
                self.expression(id, Role::Expression, &expr.argument);
            }
            Expression::BinaryExpression(expr) => {
                let id = self.push(parent, role, other("BinaryExpression"), expr.span);
                self.expression(id, Role::Child, &expr.left);
                self.expression(id, Role::Child, &expr.right);
            }
            Expression::LogicalExpression(expr) => {
                let id = self.push(parent, role, other("LogicalExpression"), expr.span);
                self.expression(id, Role::Child, &expr.left);
                self.expression(id, Role::Child, &expr.right);
            }
            Expression::ConditionalExpression(expr) => {
                let id = self.push(parent, role, other("ConditionalExpression"), expr.span);
                self.expression(id, Role::Test, &expr.test);
                self.expression(id, Role::Consequent, &expr.consequent);
                self.expression(id, Role::Alternate, &expr.alternate);
            }
            Expression::SequenceExpression(expr) => {
                let id = self.push(parent, role, other("SequenceExpression"), expr.span);
                for part in &expr.expressions {
                    self.expression(id, Role::Child, part);
                }
            }
            Expression::ImportExpression(expr) => {
                let id = self.push(parent, role, other("ImportExpression"), expr.span);
                self.expression(id, Role::Source, &expr.source);
            }
            other_expression => {
                self.push(parent, role, other("Expression"), other_expression.span());
            }
        }
    }
}
