//! Parsing entry point.

use crate::lower::lower_program;
use crate::{BackendError, Result};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use rxlint_core::{LineIndex, SyntaxTree};
use std::path::Path;
use tracing::debug;

/// Whether `path` has an extension the parser understands.
pub fn is_supported_path(path: &Path) -> bool {
    SourceType::from_path(path).is_ok()
}

/// Parse `text` and lower it into a [`SyntaxTree`].
///
/// The source type (JavaScript, TypeScript, JSX) comes from the file
/// extension. Any syntax error fails the whole file; rules never see a
/// partially recovered tree.
pub fn parse_source(path: &Path, text: &str) -> Result<SyntaxTree> {
    if text.len() > LineIndex::MAX_SOURCE_LEN {
        return Err(rxlint_core::Error::SourceTooLarge {
            len: text.len(),
            max: LineIndex::MAX_SOURCE_LEN,
        }
        .into());
    }

    let source_type = SourceType::from_path(path).map_err(|_| BackendError::UnsupportedFile {
        path: path.to_path_buf(),
    })?;

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, text, source_type).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .first()
            .map(|error| error.to_string())
            .unwrap_or_else(|| "parser aborted".to_string());
        return Err(BackendError::Parse {
            path: path.to_path_buf(),
            message,
        });
    }

    let tree = lower_program(&parsed.program, text);
    debug!(path = %path.display(), nodes = tree.len(), "lowered source file");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxlint_core::{NodeKind, NodeType, Role};

    fn parse(text: &str) -> SyntaxTree {
        parse_source(Path::new("test.ts"), text).unwrap()
    }

    fn find_identifier(tree: &SyntaxTree, name: &str) -> Vec<rxlint_core::NodeId> {
        tree.preorder()
            .filter(|id| tree.identifier_name(*id) == Some(name))
            .collect()
    }

    #[test]
    fn test_member_call_shape() {
        let text = "a.subscribe(v => b.subscribe());";
        let tree = parse(text);
        let calls: Vec<_> = tree
            .preorder()
            .filter(|id| tree.node_type(*id) == NodeType::CallExpression)
            .collect();
        assert_eq!(calls.len(), 2);
        assert_eq!(tree.member_call_name(calls[0]), Some("subscribe"));

        let arrow = tree.arguments(calls[0]).next().unwrap();
        assert_eq!(tree.node_type(arrow), NodeType::ArrowFunctionExpression);
        // Expression-bodied arrows hold the expression directly.
        assert_eq!(tree.parent(calls[1]), Some(arrow));
        assert_eq!(tree.role(calls[1]), Role::Body);
    }

    #[test]
    fn test_property_spans_are_exact() {
        let text = "source$.pipe(map(x => x)).subscribe();";
        let tree = parse(text);
        for name in ["pipe", "subscribe", "map"] {
            let ids = find_identifier(&tree, name);
            assert_eq!(ids.len(), 1, "{}", name);
            assert_eq!(tree.span(ids[0]).source_text(text).unwrap(), name);
        }
    }

    #[test]
    fn test_import_declaration() {
        let tree = parse("import { map as m, tap } from \"rxjs/operators\";");
        let decl = tree
            .preorder()
            .find(|id| tree.node_type(*id) == NodeType::ImportDeclaration)
            .unwrap();
        let specifiers: Vec<_> = tree
            .children_in(decl, Role::Specifier)
            .map(|id| tree.kind(id).clone())
            .collect();
        assert_eq!(
            specifiers[0],
            NodeKind::ImportSpecifier {
                imported: "map".into(),
                local: "m".into()
            }
        );
        assert_eq!(specifiers.len(), 2);
        let source = tree.child(decl, Role::Source).unwrap();
        assert_eq!(tree.text(source), Some("rxjs/operators"));
    }

    #[test]
    fn test_typescript_wrappers_are_transparent() {
        let tree = parse("(subject as BehaviorSubject<number>)!.value;");
        let value = find_identifier(&tree, "value")[0];
        let member = tree.parent(value).unwrap();
        let (object, _) = tree.member_parts(member).unwrap();
        assert_eq!(tree.identifier_name(object), Some("subject"));
    }

    #[test]
    fn test_parameters_carry_annotations_and_defaults() {
        let tree = parse("function f(a: Observable<number>, b = of(1), ...rest) {}");
        let function = tree
            .preorder()
            .find(|id| tree.node_type(*id) == NodeType::FunctionDeclaration)
            .unwrap();
        let params: Vec<_> = tree.children_in(function, Role::Param).collect();
        assert_eq!(params.len(), 3);
        assert_eq!(tree.text(params[0]), Some("a"));
        let annotation = tree.child(params[0], Role::TypeAnnotation).unwrap();
        assert_eq!(
            tree.kind(annotation),
            &NodeKind::TypeReference {
                name: "Observable".into()
            }
        );
        let default = tree.child(params[1], Role::Init).unwrap();
        assert_eq!(tree.node_type(default), NodeType::CallExpression);
        assert_eq!(tree.text(params[2]), Some("rest"));
    }

    #[test]
    fn test_union_annotation_on_declarator() {
        let tree = parse("const s: (BehaviorSubject<number>) | undefined = make();");
        let declarator = tree
            .preorder()
            .find(|id| tree.node_type(*id) == NodeType::VariableDeclarator)
            .unwrap();
        let union = tree.child(declarator, Role::TypeAnnotation).unwrap();
        assert_eq!(tree.node_type(union), NodeType::UnionType);
        let members: Vec<_> = tree
            .children_in(union, Role::Member)
            .filter_map(|id| tree.text(id))
            .collect();
        assert_eq!(members, ["BehaviorSubject", "undefined"]);
        assert!(tree.child(declarator, Role::Init).is_some());
    }

    #[test]
    fn test_class_fields_and_this() {
        let tree = parse("class C { s: rx.Subject<void>; m() { this.s.next(); } }");
        let field = tree
            .preorder()
            .find(|id| tree.node_type(*id) == NodeType::Property)
            .unwrap();
        assert_eq!(tree.role(field), Role::Member);
        let annotation = tree.child(field, Role::TypeAnnotation).unwrap();
        assert_eq!(tree.text(annotation), Some("rx.Subject"));
        assert!(tree
            .preorder()
            .any(|id| tree.node_type(id) == NodeType::ThisExpression));
    }

    #[test]
    fn test_calls_inside_other_constructs_are_lowered() {
        let tree = parse("if (ok) { for (const x of xs) { a.pipe(); } } else { `${b.pipe()}`; }");
        let pipes = find_identifier(&tree, "pipe");
        assert_eq!(pipes.len(), 2);
    }

    #[test]
    fn test_async_arrow_flag() {
        let tree = parse("a.subscribe(async () => { await x; });");
        assert!(tree.preorder().any(|id| tree.kind(id).is_async_function()));
    }

    #[test]
    fn test_syntax_error_fails_the_file() {
        let err = parse_source(Path::new("bad.js"), "a.subscribe(").unwrap_err();
        assert!(matches!(err, BackendError::Parse { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_source(Path::new("style.css"), "a {}").unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedFile { .. }));
        assert!(!is_supported_path(Path::new("style.css")));
        assert!(is_supported_path(Path::new("component.tsx")));
    }
}
