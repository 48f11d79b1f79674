//! Type oracle
//!
//! Rules ask one question of the type system: "could the static type of this
//! expression satisfy this predicate?" The answer is three-valued. `Unknown`
//! means no type information is available at all and is never coerced to
//! `Yes` or `No`; rules that need types report only on `Yes`.
//!
//! Type resolution itself sits behind [`TypeProvider`], reached through an
//! explicit [`TypeContext`] built once per run. For every file the context
//! hands out a [`TypeOracle`] bound to that file's tree.

use crate::Result;
use regex::Regex;
use rxlint_core::{NodeId, SyntaxTree};
use std::fmt;

/// Answer to a `could_be` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeAnswer {
    Yes,
    No,
    /// No type information was available to decide.
    Unknown,
}

impl TypeAnswer {
    pub fn is_yes(self) -> bool {
        self == TypeAnswer::Yes
    }

    /// `Yes` wins over `Unknown`, which wins over `No`.
    pub fn or(self, other: TypeAnswer) -> TypeAnswer {
        match (self, other) {
            (TypeAnswer::Yes, _) | (_, TypeAnswer::Yes) => TypeAnswer::Yes,
            (TypeAnswer::Unknown, _) | (_, TypeAnswer::Unknown) => TypeAnswer::Unknown,
            _ => TypeAnswer::No,
        }
    }
}

/// Semantic categories the built-in rules care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Observable,
    Subscribable,
    Subject,
    BehaviorSubject,
}

impl Capability {
    /// Type names that satisfy this capability, directly or as a base type.
    pub fn type_names(self) -> &'static [&'static str] {
        match self {
            Capability::Observable => &["Observable"],
            Capability::Subscribable => &["Subscribable", "InteropObservable"],
            Capability::Subject => &["Subject"],
            Capability::BehaviorSubject => &["BehaviorSubject"],
        }
    }
}

/// Condition over a node's static type.
#[derive(Debug, Clone)]
pub enum TypePredicate {
    Capability(Capability),
    /// Exact type name, matched against the type and its base types.
    Named(String),
    /// Regex over the type name and its base types.
    Pattern(Regex),
}

impl TypePredicate {
    pub fn named(name: impl Into<String>) -> Self {
        TypePredicate::Named(name.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        crate::selector::compile_regex_safe(pattern).map(TypePredicate::Pattern)
    }

    fn accepts_name(&self, name: &str) -> bool {
        match self {
            TypePredicate::Capability(capability) => capability.type_names().contains(&name),
            TypePredicate::Named(expected) => expected == name,
            TypePredicate::Pattern(regex) => regex.is_match(name),
        }
    }
}

impl From<Capability> for TypePredicate {
    fn from(capability: Capability) -> Self {
        TypePredicate::Capability(capability)
    }
}

/// Static type of an expression, as far as a provider can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticType {
    /// Nominal type with its base types (nearest first).
    Named { name: String, bases: Vec<String> },
    Union(Vec<StaticType>),
    Intersection(Vec<StaticType>),
    /// Erased type (`any`): could be anything.
    Any,
    Primitive(String),
    Function,
    /// The provider has nothing for this position.
    Unresolved,
}

impl StaticType {
    pub fn named(name: impl Into<String>) -> Self {
        StaticType::Named {
            name: name.into(),
            bases: Vec::new(),
        }
    }

    pub fn with_bases<I, S>(name: impl Into<String>, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticType::Named {
            name: name.into(),
            bases: bases.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this type could satisfy `predicate`.
    pub fn could_be(&self, predicate: &TypePredicate) -> bool {
        match self {
            StaticType::Named { name, bases } => {
                predicate.accepts_name(name) || bases.iter().any(|b| predicate.accepts_name(b))
            }
            StaticType::Union(members) | StaticType::Intersection(members) => {
                members.iter().any(|member| member.could_be(predicate))
            }
            StaticType::Any => true,
            StaticType::Primitive(_) | StaticType::Function | StaticType::Unresolved => false,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, members: &[StaticType], sep: &str) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", member)?;
    }
    Ok(())
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticType::Named { name, .. } => f.write_str(name),
            StaticType::Union(members) => write_joined(f, members, " | "),
            StaticType::Intersection(members) => write_joined(f, members, " & "),
            StaticType::Any => f.write_str("any"),
            StaticType::Primitive(name) => f.write_str(name),
            StaticType::Function => f.write_str("Function"),
            StaticType::Unresolved => f.write_str("<unresolved>"),
        }
    }
}

/// Resolves node types within one file.
pub trait TypeResolver {
    fn type_of(&self, node: NodeId) -> StaticType;
}

/// A semantic-analysis phase able to resolve types for any file.
pub trait TypeProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Prepare a resolver for `tree`. Called once per file.
    fn resolver<'t>(&self, tree: &'t SyntaxTree) -> Box<dyn TypeResolver + 't>;
}

/// Run-wide type context, passed explicitly to every lint pass.
#[derive(Default)]
pub struct TypeContext {
    provider: Option<Box<dyn TypeProvider>>,
}

impl TypeContext {
    /// A context without type information: every query answers `Unknown`.
    pub fn none() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: impl TypeProvider + 'static) -> Self {
        Self {
            provider: Some(Box::new(provider)),
        }
    }

    pub fn has_type_information(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    pub fn oracle_for<'t>(&'t self, tree: &'t SyntaxTree) -> TypeOracle<'t> {
        TypeOracle {
            resolver: self.provider.as_ref().map(|p| p.resolver(tree)),
        }
    }
}

impl fmt::Debug for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeContext")
            .field("provider", &self.provider_name())
            .finish()
    }
}

/// Per-file oracle. Answers are computed on demand and never cached.
pub struct TypeOracle<'t> {
    resolver: Option<Box<dyn TypeResolver + 't>>,
}

impl<'t> TypeOracle<'t> {
    /// Oracle over an explicit resolver.
    pub fn new(resolver: Box<dyn TypeResolver + 't>) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    /// Oracle without type information.
    pub fn unavailable() -> Self {
        Self { resolver: None }
    }

    pub fn has_type_information(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn type_of(&self, node: NodeId) -> Option<StaticType> {
        self.resolver.as_ref().map(|r| r.type_of(node))
    }

    pub fn could_be(&self, node: NodeId, predicate: &TypePredicate) -> TypeAnswer {
        match self.type_of(node) {
            None => TypeAnswer::Unknown,
            Some(ty) if ty.could_be(predicate) => TypeAnswer::Yes,
            Some(_) => TypeAnswer::No,
        }
    }

    /// `Yes` if any predicate answers `Yes`.
    pub fn could_be_any(&self, node: NodeId, predicates: &[TypePredicate]) -> TypeAnswer {
        predicates
            .iter()
            .fold(TypeAnswer::No, |acc, p| acc.or(self.could_be(node, p)))
    }

    pub fn could_be_observable(&self, node: NodeId) -> TypeAnswer {
        self.could_be(node, &Capability::Observable.into())
    }
}
