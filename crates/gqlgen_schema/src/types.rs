//! The schema graph.
//!
//! Every entity is built once by the [`SchemaBuilder`](crate::SchemaBuilder)
//! and is read-only afterwards. Lists keep SDL source order; the derived
//! queries (`implementers`, `unions_containing`, ...) return names in
//! lexicographic order so callers get a stable emission order for free.

use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;

pub use gqlgen_syntax::OperationType;

/// Names of the scalars every schema provides.
pub const BUILTIN_SCALARS: [&str; 5] = ["ID", "String", "Int", "Float", "Boolean"];

/// Reason recorded for `@deprecated` without an explicit `reason`.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// A complete schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub description: Option<String>,
    /// Every named type, built-in scalars first, then SDL order.
    pub types: IndexMap<String, NamedType>,
    pub query: String,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

/// The kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    /// Returns true if values of this kind may appear in argument and input
    /// field positions.
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Scalar | Self::Enum | Self::InputObject)
    }

    /// Returns true if values of this kind may be returned by fields.
    #[must_use]
    pub const fn is_output(self) -> bool {
        !matches!(self, Self::InputObject)
    }

    /// Returns true for object, interface and union types.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input object",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named type.
#[derive(Debug, Clone, PartialEq)]
pub enum NamedType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl NamedType {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(t) => t.description.as_deref(),
            Self::Object(t) => t.description.as_deref(),
            Self::Interface(t) => t.description.as_deref(),
            Self::Union(t) => t.description.as_deref(),
            Self::Enum(t) => t.description.as_deref(),
            Self::InputObject(t) => t.description.as_deref(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::Enum(_) => TypeKind::Enum,
            Self::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Returns true for `ID`, `String`, `Int`, `Float` and `Boolean`.
    #[must_use]
    pub fn is_builtin_scalar(&self) -> bool {
        matches!(self, Self::Scalar(s) if s.builtin)
    }

    /// Returns the fields of object and interface types.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match self {
            Self::Object(t) => &t.fields,
            Self::Interface(t) => &t.fields,
            _ => &[],
        }
    }

    /// Returns the directly implemented interfaces of object and interface
    /// types.
    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        match self {
            Self::Object(t) => &t.interfaces,
            Self::Interface(t) => &t.interfaces,
            _ => &[],
        }
    }
}

/// A scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    pub builtin: bool,
    /// URL from `@specifiedBy(url:)`.
    pub specified_by: Option<String>,
}

/// An object type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<Field>,
}

/// An interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    /// Super-interfaces, as declared.
    pub interfaces: Vec<String>,
    pub fields: Vec<Field>,
}

/// A union type.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

/// An enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

/// An enum value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    /// Serialized form. SDL has no syntax for a distinct value, so this
    /// always equals `name` for schemas built from SDL.
    pub value: String,
    pub description: Option<String>,
    pub deprecation: Option<String>,
}

/// An input object type.
#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValue>,
}

/// A field of an object or interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<InputValue>,
    pub ty: TypeExpr,
    pub deprecation: Option<String>,
}

impl Field {
    /// Returns true if `other` has the same name, argument list and type.
    /// Descriptions, defaults and deprecations are not part of the signature.
    #[must_use]
    pub fn same_signature(&self, other: &Field) -> bool {
        self.name == other.name
            && self.ty == other.ty
            && self.arguments.len() == other.arguments.len()
            && self
                .arguments
                .iter()
                .zip(&other.arguments)
                .all(|(a, b)| a.name == b.name && a.ty == b.ty)
    }
}

/// An argument or input field.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeExpr,
    pub default_value: Option<ConstValue>,
    pub deprecation: Option<String>,
}

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Named(String),
    List(Box<TypeExpr>),
    NonNull(Box<TypeExpr>),
}

impl TypeExpr {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn list(inner: TypeExpr) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub fn non_null(inner: TypeExpr) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// Returns the innermost named type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.name(),
        }
    }

    #[must_use]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns true if a list wrapper appears anywhere in the expression.
    #[must_use]
    pub fn has_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.has_list(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A literal value tree, as found in default values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    Enum(String),
    List(Vec<ConstValue>),
    /// Fields in source order.
    Object(Vec<(String, ConstValue)>),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Enum(e) => f.write_str(e),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

impl Schema {
    /// Looks up a named type.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    /// Returns the kind of a named type.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.get(name).map(NamedType::kind)
    }

    /// Returns the root type name for an operation, if the schema has one.
    #[must_use]
    pub fn root(&self, operation: OperationType) -> Option<&str> {
        match operation {
            OperationType::Query => Some(&self.query),
            OperationType::Mutation => self.mutation.as_deref(),
            OperationType::Subscription => self.subscription.as_deref(),
        }
    }

    /// Returns the operation a type is the root of.
    #[must_use]
    pub fn root_operation(&self, name: &str) -> Option<OperationType> {
        [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ]
        .into_iter()
        .find(|op| self.root(*op) == Some(name))
    }

    /// Returns true if the type is a root operation type.
    #[must_use]
    pub fn is_root(&self, name: &str) -> bool {
        self.root_operation(name).is_some()
    }

    /// Returns every named type of a kind, sorted by name.
    #[must_use]
    pub fn sorted_of_kind(&self, kind: TypeKind) -> Vec<&NamedType> {
        let mut types: Vec<_> = self.types.values().filter(|t| t.kind() == kind).collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types
    }

    /// Returns every interface `name` implements, directly or through other
    /// interfaces, sorted and without duplicates.
    #[must_use]
    pub fn transitive_interfaces(&self, name: &str) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<&str> = vec![name];
        while let Some(current) = stack.pop() {
            let Some(ty) = self.get(current) else {
                continue;
            };
            for interface in ty.interfaces() {
                if interface != name && seen.insert(interface.as_str()) {
                    stack.push(interface);
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Returns the object types implementing an interface, directly or
    /// transitively, sorted by name.
    #[must_use]
    pub fn implementers(&self, interface: &str) -> Vec<&str> {
        self.sorted_of_kind(TypeKind::Object)
            .into_iter()
            .map(NamedType::name)
            .filter(|object| self.transitive_interfaces(object).contains(&interface))
            .collect()
    }

    /// Returns the unions an object type is a member of, sorted by name.
    #[must_use]
    pub fn unions_containing(&self, object: &str) -> Vec<&str> {
        self.sorted_of_kind(TypeKind::Union)
            .into_iter()
            .filter_map(|t| match t {
                NamedType::Union(u) if u.members.iter().any(|m| m == object) => {
                    Some(u.name.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Returns the object types an interface or union value may resolve to,
    /// sorted by name.
    #[must_use]
    pub fn possible_types(&self, abstract_type: &str) -> Vec<&str> {
        match self.get(abstract_type) {
            Some(NamedType::Interface(_)) => self.implementers(abstract_type),
            Some(NamedType::Union(u)) => {
                let mut members: Vec<&str> = u.members.iter().map(String::as_str).collect();
                members.sort_unstable();
                members.dedup();
                members
            }
            _ => Vec::new(),
        }
    }
}
