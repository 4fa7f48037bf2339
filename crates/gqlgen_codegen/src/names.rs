//! GraphQL name to Rust identifier mapping.
//!
//! | GraphQL name | Rust identifier |
//! |--------------|-----------------|
//! | `user`, `firstName` | unchanged |
//! | strict or reserved keyword (`type`, `async`) | raw identifier (`r#type`) |
//! | `self`, `Self`, `super`, `crate`, `_` | underscore suffix (`self_`) |
//!
//! Type declarations additionally carry a kind suffix (`UserObject`,
//! `NodeInterface`, `SearchUnion`, `FilterInput`; enums keep their name) and
//! are deduplicated against a reserved set with `_` suffixes.

use crate::{Error, Result};
use gqlgen_schema::TypeKind;
use rustc_hash::{FxHashMap, FxHashSet};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Names generated declarations must never take.
const RESERVED: &[&str] = &[
    // prelude and primitives
    "Option", "Some", "None", "Result", "Ok", "Err", "Vec", "Box", "String", "ToString",
    "ToOwned", "Clone", "Copy", "Send", "Sync", "Sized", "Unpin", "Default", "Drop", "Fn",
    "FnMut", "FnOnce", "Iterator", "IntoIterator", "Extend", "Eq", "PartialEq", "Ord",
    "PartialOrd", "Hash", "Debug", "Display", "From", "Into", "TryFrom", "TryInto", "AsRef",
    "AsMut", "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64",
    // names generated code relies on
    "Context", "Resolvers", "ResolveInfo", "AnyStream", "IntoAny", "async_trait", "scalars",
    "runtime", "types", "dynamic", "Serialize", "Deserialize", "std", "core", "alloc",
];

/// Returns true if `name` is a valid GraphQL name.
#[must_use]
pub fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Maps a GraphQL name to a Rust identifier.
pub fn identifier(name: &str) -> Result<String> {
    if !is_graphql_name(name) {
        return Err(Error::name_mapping(
            name,
            "GraphQL names must match `[_A-Za-z][_0-9A-Za-z]*`",
        ));
    }
    Ok(if NON_RAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    })
}

/// Returns the identifier without a raw-identifier prefix.
#[must_use]
pub fn unraw(identifier: &str) -> &str {
    identifier.strip_prefix("r#").unwrap_or(identifier)
}

/// Validates a `::`-separated Rust path such as `crate::api::Context`.
pub fn validate_path(path: &str) -> Result<()> {
    let segments: Vec<&str> = path.split("::").collect();
    let valid = segments.iter().enumerate().all(|(i, segment)| {
        let segment = unraw(segment);
        is_graphql_name(segment)
            && segment != "_"
            && (i == 0 || !matches!(segment, "crate" | "self" | "Self"))
    });
    if valid {
        Ok(())
    } else {
        Err(Error::name_mapping(path, "expected a `::`-separated Rust path"))
    }
}

/// Allocates identifiers that must be unique within one scope, such as the
/// methods of a trait or the parameters of a method.
#[derive(Debug, Default)]
pub struct Scope {
    taken: FxHashSet<String>,
}

impl Scope {
    /// Creates a scope where `reserved` are already taken.
    #[must_use]
    pub fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Maps `name` and makes it unique within the scope.
    pub fn allocate(&mut self, name: &str) -> Result<String> {
        let mut ident = identifier(name)?;
        while self.taken.contains(unraw(&ident)) {
            ident = format!("{}_", unraw(&ident));
        }
        self.taken.insert(unraw(&ident).to_string());
        Ok(ident)
    }
}

/// Declaration names for one generation run.
///
/// Names are assigned in emission order, so the same schema always yields
/// the same names.
#[derive(Debug)]
pub struct NameMapper {
    scope: Scope,
    declarations: FxHashMap<String, String>,
}

impl Default for NameMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl NameMapper {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scope: Scope::with_reserved(RESERVED),
            declarations: FxHashMap::default(),
        }
    }

    /// Assigns the declaration name of a named type, memoized per name.
    pub fn declare(&mut self, name: &str, kind: TypeKind) -> Result<String> {
        if let Some(declared) = self.declarations.get(name) {
            return Ok(declared.clone());
        }
        if !is_graphql_name(name) {
            return Err(Error::name_mapping(
                name,
                "GraphQL names must match `[_A-Za-z][_0-9A-Za-z]*`",
            ));
        }
        let declared = self.scope.allocate(&format!("{name}{}", kind_suffix(kind)))?;
        self.declarations.insert(name.to_string(), declared.clone());
        Ok(declared)
    }

    /// Returns the declaration name assigned to `name`.
    #[must_use]
    pub fn declaration(&self, name: &str) -> Option<&str> {
        self.declarations.get(name).map(String::as_str)
    }
}

/// Returns the suffix declarations of `kind` carry.
#[must_use]
pub const fn kind_suffix(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Object => "Object",
        TypeKind::Interface => "Interface",
        TypeKind::Union => "Union",
        TypeKind::InputObject => "Input",
        TypeKind::Enum | TypeKind::Scalar => "",
    }
}
