//! Type expressions rendered as Rust.
//!
//! A GraphQL type expression has two Rust forms:
//! - the *reference*, used in signatures: nullability and lists applied,
//!   composite types wrapped in their existential (`Option<Box<dyn UserObject>>`);
//! - the *declaration name*, the bare contract (`UserObject`).
//!
//! The same walk also produces the runtime bridge expressions the schema
//! builder uses to decode arguments and convert results.

use crate::literal::rust_string;
use crate::names::{self, NameMapper};
use crate::{Error, Result};
use gqlgen_schema::{NamedType, Schema, TypeExpr, TypeKind};
use rustc_hash::FxHashSet;

/// Maps GraphQL built-in scalars to Rust types.
#[must_use]
pub fn builtin_scalar(name: &str) -> Option<&'static str> {
    Some(match name {
        "ID" | "String" => "String",
        "Int" => "i32",
        "Float" => "f64",
        "Boolean" => "bool",
        _ => return None,
    })
}

/// Renders type expressions for one generated file.
#[derive(Clone, Copy)]
pub struct TypeFormatter<'a> {
    schema: &'a Schema,
    names: &'a NameMapper,
    /// Path prefix of generated declarations (`types::` from the schema file).
    prefix: &'a str,
    /// Inputs decoded through their generated default filler.
    defaulted: Option<&'a FxHashSet<&'a str>>,
}

impl<'a> TypeFormatter<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema, names: &'a NameMapper, prefix: &'a str) -> Self {
        Self {
            schema,
            names,
            prefix,
            defaulted: None,
        }
    }

    /// Decodes the given input objects through `<Name>_defaults`.
    #[must_use]
    pub fn with_defaulted_inputs(mut self, inputs: &'a FxHashSet<&'a str>) -> Self {
        self.defaulted = Some(inputs);
        self
    }

    /// Renders the reference form of `ty`.
    pub fn reference(&self, ty: &TypeExpr) -> Result<String> {
        match ty {
            TypeExpr::NonNull(inner) => self.non_null(inner),
            _ => Ok(format!("Option<{}>", self.non_null(ty)?)),
        }
    }

    /// Renders `ty` as if it were non-null.
    fn non_null(&self, ty: &TypeExpr) -> Result<String> {
        match ty {
            TypeExpr::NonNull(inner) => self.non_null(inner),
            TypeExpr::List(item) => Ok(format!("Vec<{}>", self.reference(item)?)),
            TypeExpr::Named(name) => self.named(name),
        }
    }

    /// Renders the reference form of an input field that recurses back to
    /// its own input type, boxing the recursive value.
    pub fn boxed_reference(&self, ty: &TypeExpr) -> Result<String> {
        match ty {
            TypeExpr::NonNull(inner) => Ok(format!("Box<{}>", self.non_null(inner)?)),
            _ => Ok(format!("Option<Box<{}>>", self.non_null(ty)?)),
        }
    }

    fn named(&self, name: &str) -> Result<String> {
        if let Some(builtin) = builtin_scalar(name) {
            return Ok(builtin.to_string());
        }
        let (kind, declaration) = self.declared(name)?;
        Ok(if kind.is_composite() {
            format!("Box<dyn {declaration}>")
        } else {
            declaration
        })
    }

    /// Returns the kind and path of a named type's declaration.
    fn declared(&self, name: &str) -> Result<(TypeKind, String)> {
        let ty = self
            .schema
            .get(name)
            .ok_or_else(|| Error::unsupported(name, "the type is not defined"))?;
        if let NamedType::Scalar(_) = ty {
            return Ok((TypeKind::Scalar, format!("scalars::{}", names::identifier(name)?)));
        }
        if self.schema.is_root(name) {
            return Err(Error::unsupported(
                name,
                "root operation types cannot be used as field or argument types",
            ));
        }
        let declaration = self
            .names
            .declaration(name)
            .ok_or_else(|| Error::unsupported(name, "no declaration was generated for the type"))?;
        Ok((ty.kind(), format!("{}{declaration}", self.prefix)))
    }

    /// Renders the declaration name of the named type `ty` refers to.
    pub fn declaration_name(&self, ty: &TypeExpr) -> Result<String> {
        let name = ty.name();
        if let Some(builtin) = builtin_scalar(name) {
            return Ok(builtin.to_string());
        }
        self.declared(name).map(|(_, declaration)| declaration)
    }

    /// Renders the `runtime::input` decoder for an argument of type `ty`.
    pub fn input_decoder(&self, ty: &TypeExpr) -> Result<String> {
        match ty {
            TypeExpr::NonNull(inner) => self.input_decoder_non_null(inner),
            _ => Ok(format!(
                "runtime::input::nullable({})",
                self.input_decoder_non_null(ty)?
            )),
        }
    }

    fn input_decoder_non_null(&self, ty: &TypeExpr) -> Result<String> {
        match ty {
            TypeExpr::NonNull(inner) => self.input_decoder_non_null(inner),
            TypeExpr::List(item) => Ok(format!("runtime::input::list({})", self.input_decoder(item)?)),
            TypeExpr::Named(name) => {
                if let Some(builtin) = builtin_scalar(name) {
                    return Ok(format!("runtime::input::value::<{builtin}>()"));
                }
                match self.declared(name)? {
                    (TypeKind::Scalar, path) => Ok(format!("runtime::input::scalar::<{path}>()")),
                    (TypeKind::InputObject, path)
                        if self.defaulted.is_some_and(|inputs| inputs.contains(name.as_str())) =>
                    {
                        Ok(format!(
                            "runtime::input::with_defaults({}, runtime::input::value::<{path}>())",
                            defaults_fn(name)
                        ))
                    }
                    (TypeKind::Enum | TypeKind::InputObject, path) => {
                        Ok(format!("runtime::input::value::<{path}>()"))
                    }
                    (kind, _) => Err(Error::unsupported(
                        name.as_str(),
                        format!("{kind} types cannot be used as arguments"),
                    )),
                }
            }
        }
    }

    /// Renders the `runtime::output` converter for a result of type `ty`.
    ///
    /// Interface and union values go through the generated discriminator
    /// `<Name>_value::<R>`.
    pub fn output_converter(&self, ty: &TypeExpr) -> Result<String> {
        match ty {
            TypeExpr::NonNull(inner) => self.output_converter_non_null(inner),
            _ => Ok(format!(
                "runtime::output::nullable({})",
                self.output_converter_non_null(ty)?
            )),
        }
    }

    fn output_converter_non_null(&self, ty: &TypeExpr) -> Result<String> {
        match ty {
            TypeExpr::NonNull(inner) => self.output_converter_non_null(inner),
            TypeExpr::List(item) => Ok(format!(
                "runtime::output::list({})",
                self.output_converter(item)?
            )),
            TypeExpr::Named(name) => {
                if let Some(builtin) = builtin_scalar(name) {
                    return Ok(format!("runtime::output::value::<{builtin}>()"));
                }
                Ok(match self.declared(name)? {
                    (TypeKind::Scalar, path) => format!("runtime::output::scalar::<{path}>()"),
                    (TypeKind::Enum, path) => format!("runtime::output::enumeration::<{path}>()"),
                    (TypeKind::Object, path) => {
                        format!("runtime::output::object::<Box<dyn {path}>>()")
                    }
                    (TypeKind::Interface | TypeKind::Union, _) => discriminator_fn(name),
                    (TypeKind::InputObject, _) => {
                        return Err(Error::unsupported(
                            name.as_str(),
                            "input object types cannot be returned by fields",
                        ))
                    }
                })
            }
        }
    }

    /// Renders the engine `TypeRef` for `ty`.
    #[must_use]
    pub fn engine_type_ref(ty: &TypeExpr) -> String {
        use TypeExpr::{List, Named, NonNull};

        let helper =
            |name: &str, function: &str| format!("dynamic::TypeRef::{function}({})", rust_string(name));
        match ty {
            Named(n) => helper(n, "named"),
            NonNull(inner) => match inner.as_ref() {
                Named(n) => helper(n, "named_nn"),
                List(item) => match item.as_ref() {
                    Named(n) => helper(n, "named_list_nn"),
                    NonNull(named) if matches!(named.as_ref(), Named(_)) => {
                        helper(named.name(), "named_nn_list_nn")
                    }
                    _ => format!("dynamic::TypeRef::NonNull(Box::new({}))", Self::engine_type_ref(inner)),
                },
                NonNull(_) => Self::engine_type_ref(inner),
            },
            List(item) => match item.as_ref() {
                Named(n) => helper(n, "named_list"),
                NonNull(named) if matches!(named.as_ref(), Named(_)) => {
                    helper(named.name(), "named_nn_list")
                }
                _ => format!("dynamic::TypeRef::List(Box::new({}))", Self::engine_type_ref(item)),
            },
        }
    }
}

/// Name of the generated discriminator for an interface or union.
#[must_use]
pub fn discriminator_fn(name: &str) -> String {
    format!("{name}_value::<R>")
}

/// Name of the generated default filler for an input object.
#[must_use]
pub fn defaults_fn(name: &str) -> String {
    format!("{name}_defaults")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlgen_schema::build_schema;

    const SDL: &str = r"
        scalar Date
        enum Role { USER }
        input Filter { role: Role }
        interface Node { id: ID! }
        union Search = User
        type User implements Node { id: ID! }
        type Query { node: Node }
    ";

    fn setup() -> (Schema, NameMapper) {
        let schema = build_schema(SDL).schema.unwrap();
        let mut names = NameMapper::new();
        for (name, kind) in [
            ("Role", TypeKind::Enum),
            ("Filter", TypeKind::InputObject),
            ("Node", TypeKind::Interface),
            ("Search", TypeKind::Union),
            ("User", TypeKind::Object),
            ("Query", TypeKind::Object),
        ] {
            names.declare(name, kind).unwrap();
        }
        (schema, names)
    }

    fn parse(ty: &str) -> TypeExpr {
        if let Some(inner) = ty.strip_suffix('!') {
            TypeExpr::non_null(parse(inner))
        } else if let Some(inner) = ty.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            TypeExpr::list(parse(inner))
        } else {
            TypeExpr::named(ty)
        }
    }

    #[test]
    fn test_references() {
        let (schema, names) = setup();
        let f = TypeFormatter::new(&schema, &names, "");
        let cases = [
            ("String", "Option<String>"),
            ("Int!", "i32"),
            ("[Float!]", "Option<Vec<f64>>"),
            ("[Boolean]!", "Vec<Option<bool>>"),
            ("Date", "Option<scalars::Date>"),
            ("Role!", "Role"),
            ("Filter", "Option<FilterInput>"),
            ("Node", "Option<Box<dyn NodeInterface>>"),
            ("[Search!]!", "Vec<Box<dyn SearchUnion>>"),
            ("[[User]]", "Option<Vec<Option<Vec<Option<Box<dyn UserObject>>>>>>"),
        ];
        for (ty, expected) in cases {
            assert_eq!(f.reference(&parse(ty)).unwrap(), expected, "{ty}");
        }
    }

    #[test]
    fn test_non_null_strips_outer_option() {
        let (schema, names) = setup();
        let f = TypeFormatter::new(&schema, &names, "");
        for ty in ["ID", "[ID]", "Node", "[Search!]", "Date", "Filter"] {
            let nullable = f.reference(&parse(ty)).unwrap();
            let non_null = f.reference(&parse(&format!("{ty}!"))).unwrap();
            assert_eq!(format!("Option<{non_null}>"), nullable);
        }
    }

    #[test]
    fn test_declaration_names_and_prefix() {
        let (schema, names) = setup();
        let f = TypeFormatter::new(&schema, &names, "types::");
        assert_eq!(f.declaration_name(&parse("[User!]")).unwrap(), "types::UserObject");
        assert_eq!(f.declaration_name(&parse("Date!")).unwrap(), "scalars::Date");
        assert_eq!(f.boxed_reference(&parse("Filter")).unwrap(), "Option<Box<types::FilterInput>>");
        assert_eq!(f.boxed_reference(&parse("Filter!")).unwrap(), "Box<types::FilterInput>");
    }

    #[test]
    fn test_root_types_are_unsupported_as_references() {
        let (schema, names) = setup();
        let f = TypeFormatter::new(&schema, &names, "");
        let error = f.reference(&parse("Query")).unwrap_err();
        assert_eq!(error.kind(), "UnsupportedType");
    }

    #[test]
    fn test_bridges() {
        let (schema, names) = setup();
        let f = TypeFormatter::new(&schema, &names, "types::");
        assert_eq!(
            f.input_decoder(&parse("[Role!]")).unwrap(),
            "runtime::input::nullable(runtime::input::list(runtime::input::value::<types::Role>()))"
        );
        assert_eq!(
            f.input_decoder(&parse("Date!")).unwrap(),
            "runtime::input::scalar::<scalars::Date>()"
        );
        assert_eq!(
            f.output_converter(&parse("[Node!]")).unwrap(),
            "runtime::output::nullable(runtime::output::list(Node_value::<R>))"
        );
        assert_eq!(
            f.output_converter(&parse("User!")).unwrap(),
            "runtime::output::object::<Box<dyn types::UserObject>>()"
        );
        assert!(f.output_converter(&parse("Filter")).is_err());

        let defaulted: FxHashSet<&str> = ["Filter"].into_iter().collect();
        let f = f.with_defaulted_inputs(&defaulted);
        assert_eq!(
            f.input_decoder(&parse("[Filter!]!")).unwrap(),
            "runtime::input::list(runtime::input::with_defaults(Filter_defaults, runtime::input::value::<types::FilterInput>()))"
        );
        assert!(f.input_decoder(&parse("User")).is_err());
    }

    #[test]
    fn test_engine_type_refs() {
        let cases = [
            ("Int", r#"dynamic::TypeRef::named("Int")"#),
            ("Int!", r#"dynamic::TypeRef::named_nn("Int")"#),
            ("[Int]", r#"dynamic::TypeRef::named_list("Int")"#),
            ("[Int]!", r#"dynamic::TypeRef::named_list_nn("Int")"#),
            ("[Int!]", r#"dynamic::TypeRef::named_nn_list("Int")"#),
            ("[Int!]!", r#"dynamic::TypeRef::named_nn_list_nn("Int")"#),
            (
                "[[Int]]!",
                r#"dynamic::TypeRef::NonNull(Box::new(dynamic::TypeRef::List(Box::new(dynamic::TypeRef::named_list("Int")))))"#,
            ),
        ];
        for (ty, expected) in cases {
            assert_eq!(TypeFormatter::engine_type_ref(&parse(ty)), expected, "{ty}");
        }
    }
}
