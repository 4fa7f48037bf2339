//! Emits `types.rs`.
//!
//! Declarations appear in a fixed order, each group sorted by name: custom
//! scalar assertions, enums, input objects, interfaces, unions, objects (root
//! operation types included) and finally the `Resolvers` trait. Imports are
//! collected while the body is written and emitted in front of it.

use crate::contracts::{Contract, Method};
use crate::names::{self, unraw, Scope};
use crate::plan::Plan;
use crate::type_ref::TypeFormatter;
use crate::writer::CodeWriter;
use crate::{Error, Result, BANNER};
use gqlgen_schema::{
    EnumType, InputObjectType, NamedType, OperationType, TypeKind, UnionType,
};

/// Associated names an enum's variants must not shadow.
const ENUM_ITEMS: &[&str] = &["ALL", "as_str"];

pub fn emit(plan: &Plan<'_>) -> Result<String> {
    let formatter = TypeFormatter::new(plan.schema, &plan.names, "");
    let mut emitter = TypesEmitter {
        plan,
        formatter,
        out: CodeWriter::new(),
        uses: Uses::default(),
    };
    emitter.emit_body()?;
    let body = emitter.out.finish();
    let mut file = emitter.uses.header(plan);
    file.push_str(&body);
    tracing::info!(bytes = file.len(), "emitted types");
    Ok(file)
}

/// Names the body refers to.
#[derive(Default)]
struct Uses {
    context: bool,
    scalars: bool,
    serde: bool,
    async_trait: bool,
    any_stream: bool,
    into_any: bool,
    resolve_info: bool,
    result: bool,
}

impl Uses {
    fn header(&self, plan: &Plan<'_>) -> String {
        let options = plan.options;
        let mut out = CodeWriter::new();
        out.line(BANNER);
        out.blank();
        if self.context {
            out.line(use_as(&options.context_type, "Context"));
        }
        if self.scalars {
            out.line(use_as(&options.scalars_module, "scalars"));
        }
        let items: Vec<&str> = [
            (self.async_trait, "async_trait"),
            (self.any_stream, "AnyStream"),
            (self.into_any, "IntoAny"),
            (self.resolve_info, "ResolveInfo"),
            (self.result, "Result"),
        ]
        .into_iter()
        .filter_map(|(used, item)| used.then_some(item))
        .collect();
        if self.scalars || self.serde || !items.is_empty() {
            out.line(format!("use {} as runtime;", options.runtime_crate));
        }
        if self.serde {
            out.line("use runtime::serde::{Deserialize, Serialize};");
        }
        match items.as_slice() {
            [] => {}
            [item] => out.line(format!("use runtime::{item};")),
            items => out.line(format!("use runtime::{{{}}};", items.join(", "))),
        }
        out.blank();
        out.finish()
    }
}

/// Renders a `use` item that brings `path` into scope as `alias`.
pub(crate) fn use_as(path: &str, alias: &str) -> String {
    let last = path.rsplit("::").next().unwrap_or(path);
    if unraw(last) == alias {
        format!("use {path};")
    } else {
        format!("use {path} as {alias};")
    }
}

/// Returns the `allow` attribute a declaration name needs, if any.
fn camel_case_allow(name: &str) -> Option<&'static str> {
    let name = unraw(name).trim_end_matches('_');
    let camel = name.starts_with(|c: char| c.is_ascii_uppercase()) && !name.contains('_');
    (!camel).then_some("#[allow(non_camel_case_types)]")
}

fn is_snake_case(ident: &str) -> bool {
    !unraw(ident).chars().any(|c| c.is_ascii_uppercase())
}

struct TypesEmitter<'p, 's> {
    plan: &'p Plan<'s>,
    formatter: TypeFormatter<'p>,
    out: CodeWriter,
    uses: Uses,
}

impl TypesEmitter<'_, '_> {
    fn emit_body(&mut self) -> Result<()> {
        let scalars = self.plan.custom_scalars();
        for scalar in &scalars {
            self.uses.scalars = true;
            self.doc(scalar.description());
            self.out.line(format!(
                "const _: () = runtime::assert_scalar::<scalars::{}>();",
                names::identifier(scalar.name())?
            ));
        }
        self.out.blank();

        for ty in self.plan.sorted(TypeKind::Enum) {
            if let NamedType::Enum(ty) = ty {
                self.emit_enum(ty)?;
                self.out.blank();
            }
        }
        for ty in self.plan.sorted(TypeKind::InputObject) {
            if let NamedType::InputObject(ty) = ty {
                self.emit_input(ty)?;
                self.out.blank();
            }
        }
        for kind in [TypeKind::Interface, TypeKind::Union, TypeKind::Object] {
            for ty in self.plan.sorted(kind) {
                match ty {
                    NamedType::Union(ty) => self.emit_union(ty)?,
                    _ => self.emit_contract(ty)?,
                }
                self.out.blank();
            }
        }
        self.emit_resolvers()
    }

    fn declaration(&self, name: &str) -> Result<String> {
        self.plan
            .names
            .declaration(name)
            .map(str::to_string)
            .ok_or_else(|| Error::unsupported(name, "no declaration was generated for the type"))
    }

    fn doc(&mut self, description: Option<&str>) {
        if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
            self.out.doc(description);
        }
    }

    fn emit_enum(&mut self, ty: &EnumType) -> Result<()> {
        self.uses.serde = true;
        let name = self.declaration(&ty.name)?;
        let mut scope = Scope::with_reserved(ENUM_ITEMS);
        let variants = ty
            .values
            .iter()
            .map(|value| Ok((scope.allocate(&value.name)?, value)))
            .collect::<Result<Vec<_>>>()?;

        self.doc(ty.description.as_deref());
        self.out
            .line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]");
        self.out
            .line(format!("#[serde(crate = \"{}\")]", self.plan.serde_crate()));
        self.out.line("#[allow(non_camel_case_types)]");
        self.out.open(format!("pub enum {name} {{"));
        for (ident, value) in &variants {
            let mut doc = value.description.clone().unwrap_or_default();
            if let Some(reason) = &value.deprecation {
                push_paragraph(&mut doc, &format!("Deprecated: {reason}"));
            }
            self.doc(Some(&doc));
            if unraw(ident) != value.value {
                self.out.line(format!(
                    "#[serde(rename = {})]",
                    crate::literal::rust_string(&value.value)
                ));
            }
            self.out.line(format!("{ident},"));
        }
        self.out.close("}");
        self.out.blank();

        let all: Vec<String> = variants.iter().map(|(ident, _)| format!("Self::{ident}")).collect();
        self.out.line("#[allow(dead_code)]");
        self.out.open(format!("impl {name} {{"));
        self.out.line("/// Every value, in schema order.");
        self.out
            .line(format!("pub const ALL: &[Self] = &[{}];", all.join(", ")));
        self.out.blank();
        self.out.line("/// Returns the GraphQL name of the value.");
        self.out.open("pub const fn as_str(self) -> &'static str {");
        self.out.open("match self {");
        for (ident, value) in &variants {
            self.out.line(format!(
                "Self::{ident} => {},",
                crate::literal::rust_string(&value.value)
            ));
        }
        self.out.close("}");
        self.out.close("}");
        self.out.close("}");
        self.out.blank();

        self.out.open(format!("impl std::fmt::Display for {name} {{"));
        self.out
            .open("fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {");
        self.out.line("f.write_str(self.as_str())");
        self.out.close("}");
        self.out.close("}");
        self.out.blank();

        self.out.open(format!("impl std::str::FromStr for {name} {{"));
        self.out.line("type Err = String;");
        self.out.blank();
        self.out
            .open("fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {");
        self.out.open("match s {");
        for (ident, value) in &variants {
            self.out.line(format!(
                "{} => Ok(Self::{ident}),",
                crate::literal::rust_string(&value.value)
            ));
        }
        self.out.line(format!(
            "_ => Err(format!(\"unknown `{}` value `{{s}}`\")),",
            ty.name
        ));
        self.out.close("}");
        self.out.close("}");
        self.out.close("}");
        Ok(())
    }

    fn emit_input(&mut self, ty: &InputObjectType) -> Result<()> {
        self.uses.serde = true;
        let name = self.declaration(&ty.name)?;
        self.doc(ty.description.as_deref());
        self.out.line("#[derive(Debug, Clone, Serialize, Deserialize)]");
        self.out
            .line(format!("#[serde(crate = \"{}\")]", self.plan.serde_crate()));
        if let Some(allow) = camel_case_allow(&name) {
            self.out.line(allow);
        }
        self.out.line("#[allow(non_snake_case)]");
        self.out.open(format!("pub struct {name} {{"));
        let mut scope = Scope::default();
        for field in &ty.fields {
            let ident = scope.allocate(&field.name)?;
            let reference = if self.plan.is_recursive_field(&ty.name, &field.name) {
                self.formatter.boxed_reference(&field.ty)?
            } else {
                self.formatter.reference(&field.ty)?
            };
            let mut doc = field.description.clone().unwrap_or_default();
            if let Some(default) = &field.default_value {
                push_paragraph(&mut doc, &format!("Defaults to `{default}`."));
            }
            if let Some(reason) = &field.deprecation {
                push_paragraph(&mut doc, &format!("Deprecated: {reason}"));
            }
            self.doc(Some(&doc));
            if unraw(&ident) != field.name {
                self.out.line(format!(
                    "#[serde(rename = {})]",
                    crate::literal::rust_string(&field.name)
                ));
            }
            self.out.line(format!("pub {ident}: {reference},"));
        }
        self.out.close("}");
        Ok(())
    }

    fn emit_union(&mut self, ty: &UnionType) -> Result<()> {
        self.uses.into_any = true;
        let name = self.declaration(&ty.name)?;
        self.doc(ty.description.as_deref());
        if ty.description.is_none() {
            self.out.line(format!(
                "/// Marker for values of the `{}` union: {}.",
                ty.name,
                ty.members
                    .iter()
                    .map(|m| format!("`{m}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        if let Some(allow) = camel_case_allow(&name) {
            self.out.line(allow);
        }
        self.out.line(format!("pub trait {name}: IntoAny {{}}"));
        Ok(())
    }

    fn emit_contract(&mut self, ty: &NamedType) -> Result<()> {
        let plan = self.plan;
        let Some(contract) = plan.contracts.get(ty.name()) else {
            return Err(Error::unsupported(ty.name(), "no resolver contract was planned"));
        };
        let bounds = if contract.root.is_some() {
            "Send + Sync + 'static".to_string()
        } else {
            self.uses.into_any = true;
            let mut bounds = contract.supertraits.clone();
            bounds.push("IntoAny".to_string());
            bounds.join(" + ")
        };

        self.doc(ty.description());
        if let Some(allow) = camel_case_allow(&contract.trait_name) {
            self.out.line(allow);
        }
        if contract.methods.is_empty() {
            self.out
                .line(format!("pub trait {}: {bounds} {{}}", contract.trait_name));
            return Ok(());
        }

        let snake = contract.methods.iter().all(|method| {
            is_snake_case(&method.ident) && method.args.iter().all(|arg| is_snake_case(arg))
        });
        if !snake {
            self.out.line("#[allow(non_snake_case)]");
        }
        self.uses.async_trait = true;
        self.out.line("#[async_trait]");
        self.out
            .open(format!("pub trait {}: {bounds} {{", contract.trait_name));
        for (i, method) in contract.methods.iter().enumerate() {
            if i > 0 {
                self.out.blank();
            }
            self.emit_method(contract, method)?;
        }
        self.out.close("}");
        Ok(())
    }

    fn emit_method(&mut self, contract: &Contract<'_>, method: &Method<'_>) -> Result<()> {
        let field = method.field;
        let mut doc = field.description.clone().unwrap_or_default();
        let documented: Vec<String> = method
            .arguments()
            .filter_map(|(arg, _)| argument_doc(arg))
            .collect();
        if !documented.is_empty() {
            push_paragraph(&mut doc, &format!("Arguments:\n{}", documented.join("\n")));
        }
        if let Some(reason) = &field.deprecation {
            push_paragraph(&mut doc, &format!("Deprecated: {reason}"));
        }
        self.doc(Some(&doc));

        let mut params = Vec::new();
        if contract.root.is_none() {
            params.push("&self".to_string());
        }
        for (arg, ident) in method.arguments() {
            params.push(format!("{ident}: {}", self.formatter.reference(&arg.ty)?));
        }
        params.push("context: &Context".to_string());
        params.push("info: &ResolveInfo<'_>".to_string());
        self.uses.context = true;
        self.uses.resolve_info = true;
        self.uses.result = true;

        let reference = self.formatter.reference(&field.ty)?;
        let output = if contract.root == Some(OperationType::Subscription) {
            self.uses.any_stream = true;
            format!("Result<AnyStream<{reference}>>")
        } else {
            format!("Result<{reference}>")
        };
        self.out.line(format!(
            "async fn {}({}) -> {output};",
            method.ident,
            params.join(", ")
        ));
        Ok(())
    }

    fn emit_resolvers(&mut self) -> Result<()> {
        let plan = self.plan;
        let resolver_types = plan.resolver_types();
        self.out.line("/// The implementations a generated schema dispatches to.");
        self.out.line("///");
        self.out.line(
            "/// `Query`, `Mutation` and `Subscription` implement the root operation types.",
        );
        self.out.line(
            "/// Every other associated type is the concrete type interface and union values",
        );
        self.out.line("/// are downcast to.");
        if resolver_types
            .iter()
            .any(|(_, associated)| camel_case_allow(associated).is_some())
        {
            self.out.line("#[allow(non_camel_case_types)]");
        }
        self.out
            .open("pub trait Resolvers: Send + Sync + 'static {");
        for (object, associated) in resolver_types {
            let declaration = self.declaration(object)?;
            self.out.line(format!("type {associated}: {declaration};"));
        }
        self.out.close("}");
        Ok(())
    }
}

fn push_paragraph(doc: &mut String, paragraph: &str) {
    if !doc.trim().is_empty() {
        doc.push_str("\n\n");
    }
    doc.push_str(paragraph);
}

fn argument_doc(arg: &gqlgen_schema::InputValue) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(description) = arg.description.as_deref().filter(|d| !d.trim().is_empty()) {
        parts.push(description.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    if let Some(default) = &arg.default_value {
        parts.push(format!("Defaults to `{default}`."));
    }
    if let Some(reason) = &arg.deprecation {
        parts.push(format!("Deprecated: {reason}"));
    }
    (!parts.is_empty()).then(|| format!("- `{}`: {}", arg.name, parts.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorOptions;
    use gqlgen_schema::build_schema;

    fn emit_types(sdl: &str) -> String {
        emit_with(sdl, &GeneratorOptions::default())
    }

    fn emit_with(sdl: &str, options: &GeneratorOptions) -> String {
        let schema = build_schema(sdl).schema.unwrap();
        let plan = Plan::new(&schema, options).unwrap();
        emit(&plan).unwrap()
    }

    #[test]
    fn test_use_as() {
        assert_eq!(use_as("super::Context", "Context"), "use super::Context;");
        assert_eq!(use_as("crate::app::State", "Context"), "use crate::app::State as Context;");
        assert_eq!(use_as("scalars", "scalars"), "use scalars;");
    }

    #[test]
    fn test_enum_declaration() {
        let types = emit_types(
            r#"
            "Access level."
            enum Role { USER ADMIN @deprecated(reason: "Use OWNER") self ALL }
            type Query { role: Role }
            "#,
        );
        insta::assert_snapshot!(types, @r#"
        // @generated by gqlgen. Do not edit.

        use super::Context;
        use gqlgen_runtime as runtime;
        use runtime::serde::{Deserialize, Serialize};
        use runtime::{async_trait, ResolveInfo, Result};

        /// Access level.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(crate = "gqlgen_runtime::serde")]
        #[allow(non_camel_case_types)]
        pub enum Role {
            USER,
            /// Deprecated: Use OWNER
            ADMIN,
            #[serde(rename = "self")]
            self_,
            #[serde(rename = "ALL")]
            ALL_,
        }

        #[allow(dead_code)]
        impl Role {
            /// Every value, in schema order.
            pub const ALL: &[Self] = &[Self::USER, Self::ADMIN, Self::self_, Self::ALL_];

            /// Returns the GraphQL name of the value.
            pub const fn as_str(self) -> &'static str {
                match self {
                    Self::USER => "USER",
                    Self::ADMIN => "ADMIN",
                    Self::self_ => "self",
                    Self::ALL_ => "ALL",
                }
            }
        }

        impl std::fmt::Display for Role {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for Role {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    "USER" => Ok(Self::USER),
                    "ADMIN" => Ok(Self::ADMIN),
                    "self" => Ok(Self::self_),
                    "ALL" => Ok(Self::ALL_),
                    _ => Err(format!("unknown `Role` value `{s}`")),
                }
            }
        }

        #[async_trait]
        pub trait QueryObject: Send + Sync + 'static {
            async fn role(context: &Context, info: &ResolveInfo<'_>) -> Result<Option<Role>>;
        }

        /// The implementations a generated schema dispatches to.
        ///
        /// `Query`, `Mutation` and `Subscription` implement the root operation types.
        /// Every other associated type is the concrete type interface and union values
        /// are downcast to.
        pub trait Resolvers: Send + Sync + 'static {
            type Query: QueryObject;
        }
        "#);
    }

    #[test]
    fn test_input_declaration() {
        let types = emit_types(
            r#"
            "Calendar date, as `YYYY-MM-DD`."
            scalar Date
            scalar Cursor
            input Filter {
              type: String = "any"
              after: Date!
              parent: Filter
              children: [Filter!]
            }
            type Query { posts(filter: Filter): [String!]! }
            "#,
        );
        assert!(types.contains("use super::scalars;\n"));
        assert!(types.contains(
            "const _: () = runtime::assert_scalar::<scalars::Cursor>();\n/// Calendar date, as `YYYY-MM-DD`.\nconst _: () = runtime::assert_scalar::<scalars::Date>();\n"
        ));
        assert!(types.contains("    /// Defaults to `\"any\"`.\n    pub r#type: Option<String>,\n"));
        assert!(types.contains("    pub after: scalars::Date,\n"));
        assert!(types.contains("    pub parent: Option<Box<FilterInput>>,\n"));
        assert!(types.contains("    pub children: Option<Vec<FilterInput>>,\n"));
        assert!(types.contains(
            "async fn posts(filter: Option<FilterInput>, context: &Context, info: &ResolveInfo<'_>) -> Result<Vec<String>>;"
        ));
    }

    #[test]
    fn test_capability_sets() {
        let types = emit_types(
            r#"
            interface Node { id: ID! }
            "Things that can be searched."
            union Search = User | Post
            type User implements Node {
              id: ID!
              "Display name."
              name(
                "Upper-case the result."
                upper: Boolean = false
              ): String @deprecated
            }
            type Post implements Node { id: ID! }
            type Query { node(id: ID!): Node search: [Search!]! }
            "#,
        );
        insta::assert_snapshot!(types, @r#"
        // @generated by gqlgen. Do not edit.

        use super::Context;
        use gqlgen_runtime as runtime;
        use runtime::{async_trait, IntoAny, ResolveInfo, Result};

        #[async_trait]
        pub trait NodeInterface: IntoAny {
            async fn id(&self, context: &Context, info: &ResolveInfo<'_>) -> Result<String>;
        }

        /// Things that can be searched.
        pub trait SearchUnion: IntoAny {}

        pub trait PostObject: SearchUnion + NodeInterface + IntoAny {}

        #[async_trait]
        pub trait QueryObject: Send + Sync + 'static {
            async fn node(id: String, context: &Context, info: &ResolveInfo<'_>) -> Result<Option<Box<dyn NodeInterface>>>;

            async fn search(context: &Context, info: &ResolveInfo<'_>) -> Result<Vec<Box<dyn SearchUnion>>>;
        }

        #[async_trait]
        pub trait UserObject: SearchUnion + NodeInterface + IntoAny {
            /// Display name.
            ///
            /// Arguments:
            /// - `upper`: Upper-case the result. Defaults to `false`.
            ///
            /// Deprecated: No longer supported
            async fn name(&self, upper: Option<bool>, context: &Context, info: &ResolveInfo<'_>) -> Result<Option<String>>;
        }

        /// The implementations a generated schema dispatches to.
        ///
        /// `Query`, `Mutation` and `Subscription` implement the root operation types.
        /// Every other associated type is the concrete type interface and union values
        /// are downcast to.
        pub trait Resolvers: Send + Sync + 'static {
            type Query: QueryObject;
            type Post: PostObject;
            type User: UserObject;
        }
        "#);
    }

    #[test]
    fn test_subscription_and_custom_paths() {
        let options = GeneratorOptions {
            runtime_crate: "crate::rt".to_string(),
            context_type: "crate::AppState".to_string(),
            scalars_module: "crate::scalar_types".to_string(),
        };
        let types = emit_with(
            r"
            scalar Email
            type Query { me: Email }
            type Subscription { ticks(every: Int!): [Int] }
            ",
            &options,
        );
        assert!(types.contains("use crate::AppState as Context;\n"));
        assert!(types.contains("use crate::scalar_types as scalars;\n"));
        assert!(types.contains("use crate::rt as runtime;\n"));
        assert!(types.contains("use runtime::{async_trait, AnyStream, ResolveInfo, Result};\n"));
        assert!(types.contains(
            "async fn ticks(every: i32, context: &Context, info: &ResolveInfo<'_>) -> Result<AnyStream<Option<Vec<Option<i32>>>>>;"
        ));
        assert!(types.contains("    type Subscription: SubscriptionObject;\n"));
    }

    #[test]
    fn test_non_idiomatic_names_get_allows() {
        let types = emit_types(
            r"
            interface node { ID: ID! }
            type user_account implements node { ID: ID! }
            type Query { n: node }
            ",
        );
        assert!(types.contains(
            "#[allow(non_camel_case_types)]\n#[allow(non_snake_case)]\n#[async_trait]\npub trait nodeInterface: IntoAny {"
        ));
        assert!(types.contains("#[allow(non_camel_case_types)]\npub trait user_accountObject: nodeInterface + IntoAny {}"));
        assert!(types.contains("#[allow(non_camel_case_types)]\npub trait Resolvers"));
        assert!(types.contains("    type user_account: user_accountObject;\n"));
    }
}
