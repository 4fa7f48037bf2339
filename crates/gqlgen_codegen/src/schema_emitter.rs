//! Emits `schema.rs`: the dynamic schema wired to the user's resolvers.
//!
//! Each named type gets a private constructor (`<Name>_object`,
//! `<Name>_interface`, ...). Interfaces and unions that some field returns
//! get a discriminator (`<Name>_value`), and inputs whose fields carry SDL
//! defaults get a filler (`<Name>_defaults`). Constructors are registered in
//! kind order: scalars, enums, inputs, interfaces, unions, objects and the
//! subscription root, each sorted by name.

use crate::contracts::Contract;
use crate::literal::{const_value, rust_string};
use crate::names::{self, Scope};
use crate::plan::Plan;
use crate::type_ref::{defaults_fn, TypeFormatter};
use crate::types_emitter::use_as;
use crate::writer::CodeWriter;
use crate::{Error, Result, BANNER};
use gqlgen_schema::{
    EnumType, Field, InputObjectType, InputValue, NamedType, OperationType, ScalarType, TypeKind,
    UnionType,
};

/// Locals every resolver body binds.
const RESOLVER_LOCALS: &[&str] = &["ctx", "parent", "context", "value", "stream"];

pub fn emit(plan: &Plan<'_>) -> Result<String> {
    let formatter = TypeFormatter::new(plan.schema, &plan.names, "types::")
        .with_defaulted_inputs(plan.defaulted_inputs());
    let mut emitter = SchemaEmitter {
        plan,
        formatter,
        out: CodeWriter::new(),
        uses_context: false,
    };
    emitter.emit_body()?;
    let body = emitter.out.finish();

    let mut header = CodeWriter::new();
    header.line(BANNER);
    header.blank();
    header.line("use super::types;");
    if emitter.uses_context {
        header.line(use_as(&plan.options.context_type, "Context"));
    }
    if !plan.custom_scalars().is_empty() {
        header.line(use_as(&plan.options.scalars_module, "scalars"));
    }
    header.line(format!("use {} as runtime;", plan.options.runtime_crate));
    header.line("use runtime::async_graphql::dynamic;");
    header.blank();

    let mut file = header.finish();
    file.push_str(&body);
    tracing::info!(bytes = file.len(), "emitted schema");
    Ok(file)
}

/// Marks the constructor functions, whose names keep the GraphQL spelling.
const ALLOW_NAMES: &str = "#[allow(non_snake_case)]";

struct SchemaEmitter<'p, 's> {
    plan: &'p Plan<'s>,
    formatter: TypeFormatter<'p>,
    out: CodeWriter,
    uses_context: bool,
}

impl<'s> SchemaEmitter<'_, 's> {
    fn emit_body(&mut self) -> Result<()> {
        let plan = self.plan;
        self.emit_entry_points();

        for ty in plan.custom_scalars() {
            if let NamedType::Scalar(ty) = ty {
                self.out.blank();
                self.emit_scalar(ty)?;
            }
        }
        for ty in plan.sorted(TypeKind::Enum) {
            if let NamedType::Enum(ty) = ty {
                self.out.blank();
                self.emit_enum(ty);
            }
        }
        for ty in plan.sorted(TypeKind::InputObject) {
            if let NamedType::InputObject(ty) = ty {
                self.out.blank();
                self.emit_input(ty);
                if plan.has_defaults(&ty.name) {
                    self.out.blank();
                    self.emit_defaults(ty);
                }
            }
        }
        for ty in plan.sorted(TypeKind::Interface) {
            self.out.blank();
            self.emit_interface(ty);
        }
        for ty in plan.sorted(TypeKind::Union) {
            if let NamedType::Union(ty) = ty {
                self.out.blank();
                self.emit_union(ty);
            }
        }
        for name in plan.returned_abstract_types() {
            self.out.blank();
            self.emit_discriminator(name)?;
        }
        for ty in plan.sorted(TypeKind::Object) {
            self.out.blank();
            if plan.schema.root_operation(ty.name()) == Some(OperationType::Subscription) {
                self.emit_subscription(ty)?;
            } else {
                self.emit_object(ty)?;
            }
        }
        Ok(())
    }

    fn emit_entry_points(&mut self) {
        let schema = self.plan.schema;
        let root = |name: Option<&str>| {
            name.map_or_else(|| "None".to_string(), |n| format!("Some({})", rust_string(n)))
        };

        self.out.line("/// Builds the executable schema, dispatching to the implementations named by `R`.");
        self.out.line("///");
        self.out.line("/// Resolvers read `Context` from the request or schema data, so every request");
        self.out.line("/// must carry one.");
        self.out.open(
            "pub fn build_graphql_schema<R: types::Resolvers>() -> Result<dynamic::Schema, dynamic::SchemaError> {",
        );
        self.out.line("graphql_schema_builder::<R>().finish()");
        self.out.close("}");
        self.out.blank();

        self.out.line("/// Returns the schema builder with every type registered, for callers that");
        self.out.line("/// configure limits, extensions or shared data before finishing it.");
        self.out
            .open("pub fn graphql_schema_builder<R: types::Resolvers>() -> dynamic::SchemaBuilder {");
        self.out.line(format!(
            "dynamic::Schema::build({}, {}, {})",
            rust_string(&schema.query),
            root(schema.mutation.as_deref()),
            root(schema.subscription.as_deref()),
        ));
        self.out.indent();
        for line in self.registrations() {
            self.out.line(format!(".register({line})"));
        }
        self.out.dedent();
        self.out.close("}");
    }

    fn registrations(&self) -> Vec<String> {
        let plan = self.plan;
        let mut registrations = Vec::new();
        for ty in plan.custom_scalars() {
            registrations.push(format!("{}_scalar()", ty.name()));
        }
        for ty in plan.sorted(TypeKind::Enum) {
            registrations.push(format!("{}_enum()", ty.name()));
        }
        for ty in plan.sorted(TypeKind::InputObject) {
            registrations.push(format!("{}_input()", ty.name()));
        }
        for ty in plan.sorted(TypeKind::Interface) {
            registrations.push(format!("{}_interface()", ty.name()));
        }
        for ty in plan.sorted(TypeKind::Union) {
            registrations.push(format!("{}_union()", ty.name()));
        }
        let mut subscription = None;
        for ty in plan.sorted(TypeKind::Object) {
            if plan.schema.root_operation(ty.name()) == Some(OperationType::Subscription) {
                subscription = Some(format!("{}_subscription::<R>()", ty.name()));
            } else {
                registrations.push(format!("{}_object::<R>()", ty.name()));
            }
        }
        registrations.extend(subscription);
        registrations
    }

    /// Writes `.description(...)` for a non-empty description.
    fn description(&mut self, description: Option<&str>) {
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            self.out
                .line(format!(".description({})", rust_string(description)));
        }
    }

    fn deprecation(&mut self, reason: Option<&str>) {
        if let Some(reason) = reason {
            self.out
                .line(format!(".deprecation(Some({}))", rust_string(reason)));
        }
    }

    fn emit_scalar(&mut self, ty: &ScalarType) -> Result<()> {
        self.out.line(ALLOW_NAMES);
        self.out
            .open(format!("fn {}_scalar() -> dynamic::Scalar {{", ty.name));
        self.out
            .line(format!("dynamic::Scalar::new({})", rust_string(&ty.name)));
        self.out.indent();
        self.description(ty.description.as_deref());
        if let Some(url) = &ty.specified_by {
            self.out
                .line(format!(".specified_by_url({})", rust_string(url)));
        }
        self.out.line(format!(
            ".validator(runtime::scalar::validator::<scalars::{}>)",
            names::identifier(&ty.name)?
        ));
        self.out.dedent();
        self.out.close("}");
        Ok(())
    }

    fn emit_enum(&mut self, ty: &EnumType) {
        self.out.line(ALLOW_NAMES);
        self.out.open(format!("fn {}_enum() -> dynamic::Enum {{", ty.name));
        self.out
            .line(format!("dynamic::Enum::new({})", rust_string(&ty.name)));
        self.out.indent();
        self.description(ty.description.as_deref());
        for value in &ty.values {
            let mut item = format!("dynamic::EnumItem::new({})", rust_string(&value.value));
            if let Some(description) = value.description.as_deref().filter(|d| !d.is_empty()) {
                item.push_str(&format!(".description({})", rust_string(description)));
            }
            if let Some(reason) = &value.deprecation {
                item.push_str(&format!(".deprecation(Some({}))", rust_string(reason)));
            }
            self.out.line(format!(".item({item})"));
        }
        self.out.dedent();
        self.out.close("}");
    }

    /// Renders an argument or input field registration.
    fn input_value(value: &InputValue) -> String {
        let mut rendered = format!(
            "dynamic::InputValue::new({}, {})",
            rust_string(&value.name),
            TypeFormatter::engine_type_ref(&value.ty)
        );
        if let Some(description) = value.description.as_deref().filter(|d| !d.is_empty()) {
            rendered.push_str(&format!(".description({})", rust_string(description)));
        }
        if let Some(default) = &value.default_value {
            rendered.push_str(&format!(".default_value({})", const_value(default)));
        }
        rendered
    }

    fn emit_input(&mut self, ty: &InputObjectType) {
        self.out.line(ALLOW_NAMES);
        self.out
            .open(format!("fn {}_input() -> dynamic::InputObject {{", ty.name));
        self.out
            .line(format!("dynamic::InputObject::new({})", rust_string(&ty.name)));
        self.out.indent();
        self.description(ty.description.as_deref());
        for field in &ty.fields {
            self.out.line(format!(".field({})", Self::input_value(field)));
        }
        self.out.dedent();
        self.out.close("}");
    }

    fn emit_defaults(&mut self, ty: &InputObjectType) {
        let plan = self.plan;
        self.out.line(ALLOW_NAMES);
        self.out.open(format!(
            "fn {}(value: &mut runtime::async_graphql::Value) {{",
            defaults_fn(&ty.name)
        ));
        for field in &ty.fields {
            if let Some(default) = &field.default_value {
                self.out.line(format!(
                    "runtime::input::fill_default(value, {}, || {});",
                    rust_string(&field.name),
                    const_value(default)
                ));
            }
            let nested = field.ty.name();
            if plan.schema.kind_of(nested) == Some(TypeKind::InputObject) && plan.has_defaults(nested) {
                self.out.line(format!(
                    "runtime::input::fill_nested(value, {}, {});",
                    rust_string(&field.name),
                    defaults_fn(nested)
                ));
            }
        }
        self.out.close("}");
    }

    fn emit_interface(&mut self, ty: &NamedType) {
        let plan = self.plan;
        let name = ty.name();
        self.out.line(ALLOW_NAMES);
        self.out
            .open(format!("fn {name}_interface() -> dynamic::Interface {{"));
        self.out
            .line(format!("dynamic::Interface::new({})", rust_string(name)));
        self.out.indent();
        self.description(ty.description());
        for interface in plan.schema.transitive_interfaces(name) {
            self.out
                .line(format!(".implement({})", rust_string(interface)));
        }
        for field in ty.fields() {
            self.out.open(".field(");
            self.out.line(format!(
                "dynamic::InterfaceField::new({}, {})",
                rust_string(&field.name),
                TypeFormatter::engine_type_ref(&field.ty)
            ));
            self.out.indent();
            self.field_metadata(field);
            self.out.dedent();
            self.out.close(")");
        }
        self.out.dedent();
        self.out.close("}");
    }

    /// Writes description, deprecation and argument registrations.
    fn field_metadata(&mut self, field: &Field) {
        self.description(field.description.as_deref());
        self.deprecation(field.deprecation.as_deref());
        for arg in &field.arguments {
            self.out
                .line(format!(".argument({})", Self::input_value(arg)));
        }
    }

    fn emit_union(&mut self, ty: &UnionType) {
        self.out.line(ALLOW_NAMES);
        self.out
            .open(format!("fn {}_union() -> dynamic::Union {{", ty.name));
        self.out
            .line(format!("dynamic::Union::new({})", rust_string(&ty.name)));
        self.out.indent();
        self.description(ty.description.as_deref());
        for member in &ty.members {
            self.out
                .line(format!(".possible_type({})", rust_string(member)));
        }
        self.out.dedent();
        self.out.close("}");
    }

    fn emit_discriminator(&mut self, name: &str) -> Result<()> {
        let plan = self.plan;
        let declaration = self.formatter.declaration_name(&gqlgen_schema::TypeExpr::named(name))?;
        self.out.line(ALLOW_NAMES);
        self.out.open(format!(
            "fn {name}_value<'a, R: types::Resolvers>(value: Box<dyn {declaration}>) -> runtime::Result<dynamic::FieldValue<'a>> {{"
        ));
        self.out
            .line("let type_name = runtime::IntoAny::type_name(&*value);");
        let implementers = plan.implementers(name);
        if !implementers.is_empty() {
            self.out.line("let value = runtime::IntoAny::into_any(value);");
        }
        for (i, object) in implementers.iter().enumerate() {
            let associated = plan.associated_type(object).ok_or_else(|| {
                Error::unsupported(*object, "the object has no `Resolvers` associated type")
            })?;
            let object_trait = self.formatter.declaration_name(&gqlgen_schema::TypeExpr::named(*object))?;
            let tagged = format!(
                "Ok(dynamic::FieldValue::owned_any(value as Box<dyn {object_trait}>).with_type({}))",
                rust_string(object)
            );
            if i + 1 < implementers.len() {
                self.out
                    .open(format!("let value = match value.downcast::<R::{associated}>() {{"));
                self.out.line(format!("Ok(value) => return {tagged},"));
                self.out.line("Err(value) => value,");
                self.out.close("};");
            } else {
                self.out
                    .open(format!("if let Ok(value) = value.downcast::<R::{associated}>() {{"));
                self.out.line(format!("return {tagged};"));
                self.out.close("}");
            }
        }
        self.out.line(format!(
            "Err(runtime::UnknownImplementer::new({}, type_name).into())",
            rust_string(name)
        ));
        self.out.close("}");
        Ok(())
    }

    fn emit_object(&mut self, ty: &'s NamedType) -> Result<()> {
        let plan = self.plan;
        let name = ty.name();
        self.out.line(ALLOW_NAMES);
        self.out.open(format!(
            "fn {name}_object<R: types::Resolvers>() -> dynamic::Object {{"
        ));
        self.out
            .line(format!("dynamic::Object::new({})", rust_string(name)));
        self.out.indent();
        self.description(ty.description());
        for interface in plan.schema.transitive_interfaces(name) {
            self.out
                .line(format!(".implement({})", rust_string(interface)));
        }
        for field in ty.fields() {
            self.out.open(".field(");
            self.out.open(format!(
                "dynamic::Field::new({}, {}, |ctx| {{",
                rust_string(&field.name),
                TypeFormatter::engine_type_ref(&field.ty)
            ));
            self.out.open("dynamic::FieldFuture::new(async move {");
            let call = self.resolver_call(name, field)?;
            self.out.line(format!("let value = {call}.await?;"));
            self.out.line(format!(
                "{}(value).map(Some)",
                self.formatter.output_converter(&field.ty)?
            ));
            self.out.close("})");
            self.out.close("})");
            self.out.indent();
            self.field_metadata(field);
            self.out.dedent();
            self.out.close(")");
        }
        self.out.dedent();
        self.out.close("}");
        Ok(())
    }

    fn emit_subscription(&mut self, ty: &'s NamedType) -> Result<()> {
        let name = ty.name();
        self.out.line(ALLOW_NAMES);
        self.out.open(format!(
            "fn {name}_subscription<R: types::Resolvers>() -> dynamic::Subscription {{"
        ));
        self.out
            .line(format!("dynamic::Subscription::new({})", rust_string(name)));
        self.out.indent();
        self.description(ty.description());
        for field in ty.fields() {
            self.out.open(".field(");
            self.out.open(format!(
                "dynamic::SubscriptionField::new({}, {}, |ctx| {{",
                rust_string(&field.name),
                TypeFormatter::engine_type_ref(&field.ty)
            ));
            self.out
                .open("dynamic::SubscriptionFieldFuture::new(async move {");
            let call = self.resolver_call(name, field)?;
            self.out.line(format!("let stream = {call}.await?;"));
            self.out.line(format!(
                "Ok(runtime::output::stream(stream, {}))",
                self.formatter.output_converter(&field.ty)?
            ));
            self.out.close("})");
            self.out.close("})");
            self.out.indent();
            self.field_metadata(field);
            self.out.dedent();
            self.out.close(")");
        }
        self.out.dedent();
        self.out.close("}");
        Ok(())
    }

    /// Writes the bindings a resolver body needs and returns the call to the
    /// user's operation.
    fn resolver_call(&mut self, type_name: &str, field: &Field) -> Result<String> {
        let plan = self.plan;
        let (contract, method) = plan.contracts.owner(type_name, &field.name).ok_or_else(|| {
            Error::unsupported(type_name, format!("field `{}` has no resolver contract", field.name))
        })?;

        let mut args = Vec::new();
        if contract.root.is_none() {
            let parent = self.parent_existential(type_name)?;
            self.out.line(format!(
                "let parent = ctx.parent_value.try_downcast_ref::<Box<dyn {parent}>>()?;"
            ));
            args.push("&**parent".to_string());
        }
        self.out.line("let context = ctx.ctx.data::<Context>()?;");
        self.uses_context = true;

        let mut locals = Scope::with_reserved(RESOLVER_LOCALS);
        for arg in &field.arguments {
            let local = locals.allocate(&arg.name)?;
            let decoder = self.formatter.input_decoder(&arg.ty)?;
            let decode = match &arg.default_value {
                Some(default) => format!(
                    "runtime::input::argument_or(&ctx.args, {}, {decoder}, || {})",
                    rust_string(&arg.name),
                    const_value(default)
                ),
                None => format!(
                    "runtime::input::argument(&ctx.args, {}, {decoder})",
                    rust_string(&arg.name)
                ),
            };
            self.out.line(format!("let {local} = {decode}?;"));
            args.push(local);
        }
        args.push("context".to_string());
        args.push("ctx.ctx".to_string());

        Ok(format!("{}({})", self.operation_path(contract, &method.ident)?, args.join(", ")))
    }

    /// The existential the engine stores values of `type_name` as.
    fn parent_existential(&self, type_name: &str) -> Result<String> {
        self.formatter
            .declaration_name(&gqlgen_schema::TypeExpr::named(type_name))
    }

    fn operation_path(&self, contract: &Contract<'_>, ident: &str) -> Result<String> {
        let trait_path = format!("types::{}", contract.trait_name);
        if contract.root.is_none() {
            return Ok(format!("{trait_path}::{ident}"));
        }
        let associated = self.plan.associated_type(contract.name).ok_or_else(|| {
            Error::unsupported(contract.name, "the root type has no `Resolvers` associated type")
        })?;
        Ok(format!("<R::{associated} as {trait_path}>::{ident}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorOptions;
    use gqlgen_schema::build_schema;

    fn emit_schema(sdl: &str) -> String {
        let schema = build_schema(sdl).schema.unwrap();
        let options = GeneratorOptions::default();
        let plan = Plan::new(&schema, &options).unwrap();
        emit(&plan).unwrap()
    }

    #[test]
    fn test_objects_and_roots() {
        let schema = emit_schema(
            r#"
            "A person."
            type User { name(upper: Boolean = false): String @deprecated(reason: "Use `fullName`") }
            type Query { user(id: ID!): User }
            "#,
        );
        insta::assert_snapshot!(schema, @r#"
        // @generated by gqlgen. Do not edit.

        use super::types;
        use super::Context;
        use gqlgen_runtime as runtime;
        use runtime::async_graphql::dynamic;

        /// Builds the executable schema, dispatching to the implementations named by `R`.
        ///
        /// Resolvers read `Context` from the request or schema data, so every request
        /// must carry one.
        pub fn build_graphql_schema<R: types::Resolvers>() -> Result<dynamic::Schema, dynamic::SchemaError> {
            graphql_schema_builder::<R>().finish()
        }

        /// Returns the schema builder with every type registered, for callers that
        /// configure limits, extensions or shared data before finishing it.
        pub fn graphql_schema_builder<R: types::Resolvers>() -> dynamic::SchemaBuilder {
            dynamic::Schema::build("Query", None, None)
                .register(Query_object::<R>())
                .register(User_object::<R>())
        }

        #[allow(non_snake_case)]
        fn Query_object<R: types::Resolvers>() -> dynamic::Object {
            dynamic::Object::new("Query")
                .field(
                    dynamic::Field::new("user", dynamic::TypeRef::named("User"), |ctx| {
                        dynamic::FieldFuture::new(async move {
                            let context = ctx.ctx.data::<Context>()?;
                            let id = runtime::input::argument(&ctx.args, "id", runtime::input::value::<String>())?;
                            let value = <R::Query as types::QueryObject>::user(id, context, ctx.ctx).await?;
                            runtime::output::nullable(runtime::output::object::<Box<dyn types::UserObject>>())(value).map(Some)
                        })
                    })
                    .argument(dynamic::InputValue::new("id", dynamic::TypeRef::named_nn("ID")))
                )
        }

        #[allow(non_snake_case)]
        fn User_object<R: types::Resolvers>() -> dynamic::Object {
            dynamic::Object::new("User")
                .description("A person.")
                .field(
                    dynamic::Field::new("name", dynamic::TypeRef::named("String"), |ctx| {
                        dynamic::FieldFuture::new(async move {
                            let parent = ctx.parent_value.try_downcast_ref::<Box<dyn types::UserObject>>()?;
                            let context = ctx.ctx.data::<Context>()?;
                            let upper = runtime::input::argument_or(&ctx.args, "upper", runtime::input::nullable(runtime::input::value::<bool>()), || runtime::literal::boolean(false))?;
                            let value = types::UserObject::name(&**parent, upper, context, ctx.ctx).await?;
                            runtime::output::nullable(runtime::output::value::<String>())(value).map(Some)
                        })
                    })
                    .deprecation(Some("Use `fullName`"))
                    .argument(dynamic::InputValue::new("upper", dynamic::TypeRef::named("Boolean")).default_value(runtime::literal::boolean(false)))
                )
        }
        "#);
    }

    #[test]
    fn test_discriminators() {
        let schema = emit_schema(
            r"
            interface Node { id: ID! }
            interface Orphan { id: ID! }
            union Search = User | Post
            type User implements Node { id: ID! }
            type Post implements Node { id: ID! }
            type Query implements Node { id: ID! node: Node search: [Search!]! orphan: Orphan }
            ",
        );
        assert!(schema.contains(
            "        .register(Node_interface())\n        .register(Orphan_interface())\n        .register(Search_union())\n"
        ));
        assert!(schema.contains(
            "fn Node_value<'a, R: types::Resolvers>(value: Box<dyn types::NodeInterface>) -> runtime::Result<dynamic::FieldValue<'a>> {\n    let type_name = runtime::IntoAny::type_name(&*value);\n    let value = runtime::IntoAny::into_any(value);\n    let value = match value.downcast::<R::Post>() {\n        Ok(value) => return Ok(dynamic::FieldValue::owned_any(value as Box<dyn types::PostObject>).with_type(\"Post\")),\n        Err(value) => value,\n    };\n    if let Ok(value) = value.downcast::<R::User>() {\n        return Ok(dynamic::FieldValue::owned_any(value as Box<dyn types::UserObject>).with_type(\"User\"));\n    }\n    Err(runtime::UnknownImplementer::new(\"Node\", type_name).into())\n}\n"
        ));
        assert!(schema.contains(
            "fn Orphan_value<'a, R: types::Resolvers>(value: Box<dyn types::OrphanInterface>) -> runtime::Result<dynamic::FieldValue<'a>> {\n    let type_name = runtime::IntoAny::type_name(&*value);\n    Err(runtime::UnknownImplementer::new(\"Orphan\", type_name).into())\n}\n"
        ));
        assert!(schema.contains("fn Search_value<'a, R: types::Resolvers>"));
        assert!(schema.contains("runtime::output::list(Search_value::<R>)(value).map(Some)"));
        assert!(schema.contains(
            "dynamic::Object::new(\"Query\")\n        .implement(\"Node\")\n"
        ));
        assert!(schema.contains(
            "let value = <R::Query as types::QueryObject>::id(context, ctx.ctx).await?;"
        ));
        assert!(schema.contains(
            "let value = types::NodeInterface::id(&**parent, context, ctx.ctx).await?;"
        ));
        assert!(schema.contains(
            "dynamic::Union::new(\"Search\")\n        .possible_type(\"User\")\n        .possible_type(\"Post\")\n"
        ));
    }

    #[test]
    fn test_scalars_enums_and_inputs() {
        let schema = emit_schema(
            r#"
            scalar Url @specifiedBy(url: "https://tools.ietf.org/html/rfc3986")
            enum Sort { ASC "Newest first." DESC @deprecated }
            input Page { first: Int! = 10 sort: Sort = DESC }
            input Query2 { page: Page where: [Page] }
            type Query { links(page: Page, q: Query2, value: Url): [Url!] }
            "#,
        );
        assert!(schema.contains("use super::scalars;\n"));
        assert!(schema.contains(
            "fn Url_scalar() -> dynamic::Scalar {\n    dynamic::Scalar::new(\"Url\")\n        .specified_by_url(\"https://tools.ietf.org/html/rfc3986\")\n        .validator(runtime::scalar::validator::<scalars::Url>)\n}\n"
        ));
        assert!(schema.contains(
            "        .item(dynamic::EnumItem::new(\"DESC\").description(\"Newest first.\").deprecation(Some(\"No longer supported\")))\n"
        ));
        assert!(schema.contains(
            "        .field(dynamic::InputValue::new(\"first\", dynamic::TypeRef::named_nn(\"Int\")).default_value(runtime::literal::int(10)))\n"
        ));
        assert!(schema.contains(
            "fn Page_defaults(value: &mut runtime::async_graphql::Value) {\n    runtime::input::fill_default(value, \"first\", || runtime::literal::int(10));\n    runtime::input::fill_default(value, \"sort\", || runtime::literal::enum_value(\"DESC\"));\n}\n"
        ));
        assert!(schema.contains(
            "fn Query2_defaults(value: &mut runtime::async_graphql::Value) {\n    runtime::input::fill_nested(value, \"page\", Page_defaults);\n    runtime::input::fill_nested(value, \"where\", Page_defaults);\n}\n"
        ));
        assert!(schema.contains(
            "let page = runtime::input::argument(&ctx.args, \"page\", runtime::input::nullable(runtime::input::with_defaults(Page_defaults, runtime::input::value::<types::PageInput>())))?;"
        ));
        assert!(schema.contains(
            "let value_ = runtime::input::argument(&ctx.args, \"value\", runtime::input::nullable(runtime::input::scalar::<scalars::Url>()))?;"
        ));
        assert!(schema.contains("::links(page, q, value_, context, ctx.ctx).await?;"));
        assert!(schema.contains(
            "runtime::output::nullable(runtime::output::list(runtime::output::scalar::<scalars::Url>()))(value).map(Some)"
        ));
    }

    #[test]
    fn test_field_calls_chain_without_separators() {
        let schema = emit_schema(
            r"
            type Query { a: Int b: Int }
            type Subscription { x: Int y: Int }
            ",
        );
        assert!(!schema.contains("),\n"), "{schema}");
        assert!(schema.contains("                })\n            })\n        )\n        .field(\n"));
        assert!(schema.contains("                })\n            })\n        )\n}\n"));
    }

    #[test]
    fn test_subscription_root() {
        let schema = emit_schema(
            r"
            type Query { ok: Boolean }
            type Subscription { ticks(every: Int! = 1): Int! }
            ",
        );
        assert!(schema.contains("dynamic::Schema::build(\"Query\", None, Some(\"Subscription\"))"));
        assert!(schema.contains("        .register(Subscription_subscription::<R>())\n}\n"));
        assert!(schema.contains(
            "                .argument(dynamic::InputValue::new(\"every\", dynamic::TypeRef::named_nn(\"Int\")).default_value(runtime::literal::int(1)))\n        )\n}\n"
        ));
        assert!(schema.contains(
            "            dynamic::SubscriptionField::new(\"ticks\", dynamic::TypeRef::named_nn(\"Int\"), |ctx| {\n                dynamic::SubscriptionFieldFuture::new(async move {\n                    let context = ctx.ctx.data::<Context>()?;\n                    let every = runtime::input::argument_or(&ctx.args, \"every\", runtime::input::value::<i32>(), || runtime::literal::int(1))?;\n                    let stream = <R::Subscription as types::SubscriptionObject>::ticks(every, context, ctx.ctx).await?;\n                    Ok(runtime::output::stream(stream, runtime::output::value::<i32>()))\n                })\n            })\n"
        ));
    }
}
