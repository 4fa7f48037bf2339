//! SDL document to schema graph.
//!
//! Building runs in three passes over the parsed document:
//! 1. collect every type definition, directive definition and schema
//!    definition, recording kinds so references can be checked in any order;
//! 2. convert each type together with its `extend` definitions, validating
//!    type references, duplicate names and reserved names on the way;
//! 3. resolve root operation types and check interface implementations,
//!    which needs the finished graph.

use crate::types::*;
use gqlgen_core::{diagnostics::codes, Diagnostic, DiagnosticBag, Interner, Label, Span};
use gqlgen_syntax::ast;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

/// Directives every schema understands without a definition.
const BUILTIN_DIRECTIVES: [&str; 5] = ["deprecated", "specifiedBy", "skip", "include", "oneOf"];

/// Result of building a schema.
#[derive(Debug)]
pub struct BuildResult {
    /// The schema, when no error was reported.
    pub schema: Option<Schema>,
    /// Every syntax and validation diagnostic, including warnings.
    pub diagnostics: DiagnosticBag,
}

/// Parses SDL source and builds the schema graph.
pub fn build_schema(source: &str) -> BuildResult {
    let interner = Interner::new();
    let parsed = gqlgen_syntax::parse(source, &interner);
    if parsed.diagnostics.has_errors() {
        return BuildResult {
            schema: None,
            diagnostics: parsed.diagnostics,
        };
    }

    let mut builder = SchemaBuilder::new(&interner);
    builder.diagnostics.extend(parsed.diagnostics);
    builder.build(&parsed.document)
}

/// A default value waiting for the finished graph to be checked against.
struct PendingDefault {
    coordinate: String,
    ty: TypeExpr,
    value: ConstValue,
    span: Span,
}

/// Where a type reference appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Input,
    Output,
}

/// Builds a [`Schema`] from a parsed document.
pub struct SchemaBuilder<'a> {
    interner: &'a Interner,
    diagnostics: DiagnosticBag,
    kinds: FxHashMap<String, TypeKind>,
    spans: FxHashMap<String, Span>,
    directives: FxHashSet<String>,
    defaults: Vec<PendingDefault>,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates a builder. `interner` must be the one the document was parsed
    /// with.
    #[must_use]
    pub fn new(interner: &'a Interner) -> Self {
        let mut kinds = FxHashMap::default();
        for name in BUILTIN_SCALARS {
            kinds.insert(name.to_string(), TypeKind::Scalar);
        }
        Self {
            interner,
            diagnostics: DiagnosticBag::new(),
            kinds,
            spans: FxHashMap::default(),
            directives: BUILTIN_DIRECTIVES.iter().map(|d| (*d).to_string()).collect(),
            defaults: Vec::new(),
        }
    }

    fn text(&self, name: ast::Name) -> String {
        self.interner.get(name.value)
    }

    /// Builds the schema.
    pub fn build(mut self, document: &ast::Document) -> BuildResult {
        let mut bases: IndexMap<String, &ast::TypeDefinition> = IndexMap::new();
        let mut extensions: Vec<&ast::TypeDefinition> = Vec::new();
        let mut schema_definition: Option<&ast::SchemaDefinition> = None;
        let mut schema_extensions: Vec<&ast::SchemaDefinition> = Vec::new();

        for definition in &document.definitions {
            match definition {
                ast::Definition::Type(def) => self.collect_type(def, &mut bases),
                ast::Definition::TypeExtension(def) => extensions.push(def),
                ast::Definition::Schema(def) => {
                    if schema_definition.is_some() {
                        self.diagnostics.error(
                            codes::DUPLICATE_TYPE,
                            "schema is defined more than once",
                            def.span,
                            "",
                        );
                    } else {
                        schema_definition = Some(def);
                    }
                }
                ast::Definition::SchemaExtension(def) => schema_extensions.push(def),
                ast::Definition::Directive(def) => self.collect_directive(def),
            }
        }

        for extension in &extensions {
            let name = self.text(extension.name());
            let base_keyword = bases.get(&name).map(|base| base.keyword());
            if base_keyword != Some(extension.keyword()) {
                let message = match base_keyword {
                    Some(keyword) => format!(
                        "cannot extend `{name}` with `extend {}`, it is defined with `{keyword}`",
                        extension.keyword()
                    ),
                    None => format!("cannot extend undefined type `{name}`"),
                };
                self.diagnostics.error(
                    codes::INVALID_EXTENSION,
                    message,
                    extension.name().span,
                    "",
                );
            }
        }

        let mut types = IndexMap::new();
        for name in BUILTIN_SCALARS {
            types.insert(
                name.to_string(),
                NamedType::Scalar(ScalarType {
                    name: name.to_string(),
                    description: None,
                    builtin: true,
                    specified_by: None,
                }),
            );
        }
        for (name, base) in &bases {
            let parts: Vec<&ast::TypeDefinition> = std::iter::once(*base)
                .chain(
                    extensions
                        .iter()
                        .copied()
                        .filter(|ext| ext.keyword() == base.keyword() && self.text(ext.name()) == *name),
                )
                .collect();
            let ty = self.convert_type_definition(name, &parts);
            types.insert(name.clone(), ty);
        }

        let roots = self.resolve_roots(schema_definition, &schema_extensions);
        let description = schema_definition
            .and_then(|def| def.description.as_ref())
            .map(|d| d.value.clone());

        let Some((query, mutation, subscription)) = roots else {
            return self.finish(None);
        };

        let schema = Schema {
            description,
            types,
            query,
            mutation,
            subscription,
        };
        self.check_implementations(&schema);
        self.check_defaults(&schema);

        tracing::debug!(
            types = schema.types.len(),
            query = %schema.query,
            "schema graph built"
        );
        self.finish(Some(schema))
    }

    fn finish(self, schema: Option<Schema>) -> BuildResult {
        let schema = if self.diagnostics.has_errors() {
            None
        } else {
            schema
        };
        BuildResult {
            schema,
            diagnostics: self.diagnostics,
        }
    }

    fn collect_type<'d>(
        &mut self,
        def: &'d ast::TypeDefinition,
        bases: &mut IndexMap<String, &'d ast::TypeDefinition>,
    ) {
        let name_node = def.name();
        let name = self.text(name_node);

        if BUILTIN_SCALARS.contains(&name.as_str()) {
            if !matches!(def, ast::TypeDefinition::Scalar(_)) {
                self.diagnostics.error(
                    codes::DUPLICATE_TYPE,
                    format!("`{name}` is a built-in scalar and cannot be redefined"),
                    name_node.span,
                    "",
                );
            }
            return;
        }
        self.check_reserved(&name, name_node.span);

        if let Some(previous) = self.spans.get(&name) {
            self.diagnostics.add(
                Diagnostic::error(codes::DUPLICATE_TYPE, format!("type `{name}` is defined more than once"))
                    .with_span(name_node.span, "redefined here")
                    .with_label(Label::new(*previous, "first defined here")),
            );
            return;
        }

        let kind = match def {
            ast::TypeDefinition::Scalar(_) => TypeKind::Scalar,
            ast::TypeDefinition::Object(_) => TypeKind::Object,
            ast::TypeDefinition::Interface(_) => TypeKind::Interface,
            ast::TypeDefinition::Union(_) => TypeKind::Union,
            ast::TypeDefinition::Enum(_) => TypeKind::Enum,
            ast::TypeDefinition::InputObject(_) => TypeKind::InputObject,
        };
        self.kinds.insert(name.clone(), kind);
        self.spans.insert(name.clone(), name_node.span);
        bases.insert(name, def);
    }

    fn collect_directive(&mut self, def: &ast::DirectiveDefinition) {
        let name = self.text(def.name);
        self.check_reserved(&name, def.name.span);
        if !self.directives.insert(name.clone()) {
            self.diagnostics.error(
                codes::DUPLICATE_TYPE,
                format!("directive `@{name}` is defined more than once"),
                def.name.span,
                "",
            );
        }
        // Argument types still have to exist and be input types.
        self.convert_input_values(&format!("@{name}"), def.arguments.iter());
    }

    fn check_reserved(&mut self, name: &str, span: Span) {
        if name.starts_with("__") {
            self.diagnostics.error(
                codes::RESERVED_NAME,
                format!("`{name}` is reserved: names starting with `__` belong to introspection"),
                span,
                "",
            );
        }
    }

    fn convert_type_definition(&mut self, name: &str, parts: &[&ast::TypeDefinition]) -> NamedType {
        let description = parts.iter().find_map(|part| match part {
            ast::TypeDefinition::Scalar(d) => d.description.as_ref(),
            ast::TypeDefinition::Object(d) => d.description.as_ref(),
            ast::TypeDefinition::Interface(d) => d.description.as_ref(),
            ast::TypeDefinition::Union(d) => d.description.as_ref(),
            ast::TypeDefinition::Enum(d) => d.description.as_ref(),
            ast::TypeDefinition::InputObject(d) => d.description.as_ref(),
        });
        let description = description.map(|d| d.value.clone());
        let name = name.to_string();

        match parts[0] {
            ast::TypeDefinition::Scalar(_) => {
                let mut specified_by = None;
                for part in parts {
                    if let ast::TypeDefinition::Scalar(def) = part {
                        self.check_directives(&def.directives);
                        if let Some(url) = self.string_argument(&def.directives, "specifiedBy", "url") {
                            specified_by = Some(url);
                        }
                    }
                }
                NamedType::Scalar(ScalarType {
                    name,
                    description,
                    builtin: false,
                    specified_by,
                })
            }
            ast::TypeDefinition::Object(_) => {
                let mut implements = Vec::new();
                let mut field_defs = Vec::new();
                for part in parts {
                    if let ast::TypeDefinition::Object(def) = part {
                        self.check_directives(&def.directives);
                        implements.extend(def.implements.iter().copied());
                        field_defs.extend(def.fields.iter());
                    }
                }
                let interfaces = self.convert_implements(&name, &implements);
                let fields = self.convert_fields(&name, field_defs.into_iter());
                NamedType::Object(ObjectType {
                    name,
                    description,
                    interfaces,
                    fields,
                })
            }
            ast::TypeDefinition::Interface(_) => {
                let mut implements = Vec::new();
                let mut field_defs = Vec::new();
                for part in parts {
                    if let ast::TypeDefinition::Interface(def) = part {
                        self.check_directives(&def.directives);
                        implements.extend(def.implements.iter().copied());
                        field_defs.extend(def.fields.iter());
                    }
                }
                let interfaces = self.convert_implements(&name, &implements);
                let fields = self.convert_fields(&name, field_defs.into_iter());
                NamedType::Interface(InterfaceType {
                    name,
                    description,
                    interfaces,
                    fields,
                })
            }
            ast::TypeDefinition::Union(_) => {
                let mut members = Vec::new();
                for part in parts {
                    if let ast::TypeDefinition::Union(def) = part {
                        self.check_directives(&def.directives);
                        for member in &def.members {
                            self.convert_union_member(&name, *member, &mut members);
                        }
                    }
                }
                NamedType::Union(UnionType {
                    name,
                    description,
                    members,
                })
            }
            ast::TypeDefinition::Enum(_) => {
                let mut values: Vec<EnumValue> = Vec::new();
                for part in parts {
                    if let ast::TypeDefinition::Enum(def) = part {
                        self.check_directives(&def.directives);
                        for value in &def.values {
                            let value_name = self.text(value.name);
                            self.check_reserved(&value_name, value.name.span);
                            if values.iter().any(|v| v.name == value_name) {
                                self.diagnostics.error(
                                    codes::DUPLICATE_VALUE,
                                    format!("enum value `{name}.{value_name}` is defined more than once"),
                                    value.name.span,
                                    "",
                                );
                                continue;
                            }
                            self.check_directives(&value.directives);
                            values.push(EnumValue {
                                value: value_name.clone(),
                                name: value_name,
                                description: value.description.as_ref().map(|d| d.value.clone()),
                                deprecation: self.deprecation(&value.directives),
                            });
                        }
                    }
                }
                NamedType::Enum(EnumType {
                    name,
                    description,
                    values,
                })
            }
            ast::TypeDefinition::InputObject(_) => {
                let mut field_defs = Vec::new();
                for part in parts {
                    if let ast::TypeDefinition::InputObject(def) = part {
                        self.check_directives(&def.directives);
                        field_defs.extend(def.fields.iter());
                    }
                }
                let fields = self.convert_input_values(&name, field_defs.into_iter());
                NamedType::InputObject(InputObjectType {
                    name,
                    description,
                    fields,
                })
            }
        }
    }

    fn convert_implements(&mut self, owner: &str, names: &[ast::Name]) -> Vec<String> {
        let mut interfaces: Vec<String> = Vec::new();
        for name in names {
            let interface = self.text(*name);
            match self.kinds.get(&interface).copied() {
                None => self.undefined(&interface, name.span),
                Some(TypeKind::Interface) if interface == owner => {
                    self.diagnostics.error(
                        codes::INVALID_IMPLEMENTATION,
                        format!("interface `{owner}` cannot implement itself"),
                        name.span,
                        "",
                    );
                }
                Some(TypeKind::Interface) => {
                    if interfaces.contains(&interface) {
                        self.diagnostics.error(
                            codes::INVALID_IMPLEMENTATION,
                            format!("`{owner}` implements `{interface}` more than once"),
                            name.span,
                            "",
                        );
                    } else {
                        interfaces.push(interface);
                    }
                }
                Some(kind) => {
                    self.diagnostics.error(
                        codes::INVALID_IMPLEMENTATION,
                        format!("`{owner}` can only implement interfaces, but `{interface}` is {} {kind} type", article(kind)),
                        name.span,
                        "",
                    );
                }
            }
        }
        interfaces
    }

    fn convert_union_member(&mut self, union: &str, member: ast::Name, members: &mut Vec<String>) {
        let name = self.text(member);
        match self.kinds.get(&name).copied() {
            None => self.undefined(&name, member.span),
            Some(TypeKind::Object) => {
                if members.contains(&name) {
                    self.diagnostics.error(
                        codes::INVALID_UNION_MEMBER,
                        format!("union `{union}` includes `{name}` more than once"),
                        member.span,
                        "",
                    );
                } else {
                    members.push(name);
                }
            }
            Some(kind) => {
                self.diagnostics.error(
                    codes::INVALID_UNION_MEMBER,
                    format!("union `{union}` can only include object types, but `{name}` is {} {kind} type", article(kind)),
                    member.span,
                    "",
                );
            }
        }
    }

    fn convert_fields<'d>(
        &mut self,
        owner: &str,
        defs: impl Iterator<Item = &'d ast::FieldDefinition>,
    ) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();
        for def in defs {
            let name = self.text(def.name);
            self.check_reserved(&name, def.name.span);
            if fields.iter().any(|f| f.name == name) {
                self.diagnostics.error(
                    codes::DUPLICATE_FIELD,
                    format!("field `{owner}.{name}` is defined more than once"),
                    def.name.span,
                    "",
                );
                continue;
            }
            self.check_directives(&def.directives);
            let ty = self.convert_type(&def.ty, Position::Output);
            let arguments = self.convert_input_values(&format!("{owner}.{name}"), def.arguments.iter());
            fields.push(Field {
                name,
                description: def.description.as_ref().map(|d| d.value.clone()),
                arguments,
                ty,
                deprecation: self.deprecation(&def.directives),
            });
        }
        fields
    }

    fn convert_input_values<'d>(
        &mut self,
        owner: &str,
        defs: impl Iterator<Item = &'d ast::InputValueDefinition>,
    ) -> Vec<InputValue> {
        let mut values: Vec<InputValue> = Vec::new();
        for def in defs {
            let name = self.text(def.name);
            self.check_reserved(&name, def.name.span);
            if values.iter().any(|v| v.name == name) {
                self.diagnostics.error(
                    codes::DUPLICATE_FIELD,
                    format!("`{owner}` declares `{name}` more than once"),
                    def.name.span,
                    "",
                );
                continue;
            }
            self.check_directives(&def.directives);
            let ty = self.convert_type(&def.ty, Position::Input);
            let default_value = def.default_value.as_ref().map(|v| self.convert_value(v));
            if let (Some(value), Some(node)) = (&default_value, &def.default_value) {
                self.defaults.push(PendingDefault {
                    coordinate: format!("{owner}.{name}"),
                    ty: ty.clone(),
                    value: value.clone(),
                    span: node.span(),
                });
            }
            values.push(InputValue {
                name,
                description: def.description.as_ref().map(|d| d.value.clone()),
                ty,
                default_value,
                deprecation: self.deprecation(&def.directives),
            });
        }
        values
    }

    fn convert_type(&mut self, ty: &ast::Type, position: Position) -> TypeExpr {
        match ty {
            ast::Type::NonNull(inner, _) => TypeExpr::non_null(self.convert_type(inner, position)),
            ast::Type::List(inner, _) => TypeExpr::list(self.convert_type(inner, position)),
            ast::Type::Named(name) => {
                let text = self.text(*name);
                match (self.kinds.get(&text).copied(), position) {
                    (None, _) => self.undefined(&text, name.span),
                    (Some(kind), Position::Input) if !kind.is_input() => {
                        self.diagnostics.error(
                            codes::INPUT_OUTPUT_MISMATCH,
                            format!("`{text}` is {} {kind} type and cannot be used as an input", article(kind)),
                            name.span,
                            "",
                        );
                    }
                    (Some(kind), Position::Output) if !kind.is_output() => {
                        self.diagnostics.error(
                            codes::INPUT_OUTPUT_MISMATCH,
                            format!("`{text}` is an input object type and cannot be used as an output"),
                            name.span,
                            "",
                        );
                    }
                    _ => {}
                }
                TypeExpr::Named(text)
            }
        }
    }

    fn convert_value(&self, value: &ast::Value) -> ConstValue {
        match value {
            ast::Value::Null(_) => ConstValue::Null,
            ast::Value::Boolean(b, _) => ConstValue::Boolean(*b),
            ast::Value::Int(i, _) => ConstValue::Int(*i),
            ast::Value::Float(x, _) => ConstValue::Float(*x),
            ast::Value::String(s, _) => ConstValue::String(s.clone()),
            ast::Value::Enum(name) => ConstValue::Enum(self.text(*name)),
            ast::Value::List(items, _) => {
                ConstValue::List(items.iter().map(|item| self.convert_value(item)).collect())
            }
            ast::Value::Object(fields, _) => ConstValue::Object(
                fields
                    .iter()
                    .map(|(name, value)| (self.text(*name), self.convert_value(value)))
                    .collect(),
            ),
        }
    }

    fn undefined(&mut self, name: &str, span: Span) {
        self.diagnostics.error(
            codes::UNDEFINED_TYPE,
            format!("unknown type `{name}`"),
            span,
            "",
        );
    }

    /// Warns about directive applications that nothing defines.
    fn check_directives(&mut self, directives: &[ast::Directive]) {
        for directive in directives {
            let name = self.text(directive.name);
            if !self.directives.contains(&name) {
                self.diagnostics.warning(
                    codes::UNKNOWN_DIRECTIVE,
                    format!("unknown directive `@{name}` is ignored"),
                    directive.name.span,
                    "",
                );
            }
        }
    }

    /// Returns the string value of `@directive(argument: "...")`.
    fn string_argument(
        &self,
        directives: &[ast::Directive],
        directive: &str,
        argument: &str,
    ) -> Option<String> {
        directives
            .iter()
            .filter(|d| self.interner.is(d.name.value, directive))
            .flat_map(|d| d.arguments.iter())
            .find(|arg| self.interner.is(arg.name.value, argument))
            .and_then(|arg| match &arg.value {
                ast::Value::String(s, _) => Some(s.clone()),
                _ => None,
            })
    }

    fn deprecation(&self, directives: &[ast::Directive]) -> Option<String> {
        directives
            .iter()
            .any(|d| self.interner.is(d.name.value, "deprecated"))
            .then(|| {
                self.string_argument(directives, "deprecated", "reason")
                    .unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string())
            })
    }

    fn resolve_roots(
        &mut self,
        definition: Option<&ast::SchemaDefinition>,
        extensions: &[&ast::SchemaDefinition],
    ) -> Option<(String, Option<String>, Option<String>)> {
        let mut roots: FxHashMap<OperationType, String> = FxHashMap::default();

        if let Some(definition) = definition {
            self.check_directives(&definition.directives);
        } else {
            for op in [
                OperationType::Query,
                OperationType::Mutation,
                OperationType::Subscription,
            ] {
                let name = op.default_type_name();
                if self.kinds.get(name) == Some(&TypeKind::Object) {
                    roots.insert(op, name.to_string());
                }
            }
        }

        let explicit = definition
            .into_iter()
            .chain(extensions.iter().copied())
            .flat_map(|def| def.operations.iter());
        let mut declared = FxHashSet::default();
        for operation in explicit {
            let name = self.text(operation.type_name);
            if !declared.insert(operation.operation) {
                self.diagnostics.error(
                    codes::INVALID_ROOT,
                    format!("{} root type is declared more than once", operation.operation.as_str()),
                    operation.span,
                    "",
                );
                continue;
            }
            match self.kinds.get(&name).copied() {
                None => self.undefined(&name, operation.type_name.span),
                Some(TypeKind::Object) => {
                    roots.insert(operation.operation, name);
                }
                Some(kind) => {
                    self.diagnostics.error(
                        codes::INVALID_ROOT,
                        format!(
                            "{} root type must be an object type, but `{name}` is {} {kind} type",
                            operation.operation.as_str(),
                            article(kind)
                        ),
                        operation.type_name.span,
                        "",
                    );
                }
            }
        }

        let Some(query) = roots.remove(&OperationType::Query) else {
            self.diagnostics.add(Diagnostic::error(
                codes::MISSING_QUERY,
                "schema has no query root type: define `type Query` or name one in `schema { query: ... }`",
            ));
            return None;
        };

        let mutation = roots.remove(&OperationType::Mutation);
        let subscription = roots.remove(&OperationType::Subscription);
        for (i, root) in [Some(&query), mutation.as_ref(), subscription.as_ref()]
            .into_iter()
            .flatten()
            .enumerate()
        {
            let duplicated = [Some(&query), mutation.as_ref(), subscription.as_ref()]
                .into_iter()
                .flatten()
                .skip(i + 1)
                .any(|other| other == root);
            if duplicated {
                let span = self.spans.get(root.as_str()).copied().unwrap_or_default();
                self.diagnostics.error(
                    codes::INVALID_ROOT,
                    format!("`{root}` is used for more than one root operation"),
                    span,
                    "",
                );
            }
        }

        Some((query, mutation, subscription))
    }

    /// Every implementer must declare the fields of every interface it
    /// implements, directly or transitively. Interface cycles are rejected.
    fn check_implementations(&mut self, schema: &Schema) {
        for ty in schema.types.values() {
            let name = ty.name();
            if !matches!(ty.kind(), TypeKind::Object | TypeKind::Interface) {
                continue;
            }
            let span = self.spans.get(name).copied().unwrap_or_default();

            if ty.kind() == TypeKind::Interface && reaches(schema, name, name) {
                self.diagnostics.error(
                    codes::INVALID_IMPLEMENTATION,
                    format!("interface `{name}` implements itself through a cycle"),
                    span,
                    "",
                );
                continue;
            }

            for interface in schema.transitive_interfaces(name) {
                let Some(required) = schema.get(interface) else {
                    continue;
                };
                for field in required.fields() {
                    if !ty.fields().iter().any(|f| f.name == field.name) {
                        self.diagnostics.error(
                            codes::INVALID_IMPLEMENTATION,
                            format!(
                                "`{name}` must declare field `{}` required by interface `{interface}`",
                                field.name
                            ),
                            span,
                            "",
                        );
                    }
                }
            }
        }
    }

    /// Every default value must coerce to the type it is declared for.
    fn check_defaults(&mut self, schema: &Schema) {
        for pending in std::mem::take(&mut self.defaults) {
            if let Some(reason) = coercion_error(schema, &pending.ty, &pending.value) {
                self.diagnostics.error(
                    codes::INVALID_DEFAULT,
                    format!(
                        "default value of `{}` is not a valid `{}`: {reason}",
                        pending.coordinate, pending.ty
                    ),
                    pending.span,
                    "",
                );
            }
        }
    }
}

/// Checks `value` against `ty` with input coercion rules and returns why it
/// does not coerce. Custom scalars accept any literal.
fn coercion_error(schema: &Schema, ty: &TypeExpr, value: &ConstValue) -> Option<String> {
    match (ty, value) {
        (TypeExpr::NonNull(_), ConstValue::Null) => Some("`null` for a non-null type".to_string()),
        (TypeExpr::NonNull(inner), value) => coercion_error(schema, inner, value),
        (_, ConstValue::Null) => None,
        (TypeExpr::List(inner), ConstValue::List(items)) => {
            items.iter().find_map(|item| coercion_error(schema, inner, item))
        }
        // A single value coerces to a list of one.
        (TypeExpr::List(inner), value) => coercion_error(schema, inner, value),
        (TypeExpr::Named(name), value) => named_coercion_error(schema, name, value),
    }
}

fn named_coercion_error(schema: &Schema, name: &str, value: &ConstValue) -> Option<String> {
    let mismatch = || Some(format!("`{value}` is not {} `{name}`", indefinite(name)));
    match (schema.get(name)?, value) {
        (NamedType::Scalar(scalar), _) if !scalar.builtin => None,
        (NamedType::Scalar(_), ConstValue::Int(int)) if name == "Int" => {
            i32::try_from(*int).is_err().then(|| format!("`{int}` does not fit in 32 bits"))
        }
        (NamedType::Scalar(_), ConstValue::Float(float)) if name == "Float" => {
            (!float.is_finite()).then(|| "the value is not a finite number".to_string())
        }
        (NamedType::Scalar(_), value) => match (name, value) {
            ("Float" | "ID", ConstValue::Int(_))
            | ("String" | "ID", ConstValue::String(_))
            | ("Boolean", ConstValue::Boolean(_)) => None,
            _ => mismatch(),
        },
        (NamedType::Enum(ty), ConstValue::Enum(item)) => (!ty.values.iter().any(|v| v.name == *item))
            .then(|| format!("`{item}` is not a value of `{name}`")),
        (NamedType::InputObject(ty), ConstValue::Object(fields)) => input_coercion_error(schema, ty, fields),
        _ => mismatch(),
    }
}

fn input_coercion_error(schema: &Schema, ty: &InputObjectType, fields: &[(String, ConstValue)]) -> Option<String> {
    if let Some((unknown, _)) = fields
        .iter()
        .find(|(name, _)| !ty.fields.iter().any(|f| f.name == *name))
    {
        return Some(format!("`{}` has no field `{unknown}`", ty.name));
    }
    ty.fields.iter().find_map(|field| {
        match fields.iter().find(|(name, _)| *name == field.name) {
            Some((_, value)) => coercion_error(schema, &field.ty, value),
            None if field.ty.is_non_null() && field.default_value.is_none() => {
                Some(format!("required field `{}.{}` is missing", ty.name, field.name))
            }
            None => None,
        }
    })
}

fn indefinite(name: &str) -> &'static str {
    if name.starts_with(['A', 'E', 'I', 'O', 'U']) {
        "an"
    } else {
        "a"
    }
}

/// Returns true if `target` is reachable from `from` through `implements`.
fn reaches(schema: &Schema, from: &str, target: &str) -> bool {
    let mut seen = FxHashSet::default();
    let mut stack: Vec<&str> = schema
        .get(from)
        .map(|t| t.interfaces().iter().map(String::as_str).collect())
        .unwrap_or_default();
    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if seen.insert(current) {
            if let Some(ty) = schema.get(current) {
                stack.extend(ty.interfaces().iter().map(String::as_str));
            }
        }
    }
    false
}

fn article(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Object | TypeKind::Interface | TypeKind::Enum | TypeKind::InputObject => "an",
        TypeKind::Scalar | TypeKind::Union => "a",
    }
}
