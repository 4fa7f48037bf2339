//! End-to-end generation tests: scenarios and output properties.

use gqlgen_codegen::{generate_from_str, GeneratedFiles, Generator, GeneratorOptions};
use gqlgen_schema::{build_schema, ConstValue, NamedType};
use pretty_assertions::assert_eq;
use std::fs;

fn generate(sdl: &str) -> GeneratedFiles {
    generate_from_str(sdl).unwrap()
}

/// Returns the resolver declaration of `method`, trimmed.
fn signature<'a>(types: &'a str, method: &str) -> &'a str {
    let needle = format!("async fn {method}(");
    types
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(&needle))
        .unwrap_or_else(|| panic!("no resolver `{method}` in:\n{types}"))
}

/// Returns the output type of a resolver declaration, without `Result<..>`.
fn output_type<'a>(types: &'a str, method: &str) -> &'a str {
    let line = signature(types, method);
    let (_, output) = line.split_once(") -> Result<").unwrap();
    output.strip_suffix(">;").unwrap()
}

#[test]
fn test_enum_is_closed_and_ordered() {
    let files = generate("enum Role { USER ADMIN } type Query { role: Role! }");
    assert!(files.types.contains("pub enum Role {\n    USER,\n    ADMIN,\n}\n"));
    assert!(files
        .types
        .contains("pub const ALL: &[Self] = &[Self::USER, Self::ADMIN];"));
    assert!(files.types.contains("Self::USER => \"USER\","));
    assert!(files.types.contains("\"ADMIN\" => Ok(Self::ADMIN),"));
    assert!(files.schema.contains(
        "dynamic::Enum::new(\"Role\")\n        .item(dynamic::EnumItem::new(\"USER\"))\n        .item(dynamic::EnumItem::new(\"ADMIN\"))\n"
    ));
    assert!(files
        .schema
        .contains("runtime::output::enumeration::<types::Role>()(value).map(Some)"));
}

#[test]
fn test_nullable_and_non_null_scalars() {
    let files = generate("type X { a: String b: String! } type Query { x: X }");
    assert_eq!(
        signature(&files.types, "a"),
        "async fn a(&self, context: &Context, info: &ResolveInfo<'_>) -> Result<Option<String>>;"
    );
    assert_eq!(
        signature(&files.types, "b"),
        "async fn b(&self, context: &Context, info: &ResolveInfo<'_>) -> Result<String>;"
    );
}

#[test]
fn test_lists_of_non_null() {
    let files = generate("type X { tags: [String!] all: [String!]! } type Query { x: X }");
    assert_eq!(output_type(&files.types, "tags"), "Option<Vec<String>>");
    assert_eq!(output_type(&files.types, "all"), "Vec<String>");
    assert!(files
        .schema
        .contains("dynamic::Field::new(\"tags\", dynamic::TypeRef::named_nn_list(\"String\")"));
    assert!(files
        .schema
        .contains("dynamic::Field::new(\"all\", dynamic::TypeRef::named_nn_list_nn(\"String\")"));
}

#[test]
fn test_interface_polymorphism() {
    let files = generate(
        "interface Node { id: ID! } type User implements Node { id: ID! name: String } type Query { node: Node }",
    );
    assert!(files
        .types
        .contains("pub trait UserObject: NodeInterface + IntoAny {"));
    assert!(files.types.contains("pub trait NodeInterface: IntoAny {"));
    assert!(files.types.contains("type User: UserObject;"));
    // `id` is declared once, on the interface.
    assert_eq!(files.types.matches("async fn id(").count(), 1);
    assert!(files.schema.contains(
        "if let Ok(value) = value.downcast::<R::User>() {\n        return Ok(dynamic::FieldValue::owned_any(value as Box<dyn types::UserObject>).with_type(\"User\"));\n    }\n"
    ));
    assert!(files
        .schema
        .contains("let value = types::NodeInterface::id(&**parent, context, ctx.ctx).await?;"));
    assert!(files
        .schema
        .contains("runtime::output::nullable(Node_value::<R>)(value).map(Some)"));
}

#[test]
fn test_union_dispatch() {
    let files = generate(
        r"
        type User { name: String }
        type Post { title: String }
        union UserOrPost = User | Post
        type Query { find: UserOrPost }
        ",
    );
    assert!(files
        .types
        .contains("pub trait UserOrPostUnion: IntoAny {}"));
    assert!(files.types.contains("pub trait PostObject: UserOrPostUnion + IntoAny {"));
    let discriminator = files
        .schema
        .split("fn UserOrPost_value")
        .nth(1)
        .and_then(|rest| rest.split("\n}\n").next())
        .unwrap();
    assert!(discriminator.contains("value.downcast::<R::Post>()"));
    assert!(discriminator.contains(".with_type(\"Post\")"));
    assert!(discriminator.contains("value.downcast::<R::User>()"));
    assert!(discriminator.contains(".with_type(\"User\")"));
    assert!(discriminator.contains("runtime::UnknownImplementer::new(\"UserOrPost\", type_name)"));
    assert!(files.schema.contains(
        "dynamic::Union::new(\"UserOrPost\")\n        .possible_type(\"User\")\n        .possible_type(\"Post\")\n"
    ));
}

#[test]
fn test_custom_scalar_bridges() {
    let files = generate(
        "scalar EmailAddress type Query { echo(email: EmailAddress!): EmailAddress }",
    );
    assert!(files
        .types
        .contains("const _: () = runtime::assert_scalar::<scalars::EmailAddress>();"));
    assert!(files
        .schema
        .contains(".validator(runtime::scalar::validator::<scalars::EmailAddress>)"));
    assert!(files.schema.contains(
        "let email = runtime::input::argument(&ctx.args, \"email\", runtime::input::scalar::<scalars::EmailAddress>())?;"
    ));
    assert!(files.schema.contains(
        "runtime::output::nullable(runtime::output::scalar::<scalars::EmailAddress>())(value).map(Some)"
    ));
}

#[test]
fn test_subscription_returns_streams() {
    let files = generate(
        r"
        type User { id: ID! }
        type Query { me: User }
        type Subscription { watchUser(id: ID!): User }
        ",
    );
    assert_eq!(
        signature(&files.types, "watchUser"),
        "async fn watchUser(id: String, context: &Context, info: &ResolveInfo<'_>) -> Result<AnyStream<Option<Box<dyn UserObject>>>>;"
    );
    assert!(files.types.contains("type Subscription: SubscriptionObject;"));
    assert!(files.schema.contains("dynamic::Subscription::new(\"Subscription\")"));
    assert!(files.schema.contains(
        "Ok(runtime::output::stream(stream, runtime::output::nullable(runtime::output::object::<Box<dyn types::UserObject>>())))"
    ));
    assert!(!files.schema.contains("Subscription_object"));
}

#[test]
fn test_generation_is_deterministic() {
    let sdl = r"
        interface Node { id: ID! }
        union Feed = Post | User
        enum Sort { NEW OLD }
        input Page { first: Int = 10 sort: Sort = NEW }
        type User implements Node { id: ID! }
        type Post implements Node { id: ID! }
        type Query { feed(page: Page): [Feed!]! node: Node }
    ";
    assert_eq!(generate(sdl), generate(sdl));

    // Declaration order does not matter, only field order does.
    let reordered = r"
        type Query { feed(page: Page): [Feed!]! node: Node }
        type Post implements Node { id: ID! }
        type User implements Node { id: ID! }
        input Page { first: Int = 10 sort: Sort = NEW }
        enum Sort { NEW OLD }
        union Feed = Post | User
        interface Node { id: ID! }
    ";
    let (a, b) = (generate(sdl), generate(reordered));
    assert_eq!(a.types, b.types);
    assert_eq!(a.schema, b.schema);
}

#[test]
fn test_reference_properties() {
    let named = ["String", "Int", "Float", "Boolean", "ID", "Url", "Kind", "Obj", "Iface", "Either"];
    let mut sdl = String::from(
        "scalar Url enum Kind { A } type Obj implements Iface { id: ID } interface Iface { id: ID } union Either = Obj\n",
    );
    sdl.push_str("type Query { dummy: Int }\ntype Probe {\n");
    for (i, name) in named.iter().enumerate() {
        sdl.push_str(&format!(
            "  n{i}: {name}\n  nn{i}: {name}!\n  l{i}: [{name}]\n  ln{i}: [{name}!]\n  nl{i}: [{name}]!\n"
        ));
    }
    sdl.push_str("}\n");
    let files = generate(&sdl);

    for (i, name) in named.iter().enumerate() {
        let nullable = output_type(&files.types, &format!("n{i}"));
        let non_null = output_type(&files.types, &format!("nn{i}"));
        assert!(!non_null.is_empty());
        assert_eq!(nullable, format!("Option<{non_null}>"), "{name}");
        assert_eq!(
            output_type(&files.types, &format!("l{i}")),
            format!("Option<Vec<{nullable}>>"),
            "{name}"
        );
        assert_eq!(
            output_type(&files.types, &format!("ln{i}")),
            format!("Option<Vec<{non_null}>>"),
            "{name}"
        );
        assert_eq!(
            output_type(&files.types, &format!("nl{i}")),
            format!("Vec<{nullable}>"),
            "{name}"
        );
    }
    assert_eq!(output_type(&files.types, "nn7"), "Box<dyn ObjObject>");
    assert_eq!(output_type(&files.types, "n8"), "Option<Box<dyn IfaceInterface>>");
    assert_eq!(output_type(&files.types, "nn9"), "Box<dyn EitherUnion>");
    assert_eq!(output_type(&files.types, "nn5"), "scalars::Url");
}

#[test]
fn test_declarations_close_over_interfaces_and_unions() {
    let files = generate(
        r"
        interface Entity { id: ID! }
        interface Node implements Entity { id: ID! }
        union Feed = Post
        union Authored = Post | Comment
        type Comment implements Entity { id: ID! }
        type Post implements Node & Entity { id: ID! }
        type Query { feed: [Feed] authored: [Authored] node: Node }
        ",
    );
    assert!(files.types.contains(
        "pub trait PostObject: AuthoredUnion + FeedUnion + EntityInterface + NodeInterface + IntoAny {}"
    ));
    assert!(files
        .types
        .contains("pub trait CommentObject: AuthoredUnion + EntityInterface + IntoAny {}"));
    assert!(files.schema.contains(
        "dynamic::Object::new(\"Post\")\n        .implement(\"Entity\")\n        .implement(\"Node\")\n"
    ));
    assert!(files.schema.contains(
        "dynamic::Interface::new(\"Node\")\n        .implement(\"Entity\")\n"
    ));
}

/// Pulls the SDL back out of the generated constant.
fn embedded_sdl(file: &str) -> String {
    let (_, literal) = file.split_once("pub const SCHEMA_SDL: &str = r").unwrap();
    let hashes = literal.len() - literal.trim_start_matches('#').len();
    let body = &literal[hashes + 1..];
    let end = body.rfind(&format!("\"{}", "#".repeat(hashes))).unwrap();
    body[..end].to_string()
}

#[test]
fn test_embedded_sdl_rebuilds_the_schema() {
    let sdl = r##"
        """
        A "quoted" description with "#hashes"#.
        """
        type Query { a(s: String = "x\"#y"): Int }
    "##;
    let files = generate(sdl);
    let embedded = embedded_sdl(&files.sdl);
    let original = build_schema(&format!("{sdl}\n")).schema.unwrap();
    let rebuilt = build_schema(&embedded).schema.unwrap();
    assert_eq!(original, rebuilt);
}

/// Parses the `runtime::literal` expressions default values are written as.
struct LiteralParser<'a> {
    rest: &'a str,
}

impl LiteralParser<'_> {
    fn eat(&mut self, prefix: &str) -> bool {
        if let Some(rest) = self.rest.strip_prefix(prefix) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, prefix: &str) {
        assert!(self.eat(prefix), "expected `{prefix}` at `{}`", self.rest);
    }

    fn until(&mut self, end: char) -> &str {
        let at = self.rest.find(end).unwrap();
        let (token, rest) = self.rest.split_at(at);
        self.rest = rest;
        token
    }

    fn string(&mut self) -> String {
        self.expect("\"");
        let rest = self.rest;
        let mut out = String::new();
        let mut chars = rest.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.rest = &rest[i + 1..];
                    return out;
                }
                '\\' => match chars.next().unwrap().1 {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'u' => {
                        let mut hex = String::new();
                        for (_, c) in chars.by_ref() {
                            match c {
                                '{' => {}
                                '}' => break,
                                c => hex.push(c),
                            }
                        }
                        out.push(char::from_u32(u32::from_str_radix(&hex, 16).unwrap()).unwrap());
                    }
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
        panic!("unterminated string");
    }

    fn items<T>(&mut self, mut item: impl FnMut(&mut Self) -> T) -> Vec<T> {
        self.expect("vec![");
        let mut items = Vec::new();
        while !self.eat("]") {
            items.push(item(self));
            self.eat(", ");
        }
        items
    }

    fn value(&mut self) -> ConstValue {
        self.expect("runtime::literal::");
        let value = if self.eat("null(") {
            ConstValue::Null
        } else if self.eat("boolean(") {
            ConstValue::Boolean(self.until(')').parse().unwrap())
        } else if self.eat("int(") {
            ConstValue::Int(self.until(')').parse().unwrap())
        } else if self.eat("float(") {
            ConstValue::Float(self.until(')').parse().unwrap())
        } else if self.eat("string(") {
            ConstValue::String(self.string())
        } else if self.eat("enum_value(") {
            ConstValue::Enum(self.string())
        } else if self.eat("list(") {
            ConstValue::List(self.items(Self::value))
        } else if self.eat("object(") {
            ConstValue::Object(self.items(|p| {
                p.expect("(");
                let key = p.string();
                p.expect(", ");
                let value = p.value();
                p.expect(")");
                (key, value)
            }))
        } else {
            panic!("unknown literal at `{}`", self.rest);
        };
        self.expect(")");
        value
    }
}

#[test]
fn test_default_values_transcribe_faithfully() {
    let sdl = r#"
        enum Color { RED GREEN }
        input Point { x: Int! y: Int! tag: String }
        type Query {
          f(
            a: Int = -42
            b: Float = 1.5e3
            c: String = "tab\there \"q\" \\ é \u0001"
            d: Boolean = true
            e: Color = GREEN
            g: [Int] = [1, null, 3]
            h: Point = { y: 2, x: 1, tag: null }
            i: [[Point!]] = [[{ x: 0, y: 0 }]]
            j: String = null
            k: Float = 7
          ): Int
        }
    "#;
    let files = generate(sdl);
    let schema = build_schema(sdl).schema.unwrap();
    let Some(NamedType::Object(query)) = schema.get("Query") else {
        panic!("no Query");
    };
    let expected: Vec<&ConstValue> = query.fields[0]
        .arguments
        .iter()
        .map(|arg| arg.default_value.as_ref().unwrap())
        .collect();

    let parsed: Vec<ConstValue> = files
        .schema
        .split(".default_value(")
        .skip(1)
        .map(|rest| LiteralParser { rest }.value())
        .collect();
    assert_eq!(parsed.iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_keywords_become_valid_identifiers() {
    let files = generate("type Query { type(self: Int, fn: Int): String match: Int }");
    assert_eq!(
        signature(&files.types, "r#type"),
        "async fn r#type(self_: Option<i32>, r#fn: Option<i32>, context: &Context, info: &ResolveInfo<'_>) -> Result<Option<String>>;"
    );
    assert!(files.types.contains("async fn r#match("));
    assert!(files
        .schema
        .contains("<R::Query as types::QueryObject>::r#type(self_, r#fn, context, ctx.ctx)"));
}

#[test]
fn test_root_type_as_field_type_is_unsupported() {
    let error = generate_from_str("type Query { me: Query }").unwrap_err();
    assert_eq!(error.kind(), "UnsupportedType");
    assert!(error.to_string().contains("`Query`"), "{error}");
}

#[test]
fn test_defaults_that_cannot_coerce_are_parse_errors() {
    let error = generate_from_str("type Query { a(x: Int = 3000000000): Int }").unwrap_err();
    assert_eq!(error.kind(), "SdlParse");
    assert!(error.to_string().contains("`3000000000` does not fit in 32 bits"), "{error}");

    let error = generate_from_str("input P { n: Float = 1e400 } type Query { a(p: P): Int }").unwrap_err();
    assert_eq!(error.kind(), "SdlParse");
    assert!(error.to_string().contains("default value of `P.n`"), "{error}");
}

#[test]
fn test_invalid_option_paths_are_rejected() {
    let options = GeneratorOptions {
        runtime_crate: "my-runtime".to_string(),
        ..GeneratorOptions::default()
    };
    assert_eq!(Generator::new(options).unwrap_err().kind(), "NameMapping");
}

#[test]
fn test_custom_paths_flow_into_files() {
    let options = GeneratorOptions {
        runtime_crate: "crate::gql::runtime".to_string(),
        context_type: "crate::AppState".to_string(),
        scalars_module: "crate::gql::scalars".to_string(),
    };
    let generator = Generator::new(options).unwrap();
    let mut sources = gqlgen_core::SourceMap::new();
    sources.push("s.graphql", "scalar Url type Query { home: Url }");
    let files = generator.generate_source(&sources).unwrap();
    assert!(files.types.contains("use crate::AppState as Context;\n"));
    assert!(files.types.contains("use crate::gql::scalars;\n"));
    assert!(files.schema.contains("use crate::gql::runtime as runtime;\n"));
}

#[test]
fn test_generate_writes_files_from_several_documents() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.graphql");
    let b = dir.path().join("b.graphql");
    fs::write(&a, "type Query { a: Int }").unwrap();
    fs::write(&b, "extend type Query { b: String }").unwrap();
    let out = dir.path().join("generated");

    let written = Generator::default().generate(&[&a, &b], &out).unwrap();
    assert_eq!(written.len(), 3);
    let types = fs::read_to_string(out.join("types.rs")).unwrap();
    assert!(types.contains("async fn a("));
    assert!(types.contains("async fn b("));
    let sdl = fs::read_to_string(out.join("sdl.rs")).unwrap();
    assert!(sdl.contains("type Query { a: Int }\nextend type Query { b: String }\n"));
}

#[test]
fn test_errors_name_the_failing_document() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.graphql");
    let error = Generator::default().generate(&[&missing], dir.path()).unwrap_err();
    assert_eq!(error.kind(), "SdlRead");

    let a = dir.path().join("a.graphql");
    let b = dir.path().join("b.graphql");
    fs::write(&a, "type Query { a: Int }\n").unwrap();
    fs::write(&b, "\ntype Extra { b: Missing }\n").unwrap();
    let error = Generator::default().generate(&[&a, &b], dir.path()).unwrap_err();
    assert_eq!(error.kind(), "SdlParse");
    assert!(error.to_string().contains("b.graphql:2:"), "{error}");
    assert!(!dir.path().join("types.rs").exists());
}
