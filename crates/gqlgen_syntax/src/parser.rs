//! Recursive descent parser for GraphQL SDL.
//!
//! The parser accepts the type-system subset of the GraphQL grammar: schema
//! definitions, type definitions, directive definitions and extensions of
//! each. Executable definitions (operations, fragments) are reported as
//! errors. Commas are insignificant and never reach the grammar rules.

use crate::ast::*;
use crate::lexer::{block_string_value, string_value, Lexer};
use crate::token::{Token, TokenKind};
use gqlgen_core::{diagnostics::codes, DiagnosticBag, Interner, Span};

/// Parser for GraphQL SDL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    diagnostics: DiagnosticBag,
}

/// Result of parsing.
pub struct ParseResult {
    pub document: Document,
    pub diagnostics: DiagnosticBag,
}

/// Parses a source string into a document.
pub fn parse(source: &str, interner: &Interner) -> ParseResult {
    let mut parser = Parser::new(source, interner);
    let document = parser.parse_document();
    ParseResult {
        document,
        diagnostics: parser.diagnostics,
    }
}

impl<'a> Parser<'a> {
    /// Creates a new parser.
    pub fn new(source: &'a str, interner: &'a Interner) -> Self {
        let mut lexer = Lexer::new(source, interner);
        let current = next_significant(&mut lexer);
        Self {
            lexer,
            current,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Returns the current token kind.
    #[inline]
    fn at(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns true if at the given kind.
    #[inline]
    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Returns true if at the given kind or at the end of input.
    #[inline]
    fn at_end_of(&self, kind: TokenKind) -> bool {
        self.at_kind(kind) || self.at_kind(TokenKind::Eof)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current = next_significant(&mut self.lexer);
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a specific token kind.
    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_expected(kind.to_string());
            false
        }
    }

    /// Gets the text of the current token.
    fn current_text(&self) -> &'a str {
        self.lexer.span_text(self.current.span)
    }

    /// Reports an error at the current token.
    fn error(&mut self, code: &'static str, message: impl Into<String>) {
        let message = message.into();
        self.diagnostics
            .error(code, message.clone(), self.current.span, message);
    }

    /// Reports an expected token error.
    fn error_expected(&mut self, expected: impl std::fmt::Display) {
        let code = if self.at_kind(TokenKind::Eof) {
            codes::UNEXPECTED_EOF
        } else {
            codes::UNEXPECTED_TOKEN
        };
        self.diagnostics.error(
            code,
            format!("expected {expected}, found {}", self.at()),
            self.current.span,
            "",
        );
    }

    /// Skips the current token when a loop body consumed nothing.
    fn ensure_progress(&mut self, before: u32) {
        if self.current.span.start == before && !self.at_kind(TokenKind::Eof) {
            self.advance();
        }
    }

    /// Parses a document.
    pub fn parse_document(&mut self) -> Document {
        let start = self.current.span.start;
        let mut definitions = Vec::new();

        while !self.at_kind(TokenKind::Eof) {
            let before = self.current.span.start;
            if let Some(def) = self.parse_definition() {
                definitions.push(def);
            } else {
                self.synchronize(before);
            }
        }

        Document {
            definitions,
            span: Span::new(start, self.current.span.end),
        }
    }

    /// Skips tokens until something that can start a definition at the top
    /// level.
    fn synchronize(&mut self, before: u32) {
        self.ensure_progress(before);
        let mut depth = 0usize;
        loop {
            match self.at() {
                TokenKind::Eof => return,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Type
                | TokenKind::Interface
                | TokenKind::Union
                | TokenKind::Enum
                | TokenKind::Input
                | TokenKind::Scalar
                | TokenKind::Schema
                | TokenKind::Directive
                | TokenKind::Extend
                    if depth == 0 =>
                {
                    return
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Parses a definition.
    fn parse_definition(&mut self) -> Option<Definition> {
        let description = self.try_parse_description();

        match self.at() {
            TokenKind::Schema => Some(Definition::Schema(
                self.parse_schema_definition(description),
            )),
            TokenKind::Type
            | TokenKind::Interface
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Input
            | TokenKind::Scalar => self
                .parse_type_definition(description)
                .map(Definition::Type),
            TokenKind::Directive => Some(Definition::Directive(
                self.parse_directive_definition(description),
            )),
            TokenKind::Extend => {
                if let Some(description) = description {
                    self.diagnostics.error(
                        codes::INVALID_SYNTAX,
                        "extensions cannot have a description",
                        description.span,
                        "",
                    );
                }
                self.advance(); // extend
                if self.at_kind(TokenKind::Schema) {
                    Some(Definition::SchemaExtension(
                        self.parse_schema_definition(None),
                    ))
                } else {
                    self.parse_type_definition(None)
                        .map(Definition::TypeExtension)
                }
            }
            TokenKind::Query
            | TokenKind::Mutation
            | TokenKind::Subscription
            | TokenKind::Fragment
            | TokenKind::LBrace => {
                self.error(
                    codes::EXECUTABLE_DEFINITION,
                    format!(
                        "executable definitions are not allowed in a schema, found {}",
                        self.at()
                    ),
                );
                None
            }
            _ => {
                self.error_expected("a definition");
                None
            }
        }
    }

    /// Tries to parse a description.
    fn try_parse_description(&mut self) -> Option<Description> {
        if !self.at().is_string() {
            return None;
        }
        let span = self.current.span;
        let value = self.parse_string_value();
        Some(Description::new(value, span))
    }

    /// Decodes the current string or block string token.
    fn parse_string_value(&mut self) -> String {
        let text = self.current_text();
        let value = if self.at_kind(TokenKind::BlockStringLiteral) {
            block_string_value(text)
        } else {
            match string_value(text) {
                Ok(value) => value,
                Err(message) => {
                    self.error(codes::INVALID_STRING, message);
                    String::new()
                }
            }
        };
        self.advance();
        value
    }

    /// Parses a name.
    fn parse_name(&mut self) -> Name {
        let span = self.current.span;
        if self.at().is_name() {
            let value = self.lexer.intern_span(span);
            self.advance();
            Name::new(value, span)
        } else {
            self.error_expected(TokenKind::Ident);
            Name::new(self.lexer.intern_span(Span::empty(span.start)), span)
        }
    }

    /// Parses a schema definition or extension; `schema` is current.
    fn parse_schema_definition(&mut self, description: Option<Description>) -> SchemaDefinition {
        let start = description
            .as_ref()
            .map_or(self.current.span.start, |d| d.span.start);
        self.advance(); // schema

        let directives = self.parse_directives();
        let mut operations = Vec::new();

        if self.eat(TokenKind::LBrace) {
            while !self.at_end_of(TokenKind::RBrace) {
                let before = self.current.span.start;
                let op_start = self.current.span.start;
                let operation = match self.at() {
                    TokenKind::Query => Some(OperationType::Query),
                    TokenKind::Mutation => Some(OperationType::Mutation),
                    TokenKind::Subscription => Some(OperationType::Subscription),
                    _ => None,
                };
                let Some(operation) = operation else {
                    self.error_expected("`query`, `mutation` or `subscription`");
                    self.ensure_progress(before);
                    continue;
                };
                self.advance();
                self.expect(TokenKind::Colon);
                let type_name = self.parse_name();
                operations.push(OperationTypeDefinition {
                    operation,
                    type_name,
                    span: Span::new(op_start, type_name.span.end),
                });
            }
            self.expect(TokenKind::RBrace);
        }

        SchemaDefinition {
            description,
            directives,
            operations,
            span: Span::new(start, self.current.span.start),
        }
    }

    /// Parses a type definition or the body of a type extension.
    fn parse_type_definition(&mut self, description: Option<Description>) -> Option<TypeDefinition> {
        let start = description
            .as_ref()
            .map_or(self.current.span.start, |d| d.span.start);
        let keyword = self.at();
        match keyword {
            TokenKind::Scalar
            | TokenKind::Type
            | TokenKind::Interface
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Input => self.advance(),
            _ => {
                self.error_expected("a type definition keyword");
                return None;
            }
        }

        let name = self.parse_name();

        let definition = match keyword {
            TokenKind::Scalar => {
                let directives = self.parse_directives();
                TypeDefinition::Scalar(ScalarTypeDefinition {
                    description,
                    name,
                    directives,
                    span: Span::new(start, self.current.span.start),
                })
            }
            TokenKind::Type => {
                let implements = self.parse_implements();
                let directives = self.parse_directives();
                let fields = self.parse_fields_definition();
                TypeDefinition::Object(ObjectTypeDefinition {
                    description,
                    name,
                    implements,
                    directives,
                    fields,
                    span: Span::new(start, self.current.span.start),
                })
            }
            TokenKind::Interface => {
                let implements = self.parse_implements();
                let directives = self.parse_directives();
                let fields = self.parse_fields_definition();
                TypeDefinition::Interface(InterfaceTypeDefinition {
                    description,
                    name,
                    implements,
                    directives,
                    fields,
                    span: Span::new(start, self.current.span.start),
                })
            }
            TokenKind::Union => {
                let directives = self.parse_directives();
                let members = self.parse_union_members();
                TypeDefinition::Union(UnionTypeDefinition {
                    description,
                    name,
                    directives,
                    members,
                    span: Span::new(start, self.current.span.start),
                })
            }
            TokenKind::Enum => {
                let directives = self.parse_directives();
                let values = self.parse_enum_values();
                TypeDefinition::Enum(EnumTypeDefinition {
                    description,
                    name,
                    directives,
                    values,
                    span: Span::new(start, self.current.span.start),
                })
            }
            _ => {
                let directives = self.parse_directives();
                let fields = if self.eat(TokenKind::LBrace) {
                    let fields = self.parse_input_value_definitions(TokenKind::RBrace);
                    self.expect(TokenKind::RBrace);
                    fields
                } else {
                    Vec::new()
                };
                TypeDefinition::InputObject(InputObjectTypeDefinition {
                    description,
                    name,
                    directives,
                    fields,
                    span: Span::new(start, self.current.span.start),
                })
            }
        };

        Some(definition)
    }

    /// Parses `implements A & B`, allowing a leading `&`.
    fn parse_implements(&mut self) -> Vec<Name> {
        let mut names = Vec::new();
        if self.eat(TokenKind::Implements) {
            self.eat(TokenKind::Amp);
            names.push(self.parse_name());
            while self.eat(TokenKind::Amp) {
                names.push(self.parse_name());
            }
        }
        names
    }

    /// Parses `= A | B`, allowing a leading `|`.
    fn parse_union_members(&mut self) -> Vec<Name> {
        let mut members = Vec::new();
        if self.eat(TokenKind::Eq) {
            self.eat(TokenKind::Pipe);
            members.push(self.parse_name());
            while self.eat(TokenKind::Pipe) {
                members.push(self.parse_name());
            }
        }
        members
    }

    /// Parses enum values.
    fn parse_enum_values(&mut self) -> Vec<EnumValueDefinition> {
        let mut values = Vec::new();
        if !self.eat(TokenKind::LBrace) {
            return values;
        }
        while !self.at_end_of(TokenKind::RBrace) {
            let before = self.current.span.start;
            let description = self.try_parse_description();
            let start = description
                .as_ref()
                .map_or(self.current.span.start, |d| d.span.start);
            if matches!(
                self.at(),
                TokenKind::True | TokenKind::False | TokenKind::Null
            ) {
                self.error(
                    codes::INVALID_SYNTAX,
                    format!("{} cannot be used as an enum value", self.at()),
                );
            }
            let name = self.parse_name();
            let directives = self.parse_directives();
            values.push(EnumValueDefinition {
                description,
                name,
                directives,
                span: Span::new(start, self.current.span.start),
            });
            self.ensure_progress(before);
        }
        self.expect(TokenKind::RBrace);
        values
    }

    /// Parses a fields definition block, if present.
    fn parse_fields_definition(&mut self) -> Vec<FieldDefinition> {
        let mut fields = Vec::new();
        if !self.eat(TokenKind::LBrace) {
            return fields;
        }
        while !self.at_end_of(TokenKind::RBrace) {
            let before = self.current.span.start;
            fields.push(self.parse_field_definition());
            self.ensure_progress(before);
        }
        self.expect(TokenKind::RBrace);
        fields
    }

    /// Parses a field definition.
    fn parse_field_definition(&mut self) -> FieldDefinition {
        let description = self.try_parse_description();
        let start = description
            .as_ref()
            .map_or(self.current.span.start, |d| d.span.start);
        let name = self.parse_name();

        let arguments = if self.eat(TokenKind::LParen) {
            let args = self.parse_input_value_definitions(TokenKind::RParen);
            self.expect(TokenKind::RParen);
            args
        } else {
            Vec::new()
        };

        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        let directives = self.parse_directives();

        FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
            span: Span::new(start, self.current.span.start),
        }
    }

    /// Parses input value definitions up to (not including) `close`.
    fn parse_input_value_definitions(&mut self, close: TokenKind) -> Vec<InputValueDefinition> {
        let mut values = Vec::new();
        while !self.at_end_of(close) {
            let before = self.current.span.start;
            values.push(self.parse_input_value_definition());
            self.ensure_progress(before);
        }
        values
    }

    /// Parses an input value definition.
    fn parse_input_value_definition(&mut self) -> InputValueDefinition {
        let description = self.try_parse_description();
        let start = description
            .as_ref()
            .map_or(self.current.span.start, |d| d.span.start);
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();

        let default_value = if self.eat(TokenKind::Eq) {
            Some(self.parse_value())
        } else {
            None
        };

        let directives = self.parse_directives();

        InputValueDefinition {
            description,
            name,
            ty,
            default_value,
            directives,
            span: Span::new(start, self.current.span.start),
        }
    }

    /// Parses a type reference.
    fn parse_type(&mut self) -> Type {
        let start = self.current.span.start;

        let ty = if self.eat(TokenKind::LBracket) {
            let inner = self.parse_type();
            self.expect(TokenKind::RBracket);
            Type::List(Box::new(inner), Span::new(start, self.current.span.start))
        } else {
            Type::Named(self.parse_name())
        };

        if self.at_kind(TokenKind::Bang) {
            let end = self.current.span.end;
            self.advance();
            Type::NonNull(Box::new(ty), Span::new(start, end))
        } else {
            ty
        }
    }

    /// Parses a directive definition.
    fn parse_directive_definition(&mut self, description: Option<Description>) -> DirectiveDefinition {
        let start = description
            .as_ref()
            .map_or(self.current.span.start, |d| d.span.start);
        self.advance(); // directive
        self.expect(TokenKind::At);
        let name = self.parse_name();

        let arguments = if self.eat(TokenKind::LParen) {
            let args = self.parse_input_value_definitions(TokenKind::RParen);
            self.expect(TokenKind::RParen);
            args
        } else {
            Vec::new()
        };

        let repeatable = self.eat(TokenKind::Repeatable);
        self.expect(TokenKind::On);
        self.eat(TokenKind::Pipe);

        let mut locations = Vec::new();
        loop {
            let location = self.current_text();
            match DirectiveLocation::from_name(location) {
                Some(parsed) if self.at_kind(TokenKind::Ident) => {
                    locations.push(parsed);
                    self.advance();
                }
                _ => {
                    self.error(
                        codes::INVALID_SYNTAX,
                        format!("unknown directive location `{location}`"),
                    );
                    break;
                }
            }
            if !self.eat(TokenKind::Pipe) {
                break;
            }
        }

        DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
            span: Span::new(start, self.current.span.start),
        }
    }

    /// Parses directives.
    fn parse_directives(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        while self.at_kind(TokenKind::At) {
            directives.push(self.parse_directive());
        }
        directives
    }

    /// Parses a directive.
    fn parse_directive(&mut self) -> Directive {
        let start = self.current.span.start;
        self.advance(); // @

        let name = self.parse_name();
        let mut arguments = Vec::new();
        if self.eat(TokenKind::LParen) {
            while !self.at_end_of(TokenKind::RParen) {
                let before = self.current.span.start;
                arguments.push(self.parse_argument());
                self.ensure_progress(before);
            }
            self.expect(TokenKind::RParen);
        }

        Directive {
            name,
            arguments,
            span: Span::new(start, self.current.span.start),
        }
    }

    /// Parses an argument.
    fn parse_argument(&mut self) -> Argument {
        let start = self.current.span.start;
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let value = self.parse_value();
        Argument {
            name,
            value,
            span: Span::new(start, self.current.span.start),
        }
    }

    /// Parses a constant value.
    fn parse_value(&mut self) -> Value {
        let start = self.current.span.start;
        let span = self.current.span;

        match self.at() {
            TokenKind::IntLiteral => {
                let value = if let Ok(value) = self.current_text().parse() {
                    value
                } else {
                    self.error(codes::INVALID_SYNTAX, "integer literal out of range");
                    0
                };
                self.advance();
                Value::Int(value, span)
            }
            TokenKind::FloatLiteral => {
                let value = self.current_text().parse().unwrap_or(0.0);
                self.advance();
                Value::Float(value, span)
            }
            TokenKind::StringLiteral | TokenKind::BlockStringLiteral => {
                let value = self.parse_string_value();
                Value::String(value, span)
            }
            TokenKind::True => {
                self.advance();
                Value::Boolean(true, span)
            }
            TokenKind::False => {
                self.advance();
                Value::Boolean(false, span)
            }
            TokenKind::Null => {
                self.advance();
                Value::Null(span)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut values = Vec::new();
                while !self.at_end_of(TokenKind::RBracket) {
                    let before = self.current.span.start;
                    values.push(self.parse_value());
                    self.ensure_progress(before);
                }
                self.expect(TokenKind::RBracket);
                Value::List(values, Span::new(start, self.current.span.start))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                while !self.at_end_of(TokenKind::RBrace) {
                    let before = self.current.span.start;
                    let name = self.parse_name();
                    self.expect(TokenKind::Colon);
                    let value = self.parse_value();
                    fields.push((name, value));
                    self.ensure_progress(before);
                }
                self.expect(TokenKind::RBrace);
                Value::Object(fields, Span::new(start, self.current.span.start))
            }
            TokenKind::Dollar => {
                self.error(
                    codes::INVALID_SYNTAX,
                    "variables are not allowed in a schema",
                );
                self.advance();
                Value::Null(span)
            }
            kind if kind.is_name() => Value::Enum(self.parse_name()),
            _ => {
                self.error_expected("a value");
                Value::Null(span)
            }
        }
    }
}

/// Returns the next token that is not a comma.
fn next_significant(lexer: &mut Lexer<'_>) -> Token {
    loop {
        let token = lexer.next_token();
        if token.kind != TokenKind::Comma {
            return token;
        }
    }
}
