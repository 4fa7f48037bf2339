//! Core utilities for gqlgen.
//!
//! This crate provides foundational types shared by every pipeline stage:
//! - `span`: Byte ranges into the concatenated SDL source
//! - `source`: Mapping offsets back to `path:line:column`
//! - `text`: String interning
//! - `diagnostics`: Error reporting

pub mod diagnostics;
pub mod source;
pub mod span;
pub mod text;

pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSeverity, Label};
pub use source::{Location, SourceFile, SourceMap};
pub use span::Span;
pub use text::{Interner, Text};
