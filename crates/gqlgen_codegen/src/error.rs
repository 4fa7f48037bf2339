//! Generator errors.
//!
//! Every failure is fatal to a generation run. Each variant is one error kind
//! with a stable diagnostic code.

use std::io;
use std::path::PathBuf;

/// Result type for generator operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A generation failure.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    /// An input path could not be read or is not UTF-8.
    #[error("cannot read {}: {source}", .path.display())]
    #[diagnostic(code(gqlgen::sdl_read))]
    SdlRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The SDL failed to parse or validate.
    #[error("{message}")]
    #[diagnostic(code(gqlgen::sdl_parse))]
    SdlParse {
        /// The first error, located as `path:line:column`.
        message: String,
        /// Total number of errors reported.
        count: usize,
    },

    /// A GraphQL name or configured path has no safe Rust spelling.
    #[error("cannot map `{name}` to a Rust identifier: {reason}")]
    #[diagnostic(code(gqlgen::name_mapping))]
    NameMapping { name: String, reason: String },

    /// The schema uses a type in a position the generator cannot render.
    #[error("unsupported type `{name}`: {reason}")]
    #[diagnostic(code(gqlgen::unsupported_type))]
    UnsupportedType { name: String, reason: String },

    /// The output directory or one of the generated files could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    #[diagnostic(code(gqlgen::output_write))]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Returns the error kind label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SdlRead { .. } => "SdlRead",
            Self::SdlParse { .. } => "SdlParse",
            Self::NameMapping { .. } => "NameMapping",
            Self::UnsupportedType { .. } => "UnsupportedType",
            Self::OutputWrite { .. } => "OutputWrite",
        }
    }

    pub(crate) fn name_mapping(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NameMapping {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
