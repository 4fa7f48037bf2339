//! GraphQL SDL to Rust code generation.
//!
//! The generator reads SDL documents and writes three module files that bind
//! user resolvers to async-graphql's dynamic schema:
//! - `types.rs`: enums, input structs and one resolver trait per output type
//! - `schema.rs`: `build_graphql_schema::<R: Resolvers>()`
//! - `sdl.rs`: the SDL the files were generated from
//!
//! # Example
//!
//! ```
//! use gqlgen_codegen::generate_from_str;
//!
//! let files = generate_from_str("type Query { hello(name: String!): String }").unwrap();
//! assert!(files.types.contains("pub trait QueryObject"));
//! assert!(files.schema.contains("pub fn build_graphql_schema"));
//! ```

mod contracts;
mod error;
mod literal;
mod loader;
mod names;
mod output;
mod plan;
mod schema_emitter;
mod sdl_emitter;
mod type_ref;
mod types_emitter;
mod writer;

pub use error::{Error, Result};
pub use loader::load_sdl;
pub use output::write_files;

use gqlgen_core::SourceMap;
use gqlgen_schema::{build_schema, TypeKind};
use plan::Plan;
use std::path::{Path, PathBuf};

/// File name of the generated type declarations.
pub const TYPES_FILE: &str = "types.rs";
/// File name of the generated schema builder.
pub const SCHEMA_FILE: &str = "schema.rs";
/// File name of the generated SDL constant.
pub const SDL_FILE: &str = "sdl.rs";

/// Banner every generated file starts with.
pub(crate) const BANNER: &str = "// @generated by gqlgen. Do not edit.";

/// Paths generated code uses to reach code it does not generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Path of the runtime support crate.
    pub runtime_crate: String,
    /// Path of the user's context type, as seen from the generated modules.
    pub context_type: String,
    /// Path of the module holding custom scalar types.
    pub scalars_module: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            runtime_crate: "gqlgen_runtime".to_string(),
            context_type: "super::Context".to_string(),
            scalars_module: "super::scalars".to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Checks that every option is a Rust path.
    pub fn validate(&self) -> Result<()> {
        names::validate_path(&self.runtime_crate)?;
        names::validate_path(&self.context_type)?;
        names::validate_path(&self.scalars_module)
    }
}

/// The contents of the three generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub types: String,
    pub schema: String,
    pub sdl: String,
}

impl GeneratedFiles {
    /// Returns `(file name, contents)` pairs in write order.
    #[must_use]
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (TYPES_FILE, self.types.as_str()),
            (SCHEMA_FILE, self.schema.as_str()),
            (SDL_FILE, self.sdl.as_str()),
        ]
    }
}

/// Generates Rust modules from SDL.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    /// Creates a generator, validating the options.
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Reads the SDL documents at `paths` and writes the generated files to
    /// `out_dir`. Returns the written paths.
    pub fn generate<P: AsRef<Path>>(&self, paths: &[P], out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let sources = load_sdl(paths)?;
        let files = self.generate_source(&sources)?;
        write_files(out_dir.as_ref(), &files)
    }

    /// Generates the three files for already loaded SDL.
    pub fn generate_source(&self, sources: &SourceMap) -> Result<GeneratedFiles> {
        let span = tracing::info_span!("generate", documents = sources.files().len());
        let _guard = span.enter();

        let result = build_schema(sources.text());
        for warning in result.diagnostics.warnings() {
            tracing::warn!("{}", warning.render(sources));
        }
        let mut errors = result.diagnostics.errors();
        if let Some(first) = errors.next() {
            let rest: Vec<String> = errors.map(|e| e.render(sources)).collect();
            for error in &rest {
                tracing::debug!("{error}");
            }
            let mut message = first.render(sources);
            if !rest.is_empty() {
                let plural = if rest.len() == 1 { "" } else { "s" };
                message.push_str(&format!(" (and {} more error{plural})", rest.len()));
            }
            return Err(Error::SdlParse {
                message,
                count: rest.len() + 1,
            });
        }
        let Some(schema) = result.schema else {
            return Err(Error::SdlParse {
                message: "the schema could not be built".to_string(),
                count: 1,
            });
        };
        tracing::info!(
            types = schema.types.len(),
            objects = schema.sorted_of_kind(TypeKind::Object).len(),
            interfaces = schema.sorted_of_kind(TypeKind::Interface).len(),
            unions = schema.sorted_of_kind(TypeKind::Union).len(),
            "built schema"
        );

        let plan = Plan::new(&schema, &self.options)?;
        let files = GeneratedFiles {
            types: types_emitter::emit(&plan)?,
            schema: schema_emitter::emit(&plan)?,
            sdl: sdl_emitter::emit(sources.text()),
        };
        tracing::debug!(
            types = files.types.len(),
            schema = files.schema.len(),
            sdl = files.sdl.len(),
            "emitted files"
        );
        Ok(files)
    }
}

/// Generates files for a single SDL document with default options.
pub fn generate_from_str(sdl: &str) -> Result<GeneratedFiles> {
    let mut sources = SourceMap::new();
    sources.push("schema.graphql", sdl);
    Generator::default().generate_source(&sources)
}
