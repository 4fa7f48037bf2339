//! Command-line interface for gqlgen.
//!
//! # Usage
//!
//! ```bash
//! # Generate types.rs, schema.rs and sdl.rs from one or more SDL files
//! gqlgen schema.graphql extensions.graphql -o src/graphql/generated
//!
//! # Point the generated code at a different context type
//! gqlgen schema.graphql -o src/generated --context-type crate::AppContext
//! ```
//!
//! Logging is controlled with `GQLGEN_LOG` (an `EnvFilter` directive);
//! `--verbose` raises the default from `gqlgen=warn` to `gqlgen=info`.

use clap::Parser;
use colored::Colorize;
use gqlgen_codegen::{Error, Generator, GeneratorOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gqlgen")]
#[command(author, version, about = "Generate async-graphql resolver bindings from GraphQL SDL", long_about = None)]
pub struct Cli {
    /// SDL documents, read and joined in order
    #[arg(required = true)]
    pub schemas: Vec<PathBuf>,

    /// Directory that receives types.rs, schema.rs and sdl.rs
    #[arg(short, long = "output-directory", value_name = "DIR")]
    pub output_directory: PathBuf,

    /// Log progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Path of the runtime support crate in generated code
    #[arg(long, default_value = "gqlgen_runtime")]
    pub runtime_crate: String,

    /// Path of the resolver context type, as seen from the generated modules
    #[arg(long, default_value = "super::Context")]
    pub context_type: String,

    /// Path of the module holding custom scalar types
    #[arg(long, default_value = "super::scalars")]
    pub scalars_module: String,
}

impl Cli {
    /// Returns the generator options the flags describe.
    #[must_use]
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            runtime_crate: self.runtime_crate.clone(),
            context_type: self.context_type.clone(),
            scalars_module: self.scalars_module.clone(),
        }
    }
}

/// Runs one generation and returns the process exit code.
#[must_use]
pub fn run(cli: &Cli) -> i32 {
    match generate(cli) {
        Ok(written) => {
            for path in written {
                println!("{} {}", "Generated".green(), path.display());
            }
            0
        }
        Err(error) => {
            eprintln!("{}", error_line(&error));
            1
        }
    }
}

fn generate(cli: &Cli) -> Result<Vec<PathBuf>, Error> {
    tracing::info!(
        schemas = cli.schemas.len(),
        output = %cli.output_directory.display(),
        "generating bindings"
    );
    let generator = Generator::new(cli.options())?;
    generator
        .generate(&cli.schemas, &cli.output_directory)
        .map_err(|error| {
            tracing::debug!(kind = error.kind(), "generation failed");
            error
        })
}

/// Renders `error` as the single `error[Kind]: message` line the CLI prints.
#[must_use]
pub fn error_line(error: &Error) -> String {
    let message = error.to_string().replace('\n', " ");
    format!("{}: {message}", format!("error[{}]", error.kind()).red().bold())
}
