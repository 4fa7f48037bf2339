//! Generates bindings for `schema/scenarios.graphql` into `OUT_DIR/graphql`.

use gqlgen_codegen::{Generator, GeneratorOptions};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    let schema = Path::new("schema/scenarios.graphql");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", schema.display());

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap()).join("graphql");
    let generator = Generator::new(GeneratorOptions {
        context_type: "crate::Context".to_string(),
        scalars_module: "crate::scalars".to_string(),
        ..GeneratorOptions::default()
    })
    .unwrap();
    if let Err(error) = generator.generate(&[schema], &out_dir) {
        panic!("error[{}]: {error}", error.kind());
    }
}
