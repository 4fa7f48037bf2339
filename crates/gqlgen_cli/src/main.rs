//! Main entry point for the gqlgen CLI.

use clap::Parser;
use gqlgen_cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "gqlgen=info" } else { "gqlgen=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("GQLGEN_LOG").unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    std::process::exit(gqlgen_cli::run(&cli));
}
