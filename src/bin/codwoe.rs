use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use codwoe::cli::Cli;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "codwoe=info";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // -v / -q take precedence over RUST_LOG; otherwise RUST_LOG, then the default
    let filter = match cli.log_directive() {
        Some(directive) => EnvFilter::from_default_env().add_directive(directive.parse()?),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    cli.run()
}
