//! openapi-bundle CLI — merges OpenAPI fragment files into one document.
//!
//! Reads `openapi/base.yaml` plus the path, schema, parameter, response,
//! example, and security-scheme fragments next to it, and writes the
//! composite document as `openapi.json` and `openapi.yaml`.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
