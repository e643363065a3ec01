//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use openapi_bundle_core::bundler::{
    BundleOptions, BundleResult, CategoryLoad, ProgressReporter, bundle,
};
use openapi_bundle_shared::{
    BundleConfig, Category, DuplicatePolicy, Layout, OutputArtifact, init_config, load_config,
    load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// openapi-bundle — merge OpenAPI fragments into one document.
#[derive(Parser)]
#[command(
    name = "openapi-bundle",
    version,
    about = "Merge a base OpenAPI document and its fragment directories into openapi.json and openapi.yaml.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Project root the layout is resolved against.
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Config file (defaults to <root>/openapi-bundle.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Fail when two fragment files define the same key.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `bundle`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Bundle the fragments into openapi.json and openapi.yaml.
    Bundle,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write openapi-bundle.toml with defaults into the project root.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr; stdout carries the progress lines and summary.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = default_filter(cli.verbose);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Filter directive used when `RUST_LOG` is not set.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "openapi_bundle=info",
        1 => "openapi_bundle=debug",
        _ => "openapi_bundle=trace",
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None | Some(Command::Bundle) => {
            cmd_bundle(&cli.root, cli.config.as_deref(), cli.strict)
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(&cli.root),
            ConfigAction::Show => cmd_config_show(&cli.root, cli.config.as_deref(), cli.strict),
        },
    }
}

/// Load the config file, then apply flag overrides.
fn resolve_config(root: &Path, config: Option<&Path>, strict: bool) -> Result<BundleConfig> {
    let mut resolved = match config {
        Some(path) => load_config_from(path)?,
        None => load_config(root)?,
    };
    if strict {
        resolved.merge.on_duplicate = DuplicatePolicy::Error;
    }
    Ok(resolved)
}

fn cmd_bundle(root: &Path, config: Option<&Path>, strict: bool) -> Result<()> {
    let config = resolve_config(root, config, strict)?;
    let layout = config.layout.resolve(root);
    let options = BundleOptions {
        on_duplicate: config.merge.on_duplicate,
    };

    info!(
        root = %root.display(),
        on_duplicate = ?options.on_duplicate,
        "bundling OpenAPI document"
    );

    println!("Bundling OpenAPI specification...");
    println!();

    bundle(&layout, &options, &CliProgress)
        .wrap_err_with(|| format!("bundling {} failed", layout.base_file.display()))?;

    Ok(())
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path, config: Option<&Path>, strict: bool) -> Result<()> {
    let config = resolve_config(root, config, strict)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Prints one line per pipeline step and the final summary to stdout.
struct CliProgress;

impl ProgressReporter for CliProgress {
    fn base_loaded(&self, layout: &Layout) {
        let name = layout
            .base_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| layout.base_file.display().to_string());
        println!("  Loaded {name}");
    }

    fn category_loaded(&self, load: &CategoryLoad) {
        match load.category {
            Category::SecuritySchemes => println!("  Loaded security schemes"),
            category => println!(
                "  Loaded {} {} definitions",
                load.entries,
                category.noun()
            ),
        }
    }

    fn output_written(&self, artifact: &OutputArtifact) {
        println!(
            "  Written {} ({} bytes, sha256 {})",
            artifact.path.display(),
            artifact.size_bytes,
            &artifact.sha256[..12]
        );
    }

    fn done(&self, result: &BundleResult) {
        println!();
        println!("  Summary:");
        for category in Category::ALL {
            println!(
                "    {:<17} {}",
                format!("{}:", category.label()),
                result.counts.get(category)
            );
        }

        if !result.collisions.is_empty() {
            println!();
            println!("  Duplicate keys ({}):", result.collisions.len());
            for collision in &result.collisions {
                println!("    {collision}");
            }
        }

        println!();
        println!("  OpenAPI bundling complete!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_bundle() {
        let cli = Cli::try_parse_from(["openapi-bundle"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.strict);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["openapi-bundle", "bundle", "--strict", "--root", "api", "-vv"])
                .unwrap();
        assert!(matches!(cli.command, Some(Command::Bundle)));
        assert!(cli.strict);
        assert_eq!(cli.root, PathBuf::from("api"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn verbosity_maps_to_filter() {
        assert_eq!(default_filter(0), "openapi_bundle=info");
        assert_eq!(default_filter(1), "openapi_bundle=debug");
        assert_eq!(default_filter(2), "openapi_bundle=trace");
        assert_eq!(default_filter(5), "openapi_bundle=trace");
    }

    #[test]
    fn strict_overrides_config_policy() {
        let root = std::env::temp_dir().join("openapi-bundle-cli-test-no-config");
        let config = resolve_config(&root, None, true).unwrap();
        assert_eq!(config.merge.on_duplicate, DuplicatePolicy::Error);

        let config = resolve_config(&root, None, false).unwrap();
        assert_eq!(config.merge.on_duplicate, DuplicatePolicy::Warn);
    }
}
