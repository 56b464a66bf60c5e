use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use version_service::catalog::SharedCatalog;
use version_service::catalog::types::VersionResponse;
use version_service::config::ServiceConfig;
use version_service::service::{ApplyRequest, VersionService};

#[derive(Parser)]
#[command(name = "version-service")]
#[command(version, about = "Resolve the component versions an operator release should deploy")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog source directory, overrides the config file
    #[arg(long, global = true)]
    sources: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one version per component for an apply policy
    Apply {
        #[arg(long)]
        product: String,
        #[arg(long = "operator")]
        operator_version: String,
        #[arg(long, default_value = "latest")]
        policy: String,
        #[arg(long)]
        current_version: Option<String>,
    },
    /// Print the full version matrix of one operator release
    Operator {
        #[arg(long)]
        product: String,
        #[arg(long = "operator")]
        operator_version: String,
    },
    /// Print every release of a product, newest first
    Product {
        #[arg(long)]
        product: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(sources) = cli.sources {
        config.sources_dir = sources;
    }
    let _guard = version_service::logging::init(&config.log);

    let catalog = SharedCatalog::load(&config.sources_dir)
        .with_context(|| format!("failed to load catalog from {:?}", config.sources_dir))?;
    let service = VersionService::new(catalog);

    let response = match cli.command {
        Command::Apply {
            product,
            operator_version,
            policy,
            current_version,
        } => service.apply(&ApplyRequest {
            product,
            operator_version,
            policy,
            current_version,
        }),
        Command::Operator {
            product,
            operator_version,
        } => service.operator(&product, &operator_version),
        Command::Product { product } => service.product(&product),
    };

    print_response(&response?)
}

fn print_response(response: &VersionResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
