//! resq: compile RESQ IR query layers into search engine requests
//!
//! Reads a query layer as JSON and prints the request that would be sent
//! to the engine. Nothing is sent.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resq_ir::elastic::QueryTranslator;
use resq_ir::QueryLayer;
use tracing::info;

mod config;
mod logging;

use config::Config;

#[derive(Parser)]
#[command(name = "resq", version, about = "Compile resource queries into search engine requests")]
struct Cli {
    #[arg(long, global = true, help = "Config file path (YAML)")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query layer into a search request
    Search {
        #[arg(long, default_value = "-", help = "Query layer JSON file, '-' for stdin")]
        input: String,
        #[arg(long, help = "Target index (defaults to the layer's resource)")]
        index: Option<String>,
    },
    /// Compile a query layer's filter into a count request
    Count {
        #[arg(long, default_value = "-", help = "Query layer JSON file, '-' for stdin")]
        input: String,
        #[arg(long, help = "Target index (defaults to the layer's resource)")]
        index: Option<String>,
    },
    /// Print the cache fingerprint of a query layer
    Fingerprint {
        #[arg(long, default_value = "-", help = "Query layer JSON file, '-' for stdin")]
        input: String,
    },
}

fn read_layer(input: &str) -> Result<QueryLayer> {
    let json = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading query layer from stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(input)).with_context(|| format!("reading query layer from {input}"))?
    };
    parse_layer(&json)
}

fn parse_layer(json: &str) -> Result<QueryLayer> {
    serde_json::from_str(json).context("parsing query layer")
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::from_env()?,
    };
    Ok(config)
}

/// Render the command's output for an already parsed layer
fn render(command: &Commands, layer: &QueryLayer, translator: &QueryTranslator) -> Result<String> {
    match command {
        Commands::Search { index, .. } => {
            let index = index.as_deref().unwrap_or(&layer.resource);
            let request = translator.translate(index, layer)?;
            Ok(format!("POST /{}/_search\n{}", request.index, request.encode()?))
        }
        Commands::Count { index, .. } => {
            let index = index.as_deref().unwrap_or(&layer.resource);
            let request = translator.build_count(index, layer.filter.as_ref())?;
            Ok(format!("POST /{}/_count\n{}", request.index, request.encode()?))
        }
        Commands::Fingerprint { .. } => Ok(layer.fingerprint()?),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging).context("initializing logging")?;

    let input = match &cli.command {
        Commands::Search { input, .. } | Commands::Count { input, .. } | Commands::Fingerprint { input } => input,
    };
    let layer = read_layer(input)?;
    info!(resource = %layer.resource, "query layer loaded");

    let translator = QueryTranslator::with_options(config.compiler);
    println!("{}", render(&cli.command, &layer, &translator)?);

    Ok(())
}
