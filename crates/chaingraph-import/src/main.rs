//! CLI entry point for the chaingraph importer.
//!
//! Logs go to stderr as JSON; reports and stats go to stdout.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use chaingraph_graph::{GraphClient, GraphStore, InMemoryStore};
use chaingraph_import::config::ImportConfig;
use chaingraph_import::pipeline::run_import;
use chaingraph_import::stats::summarize;

#[derive(Parser)]
#[command(name = "chaingraph")]
#[command(about = "Load company, industry and product records into Neo4j")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: chaingraph).
    #[arg(short, long, default_value = "chaingraph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Load every configured source, then print the import report.
    Import {
        /// Delete every node before loading.
        #[arg(long)]
        reset: bool,

        /// Load into an in-memory graph instead of Neo4j.
        #[arg(long)]
        dry_run: bool,

        /// Write the JSON report to this file instead of stdout.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print node and edge counts.
    Stats,
    /// Verify that Neo4j is reachable with the configured credentials.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ImportConfig::load(&cli.config)?;

    match cli.command {
        Command::Import {
            reset,
            dry_run,
            report,
        } => {
            config.reset |= reset;

            let store: Box<dyn GraphStore> = if dry_run {
                tracing::info!("Dry run: loading into an in-memory graph");
                Box::new(InMemoryStore::new())
            } else {
                Box::new(GraphClient::connect(&config.graph_config()).await?)
            };

            let result = run_import(store.as_ref(), &config).await?;
            let json = serde_json::to_string_pretty(&result)?;
            match report {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!(path = %path.display(), "Report written");
                }
                None => println!("{json}"),
            }
        }
        Command::Stats => {
            let graph = GraphClient::connect(&config.graph_config()).await?;
            let stats = summarize(&graph, config.query_mode).await;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Check => {
            let graph = GraphClient::connect(&config.graph_config()).await?;
            let stats = summarize(&graph, config.query_mode).await;
            println!(
                "{}",
                serde_json::json!({
                    "uri": config.uri,
                    "connected": true,
                    "total_nodes": stats.total_nodes,
                    "total_edges": stats.total_edges,
                })
            );
        }
    }

    Ok(())
}
