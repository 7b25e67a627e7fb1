//! Pheasant Network transfer extractor CLI.
//!
//! Queries bridge and swap events over a block range and prints one JSON
//! transfer record per line.
//!
//! # Usage
//!
//! ```bash
//! # Transfers on Arbitrum between two blocks (inclusive)
//! pheasant-events query --chain arbitrum --from 250000000 --to 250001000
//!
//! # Same range on every supported chain, concurrently
//! pheasant-events query --all --from 1000000 --to 1001000
//!
//! # Supported chains and their contract families
//! pheasant-events list
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pheasant::{Composer, TransferRecord};
use pheasant_events::{ChainAdapterMap, chains, config::Config};

/// Pheasant Network transfer extractor.
#[derive(Debug, Parser)]
#[command(name = "pheasant-events", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and normalize transfers over a block range.
    Query {
        /// Configuration file with RPC overrides.
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,

        /// Chain identifier to query (e.g. `arbitrum`).
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        chain: Option<String>,

        /// Query every supported chain.
        #[arg(long)]
        all: bool,

        /// First block (inclusive).
        #[arg(long)]
        from: u64,

        /// Last block (inclusive).
        #[arg(long)]
        to: u64,
    },

    /// List supported chains and their contract families.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Query {
            config,
            chain,
            all: _,
            from,
            to,
        } => cmd_query(config, chain, from, to).await,
        Command::List => {
            cmd_list();
            Ok(())
        }
    }
}

/// Execute the `query` subcommand. `chain` of `None` means every chain.
async fn cmd_query(config: PathBuf, chain: Option<String>, from: u64, to: u64) -> Result<()> {
    let config = Config::load(&config)?;
    let adapters = ChainAdapterMap::connect(&config)?;

    let targets = match chain {
        Some(name) => {
            let query = adapters.get(&name).with_context(|| {
                let known: Vec<_> = adapters.chains().collect();
                format!("unsupported chain {name} (supported: {})", known.join(", "))
            })?;
            vec![query.clone()]
        }
        None => adapters.iter().cloned().collect(),
    };

    tracing::info!(chains = targets.len(), from, to, "starting query");

    let handles: Vec<_> = targets
        .into_iter()
        .map(|query| {
            let chain = query.chain().to_owned();
            (chain, tokio::spawn(async move { query.query(from, to).await }))
        })
        .collect();

    let mut failed = 0u32;
    for (chain, handle) in handles {
        match handle.await.context("query task panicked")? {
            Ok(records) => {
                tracing::info!(chain, records = records.len(), "query complete");
                print_records(&records)?;
            }
            Err(e) => {
                failed += 1;
                tracing::error!(chain, error = %e, "query failed");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} chain(s) failed");
    }
    Ok(())
}

/// Print records as JSON lines.
#[allow(clippy::print_stdout)]
fn print_records(records: &[TransferRecord]) -> Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

/// Execute the `list` subcommand.
#[allow(clippy::print_stdout)]
fn cmd_list() {
    let composer = Composer::pheasant();

    println!("{:<12} {:<10} {:<20} Specs", "Chain", "Chain ID", "Families");
    println!("{}", "-".repeat(54));

    for chain in chains::ALL {
        let families = composer
            .registry()
            .capabilities(chain.name)
            .map(|caps| {
                caps.families()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();
        let specs = composer
            .compose(chain.name)
            .map_or_else(|e| format!("error: {e}"), |s| s.len().to_string());
        println!(
            "{:<12} {:<10} {:<20} {}",
            chain.name, chain.chain_id, families, specs
        );
    }
}
