// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * PageGuard - Page Security Scanner
 * CLI glue: loads a capture snapshot, runs the engine, emits the report
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use pageguard_scanner::config::EngineConfig;
use pageguard_scanner::errors::EngineError;
use pageguard_scanner::scanners::ScanEngine;
use pageguard_scanner::signatures::SIGNATURES;
use pageguard_scanner::types::PageSnapshot;

/// PageGuard - Page Security Scanner
#[derive(Parser)]
#[command(name = "pageguard")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version = "1.0.0")]
#[command(about = "Scores captured page snapshots: scripts, behavior, domain reputation.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a captured page snapshot
    Scan {
        /// Path to the snapshot JSON file produced by the capture layer
        #[arg(required = true)]
        input: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the report JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List the vulnerable-library signature database
    Signatures,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("pageguard-worker")
        .enable_all()
        .build()?;

    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            input,
            output,
            pretty,
        } => scan(input, output, pretty).await,
        Commands::Signatures => {
            for signature in SIGNATURES.iter() {
                println!(
                    "{:<12} < {:<8} {:<8} {}",
                    signature.library,
                    signature.fixed_in.to_string(),
                    signature.severity.to_string(),
                    signature.identifier.unwrap_or("-"),
                );
            }
            Ok(())
        }
    }
}

async fn scan(input: PathBuf, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read snapshot file: {:?}", input))?;
    let snapshot: PageSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot file: {:?}", input))?;

    let config = EngineConfig::from_env()?;
    let engine = ScanEngine::new(config)?;

    let report = match engine.execute_scan(&snapshot).await {
        Ok(report) => report,
        Err(EngineError::InputInvalid(reason)) => {
            error!("[ERROR] Invalid snapshot: {}", reason);
            anyhow::bail!("invalid snapshot: {}", reason);
        }
        Err(EngineError::ScanFailed(reason)) => {
            // A failed scan is reported as such, never as a zero score.
            error!("[ERROR] Scan could not complete: {}", reason);
            anyhow::bail!("scan could not complete: {}", reason);
        }
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            info!("[SUCCESS] Report written to {:?}", path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
