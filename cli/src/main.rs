//! Citizens' Initiative signature ledger: command-line front end
//!
//! Signs, verifies and exports a tamper-evident signature ledger stored in a
//! JSON file.
//!
//! Usage:
//!   petition sign --first-name Ana --last-name Silva --country PT --id-number 12345678 --consent
//!   petition verify
//!   petition stats
//!   petition export --output export.json

mod config;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use petition_contracts::error::{PetitionError, PetitionResult};
use petition_ledger::{JsonFileStore, SignatureLedger};
use petition_registry::{CountryRegistry, FormIntake, SignatureForm};

use crate::config::CliConfig;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Tamper-evident signature ledger for a European Citizens' Initiative.
#[derive(Parser)]
#[command(
    name = "petition",
    about = "Tamper-evident citizens' initiative signature ledger",
    long_about = "Records initiative signatures in an append-only SHA-256 hash chain,\n\
                  verifies chain integrity and exports a privacy-preserving snapshot."
)]
struct Cli {
    /// Configuration file (defaults to ./petition.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ledger file, overriding the configured path.
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a signature and append it to the ledger.
    Sign {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// ISO-3166 alpha-2 country code.
        #[arg(long)]
        country: String,
        #[arg(long)]
        id_number: String,
        /// Confirm EU citizenship and consent to data processing.
        #[arg(long)]
        consent: bool,
    },
    /// Verify every hash and chain link; exits 1 when issues are found or
    /// the ledger file could not be loaded.
    Verify,
    /// Print the Merkle root, optionally checking it against an expected value.
    Root {
        #[arg(long)]
        expect: Option<String>,
    },
    /// Show progress toward the goal and the per-country breakdown.
    Stats,
    /// Write the privacy-preserving verification export as JSON.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List the countries that may sign and their ID formats.
    Countries,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("petition: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize structured logging.  RUST_LOG overrides the configured filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(cli, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("petition: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Command dispatch ──────────────────────────────────────────────────────────

/// Run one command. `Ok(false)` means the command ran but its check failed.
fn run(cli: Cli, config: CliConfig) -> PetitionResult<bool> {
    let registry = match &config.registry.path {
        Some(path) => CountryRegistry::from_file(path)?,
        None => CountryRegistry::eu_default()?,
    };

    let ledger_path = cli.ledger.unwrap_or(config.ledger.path);
    let open_ledger = || -> PetitionResult<SignatureLedger> {
        let ledger = SignatureLedger::open(Box::new(JsonFileStore::new(&ledger_path)))?;
        if let Some(reason) = ledger.load_error() {
            eprintln!(
                "petition: ledger '{}' could not be loaded and was opened empty: {}",
                ledger_path.display(),
                reason
            );
        }
        Ok(ledger)
    };

    match cli.command {
        Command::Sign {
            first_name,
            last_name,
            country,
            id_number,
            consent,
        } => {
            let form = SignatureForm {
                first_name,
                last_name,
                country,
                id_number,
                consent,
            };
            let ledger = open_ledger()?;
            let entry = FormIntake::new(registry).submit(&ledger, &form)?;
            println!("Signature Recorded! #{} ({})", entry.sequence, entry.id);
            println!("hash: {}", entry.hash);
            Ok(true)
        }

        Command::Verify => {
            let ledger = open_ledger()?;
            let report = ledger.verify_integrity()?;
            print!("{}", render::integrity(&report, ledger.load_error()));
            Ok(report.valid && ledger.load_error().is_none())
        }

        Command::Root { expect } => {
            let root = open_ledger()?.merkle_root()?;
            println!("{}", root.as_deref().unwrap_or("No signatures yet"));
            match expect {
                Some(expected) => {
                    let matches = root.as_deref() == Some(expected.as_str());
                    println!("{}", if matches { "root matches" } else { "root does NOT match" });
                    Ok(matches)
                }
                None => Ok(true),
            }
        }

        Command::Stats => {
            let ledger = open_ledger()?;
            let stats = ledger.stats(config.display.goal, config.display.top)?;
            let report = ledger.verify_integrity()?;
            print!("{}", render::stats(&stats, &registry, &report));
            Ok(true)
        }

        Command::Export { output } => {
            let export = open_ledger()?.export_for_verification()?;
            let json = serde_json::to_string_pretty(&export)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json).map_err(|e| PetitionError::Persistence {
                        reason: format!("failed to write export '{}': {}", path.display(), e),
                    })?;
                    info!(path = %path.display(), signatures = export.total_signatures, "export written");
                    println!("Exported {} signatures to {}", export.total_signatures, path.display());
                }
                None => println!("{}", json),
            }
            Ok(true)
        }

        Command::Countries => {
            print!("{}", render::countries(&registry));
            Ok(true)
        }
    }
}
