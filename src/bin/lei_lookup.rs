//! LEI Lookup Command Line Interface
//!
//! Finds and verifies Legal Entity Identifiers from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search GLEIF and verify against the company website
//! lei_lookup search --company "Apple Inc" --website apple.com
//!
//! # Same, as JSON, without the cost estimate
//! lei_lookup search -c Google -w google.com --no-cost -o json
//!
//! # Fetch a single LEI record
//! lei_lookup record HWUPKR0MPOU8FGXBT394
//! ```
//!
//! `GEMINI_API_KEY` is read from the environment or a `.env` file.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use lei_verify::config::LookupConfig;
use lei_verify::gleif::GleifClient;
use lei_verify::lookup::{LeiLookup, LookupReport};
use lei_verify::models::CandidateRecord;
use lei_verify::OutcomeClass;

#[derive(Parser)]
#[command(name = "lei_lookup")]
#[command(version)]
#[command(about = "Find and verify Legal Entity Identifiers using GLEIF and grounded AI verification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Log pipeline progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the registry and verify the match against the company website
    Search {
        /// Company name to search for (e.g. "Google")
        #[arg(long, short = 'c')]
        company: String,

        /// Company website or domain (e.g. google.com)
        #[arg(long, short = 'w')]
        website: String,

        /// Restrict the registry search to one country (ISO 3166-1 alpha-2)
        #[arg(long)]
        country: Option<String>,

        /// Include inactive registry entities
        #[arg(long)]
        include_inactive: bool,

        /// Skip the API cost estimate
        #[arg(long)]
        no_cost: bool,

        /// Only call the verifier after the registry returned candidates
        #[arg(long)]
        sequential: bool,
    },
    /// Fetch a single LEI record from GLEIF
    Record {
        /// 20-character LEI
        lei: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "ERROR:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = LookupConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Search {
            company,
            website,
            country,
            include_inactive,
            no_cost,
            sequential,
        } => {
            if let Some(country) = country {
                config.registry.country_filter = Some(country.to_uppercase());
            }
            if include_inactive {
                config.registry.status_filter = None;
            }
            if no_cost {
                config.verifier.track_cost = false;
            }
            if sequential {
                config.concurrent_queries = false;
            }

            let lookup = LeiLookup::from_config(&config).context("Failed to set up lookup")?;
            let report = lookup.report(&company, &website).await;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Pretty => print_report(&report),
            }

            Ok(if report.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Record { lei } => {
            let client = GleifClient::new(config.registry.clone())?;
            let record = client.get_lei_record(&lei).await?;

            match (cli.format, record) {
                (OutputFormat::Json, record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?)
                }
                (OutputFormat::Pretty, Some(record)) => print_record(&record),
                (OutputFormat::Pretty, None) => {
                    println!("{} No LEI record found for {}", "INFO:".cyan().bold(), lei)
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_report(report: &LookupReport) {
    match report.class {
        OutcomeClass::Success => println!("{}", "LEI found and verified".green().bold()),
        OutcomeClass::Informational => {
            println!("{} {}", "INFO:".cyan().bold(), report.message);
            return;
        }
        OutcomeClass::Error => {
            println!("{} {}", "ERROR:".red().bold(), report.message);
            return;
        }
    }

    let Some(entity) = &report.entity else {
        return;
    };

    println!("\n{} {}", "LEI:".cyan().bold(), entity.lei.bold());
    println!("{} {}", "Legal name:".cyan(), entity.legal_name);
    if !entity.address.is_empty() {
        println!("{} {}", "Legal address:".cyan(), entity.address);
    }

    if !entity.sources.is_empty() {
        println!("\n{}", "Verification sources:".cyan());
        for (idx, source) in entity.sources.iter().enumerate() {
            println!("  {}. {} ({})", idx + 1, source.title, source.uri.dimmed());
        }
    }

    if let Some(cost) = entity.estimated_cost {
        println!(
            "\n{} ${:.6} USD (approximate)",
            "Estimated API cost:".cyan(),
            cost
        );
    }
}

fn print_record(record: &CandidateRecord) {
    println!("{} {}", "LEI:".cyan().bold(), record.lei.bold());
    println!("{} {}", "Legal name:".cyan(), record.legal_name);
    if let Some(status) = &record.status {
        println!("{} {}", "Status:".cyan(), status);
    }
    if let Some(jurisdiction) = &record.jurisdiction {
        println!("{} {}", "Jurisdiction:".cyan(), jurisdiction);
    }
    let address = lei_verify::lookup::format::assemble_address(&record.address);
    if !address.is_empty() {
        println!("{} {}", "Legal address:".cyan(), address);
    }
}
