//! Krystara CLI
//!
//! Builds a snapshot from an index config and answers one query, printing
//! JSON to stdout. Logs go to stderr and are filtered with `RUST_LOG`.

use clap::{Parser, Subcommand};
use krystara_core::chrono::{DateTime, Utc};
use krystara_core::{EntityId, Record, SpoilerKind, SystemTime};
use krystara_hub::{IndexConfig, Snapshot};
use krystara_query::{SearchKind, SearchOptions};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Search the Krystara index and decode team codes
#[derive(Parser, Debug)]
#[command(name = "krystara", version)]
struct Cli {
    /// Index config (RON); defaults apply when omitted
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Output locale
    #[arg(long, short = 'l', global = true, default_value = "en")]
    lang: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search one kind of entity by name, id or lookup keys
    Search {
        /// troop, weapon, kingdom, class, pet, trait or talent-tree
        kind: SearchKind,
        query: String,
        /// Include unreleased entities, warband copies and skins
        #[arg(long)]
        all: bool,
    },
    /// Decode a comma-separated team code
    Team { code: String },
    /// List releases that are still to come
    Spoilers,
}

#[derive(Serialize)]
struct SpoilerLine {
    kind: SpoilerKind,
    id: EntityId,
    date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<Record>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => IndexConfig::load(path)?,
        None => IndexConfig::default(),
    };
    let snapshot = Snapshot::build(&config)?;
    let locale = cli.lang.as_str();

    let output = match &cli.command {
        Command::Search { kind, query, all } => {
            let options = if *all {
                SearchOptions::default()
            } else {
                SearchOptions::public()
            };
            serde_json::to_string_pretty(&snapshot.search(*kind, query, locale, &options))?
        }
        Command::Team { code } => serde_json::to_string_pretty(&snapshot.decode_team(code, locale)?)?,
        Command::Spoilers => {
            let lines: Vec<SpoilerLine> = snapshot
                .upcoming_spoilers(&SystemTime)
                .iter()
                .map(|spoiler| SpoilerLine {
                    kind: spoiler.kind,
                    id: spoiler.id,
                    date: spoiler.date,
                    entity: snapshot.spoiler_record(spoiler, locale),
                })
                .collect();
            serde_json::to_string_pretty(&lines)?
        }
    };
    println!("{}", output);
    Ok(())
}
