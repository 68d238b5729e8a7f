//! `appo` CLI: extract appointment availability from a calendar export.
//!
//! ## Usage
//!
//! ```sh
//! # Report for one week from a Google Calendar events export
//! appo extract --from 2025-06-09 --to 2025-06-15 -i events.json
//!
//! # Read events from stdin, print the full JSON response
//! cat events.json | appo extract --from 2025-06-09 --to 2025-06-15 --json
//!
//! # Use custom markers and holidays
//! appo --config appo.toml extract --from 2025-06-09 --to 2025-06-15 -i events.json
//!
//! # Subtract blocked intervals from an available one
//! appo subtract --available 2025-06-10T09:00:00+09:00/2025-06-10T18:00:00+09:00 \
//!               --blocked 2025-06-10T12:00:00+09:00/2025-06-10T13:00:00+09:00
//!
//! # Show the effective configuration
//! appo config
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use appo_engine::{
    handle_extract, subtract_slots, CalendarEvent, CallerSession, ExtractRequest,
    ExtractResponse, ExtractorConfig, TimeSlot,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Token used for the local session when none is supplied.
const LOCAL_SESSION_TOKEN: &str = "local";

#[derive(Parser)]
#[command(
    name = "appo",
    version,
    about = "Extract appointment availability from calendar events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults apply to anything it omits)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the availability report for a date range
    Extract {
        /// First date of the range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last date of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print the full JSON response instead of the report
        #[arg(long)]
        json: bool,
        /// Access token for the caller session
        #[arg(long, env = "APPO_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Subtract blocked intervals from available ones
    Subtract {
        /// Available interval as START/END (RFC 3339); repeatable
        #[arg(long = "available", required = true)]
        available: Vec<String>,
        /// Blocked interval as START/END (RFC 3339); repeatable
        #[arg(long = "blocked")]
        blocked: Vec<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ExtractorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ExtractorConfig::default(),
    };

    match cli.command {
        Commands::Extract {
            from,
            to,
            input,
            output,
            json,
            token,
        } => {
            let raw = read_input(input.as_deref())?;
            let events = parse_events(&raw)?;
            tracing::debug!(events = events.len(), "loaded events");

            let session =
                CallerSession::new(token.unwrap_or_else(|| LOCAL_SESSION_TOKEN.to_string()));
            let request = ExtractRequest {
                start_date: from,
                end_date: to,
            };
            let (status, response) = handle_extract(Some(&session), &request, &events, &config);

            if json {
                let body = serde_json::to_string_pretty(&response)?;
                write_output(output.as_deref(), &format!("{}\n", body))?;
            }
            match response {
                ExtractResponse::Success { formatted, .. } => {
                    if !json {
                        let report = if formatted.is_empty() {
                            formatted
                        } else {
                            format!("{}\n", formatted)
                        };
                        write_output(output.as_deref(), &report)?;
                    }
                }
                ExtractResponse::Failure { error } => {
                    eprintln!("Error ({}): {}", status.code(), error);
                    process::exit(1);
                }
            }
        }
        Commands::Subtract { available, blocked } => {
            let available = parse_slots(&available)?;
            let blocked = parse_slots(&blocked)?;
            for slot in subtract_slots(&available, &blocked) {
                println!("{}/{}", slot.start.to_rfc3339(), slot.end.to_rfc3339());
            }
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Accept a Google Calendar events-list response (`{"items": [...]}`) or a
/// bare array of events.
fn parse_events(raw: &str) -> Result<Vec<CalendarEvent>> {
    let value: Value = serde_json::from_str(raw).context("Events input is not valid JSON")?;
    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("items") {
            Some(items @ Value::Array(_)) => items,
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(_) => bail!("'items' must be an array of events"),
        },
        _ => bail!("Expected an array of events or an object with 'items'"),
    };
    serde_json::from_value(items).context("Failed to read calendar events")
}

/// Parse `START/END` RFC 3339 pairs.
fn parse_slots(raw: &[String]) -> Result<Vec<TimeSlot>> {
    raw.iter()
        .map(|pair| {
            let (start, end) = pair
                .split_once('/')
                .with_context(|| format!("Interval '{}' must be START/END", pair))?;
            let start = parse_instant(start)?;
            let end = parse_instant(end)?;
            if start >= end {
                bail!("Interval '{}' must end after it starts", pair);
            }
            Ok(TimeSlot::new(start, end))
        })
        .collect()
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 datetime: {}", raw))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
