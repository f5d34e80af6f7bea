//! `roster` CLI -- pre-flight conflict checks, recurrence previews, and
//! occurrence generation over JSON roster files.
//!
//! ## Usage
//!
//! ```sh
//! # Pre-flight check a candidate slot (exit code 1 when conflicts exist)
//! roster check -i roster.json --teacher 2fdc... --day monday --start 09:00 --end 10:30 --room 101
//!
//! # Preview the candidate dates a template would produce
//! roster expand -i roster.json --template 91b0... --from 2024-01-01 --to 2024-03-31
//!
//! # Create the missing occurrences, keeping state between runs
//! roster generate -i roster.json --template 91b0... --from 2024-01-01 --to 2024-03-31 \
//!     --occurrences occurrences.json
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use roster_engine::{
    expand, generate, CandidateSlot, DayOfWeek, MemoryOccurrenceStore, ScheduleTemplate,
    SchedulingPolicy, SessionOccurrence, TemplateStore, TimeOfDay, TimeWindow,
};

#[derive(Parser)]
#[command(name = "roster", version, about = "Teaching-slot roster administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate slot against the roster without changing anything
    Check {
        /// Roster file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Teacher id of the candidate slot
        #[arg(long)]
        teacher: Uuid,
        /// Day of week (monday .. sunday)
        #[arg(long)]
        day: DayOfWeek,
        /// Start time, HH:MM
        #[arg(long)]
        start: TimeOfDay,
        /// End time, HH:MM
        #[arg(long)]
        end: TimeOfDay,
        /// Room identifier of the candidate slot
        #[arg(long)]
        room: Option<String>,
        /// Template id to exclude (when re-checking a slot being edited)
        #[arg(long)]
        exclude: Option<Uuid>,
    },
    /// Print the candidate occurrence dates for a template over a range
    Expand {
        /// Roster file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Template id to expand
        #[arg(long)]
        template: Uuid,
        /// Range start, YYYY-MM-DD (inclusive)
        #[arg(long)]
        from: NaiveDate,
        /// Range end, YYYY-MM-DD (inclusive)
        #[arg(long)]
        to: NaiveDate,
    },
    /// Create the missing occurrences for a template over a range
    Generate {
        /// Roster file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Template id to generate from
        #[arg(long)]
        template: Uuid,
        /// Range start, YYYY-MM-DD (inclusive)
        #[arg(long)]
        from: NaiveDate,
        /// Range end, YYYY-MM-DD (inclusive)
        #[arg(long)]
        to: NaiveDate,
        /// Occurrence state file, read before and rewritten after the run.
        /// Without it the run is a dry exercise against an empty store.
        #[arg(short, long)]
        occurrences: Option<PathBuf>,
    },
}

/// The JSON document the CLI operates on.
#[derive(Debug, Serialize, Deserialize)]
struct RosterFile {
    #[serde(default)]
    policy: SchedulingPolicy,
    #[serde(default)]
    templates: Vec<ScheduleTemplate>,
}

fn main() -> Result<()> {
    // Log to stderr so JSON output on stdout stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            teacher,
            day,
            start,
            end,
            room,
            exclude,
        } => {
            let store = read_roster(input.as_deref())?;
            let candidate = CandidateSlot {
                teacher_id: teacher,
                room,
                window: TimeWindow::new(day, start, end),
            };
            let report = store.check_conflicts(&candidate, exclude);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_empty() {
                process::exit(1);
            }
        }
        Commands::Expand {
            input,
            template,
            from,
            to,
        } => {
            let store = read_roster(input.as_deref())?;
            let record = store.get(template)?;
            let dates = expand(record, from, to)?;
            println!("{}", serde_json::to_string_pretty(&dates)?);
        }
        Commands::Generate {
            input,
            template,
            from,
            to,
            occurrences,
        } => {
            let store = read_roster(input.as_deref())?;
            let mut occurrence_store = read_occurrences(occurrences.as_deref())?;

            let report = generate(&store, &mut occurrence_store, template, from, to)?;

            if let Some(path) = &occurrences {
                let all = occurrence_store.into_occurrences();
                let json = serde_json::to_string_pretty(&all)?;
                fs::write(path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Read the roster document from a file, or stdin when no path is given.
fn read_roster(input: Option<&Path>) -> Result<TemplateStore> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read roster from stdin")?;
            buf
        }
    };
    let file: RosterFile =
        serde_json::from_str(&text).context("Failed to parse the roster file")?;
    let store = TemplateStore::load(file.policy, file.templates)
        .context("Roster file contains invalid templates")?;
    Ok(store)
}

/// Read the occurrence state file. A missing path or missing file means an
/// empty store, so the first `generate` run needs no setup.
fn read_occurrences(path: Option<&Path>) -> Result<MemoryOccurrenceStore> {
    let Some(path) = path else {
        return Ok(MemoryOccurrenceStore::new());
    };
    if !path.exists() {
        return Ok(MemoryOccurrenceStore::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let occurrences: Vec<SessionOccurrence> =
        serde_json::from_str(&text).context("Failed to parse the occurrences file")?;
    let store = MemoryOccurrenceStore::load(occurrences)
        .context("Occurrences file violates the one-per-date invariant")?;
    Ok(store)
}
