//! `slotmatch` CLI — find common interview slots and send confirmations.
//!
//! ## Usage
//!
//! ```sh
//! # Match two files, one slot per line
//! slotmatch match -c candidate.txt -i interviewer.txt
//!
//! # Read the interviewer's slots from stdin, assume Berlin time
//! cat interviewer.txt | slotmatch --zone Europe/Berlin match -c candidate.txt
//!
//! # Machine-readable outcome
//! slotmatch match -c candidate.txt -i interviewer.txt --json
//!
//! # Check how a slot string will be read
//! slotmatch parse "04/22/2025 2:00 PM"
//!
//! # Confirm a slot exactly as `match` printed it
//! slotmatch confirm --slot "2025-04-22 14:00 UTC" --email ada@example.com
//! ```
//!
//! Defaults come from `SLOTMATCH_DEFAULT_ZONE`, `SLOTMATCH_DST_POLICY` and
//! `SLOTMATCH_SENDER` (a `.env` file is honoured); flags override them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_engine::config::parse_zone;
use slot_engine::{
    split_lines, LogNotifier, MatchOutcome, Notifier, SchedulerConfig, Side, SlotMatcher, SlotSet,
};
use std::io::{self, Read};
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slotmatch",
    version,
    about = "Match candidate and interviewer availability slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Timezone for slots written without one (IANA name, e.g. Europe/Berlin)
    #[arg(long, global = true)]
    zone: Option<String>,

    /// How to read local times hit by DST changes: earliest, latest or reject
    #[arg(long, global = true)]
    dst_policy: Option<String>,

    /// Sender identity for confirmations
    #[arg(long, global = true)]
    sender: Option<String>,

    /// Log filter, e.g. "debug" (defaults to RUST_LOG, then "warn")
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the slots present in both lists
    Match {
        /// Candidate slots file ("-" or omitted reads stdin)
        #[arg(short, long)]
        candidate: Option<String>,
        /// Interviewer slots file ("-" or omitted reads stdin)
        #[arg(short, long)]
        interviewer: Option<String>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a single slot string is read
    Parse {
        slot: String,
        /// Print the slot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a confirmation for a chosen slot
    Confirm {
        /// The slot, as printed by `match`
        #[arg(short, long)]
        slot: String,
        /// Recipient address
        #[arg(short, long)]
        email: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = build_config(&cli)?;
    let matcher = SlotMatcher::new(&config);

    match cli.command {
        Commands::Match {
            candidate,
            interviewer,
            json,
        } => {
            let (candidate_text, interviewer_text) =
                read_sides(candidate.as_deref(), interviewer.as_deref())?;
            let candidate_set = matcher.slot_set(split_lines(&candidate_text));
            let interviewer_set = matcher.slot_set(split_lines(&interviewer_text));
            report_rejected(Side::Candidate, &candidate_set);
            report_rejected(Side::Interviewer, &interviewer_set);

            let outcome = matcher.match_sets(&candidate_set, &interviewer_set);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            if !outcome.is_match() {
                process::exit(1);
            }
        }
        Commands::Parse { slot, json } => {
            let parsed =
                slot_engine::parse_slot(&slot, &config.default_zone, config.dst_policy)
                    .with_context(|| format!("Invalid time slot format: '{}'", slot))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("{}", parsed);
                println!("UTC: {}", parsed.utc().to_rfc3339());
            }
        }
        Commands::Confirm { slot, email } => {
            let email = email.trim();
            if email.is_empty() {
                anyhow::bail!("Please provide an email address.");
            }
            let Some(parsed) = matcher.parse_slot(&slot) else {
                anyhow::bail!("Invalid time slot format: '{}'", slot);
            };

            let notifier = LogNotifier::new(&config);
            if notifier.notify(email, &parsed) {
                println!("Confirmation sent successfully to {} for {}", email, parsed);
            } else {
                anyhow::bail!(
                    "Failed to send confirmation email. Please check your notifier configuration."
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Environment first, then command-line overrides.
fn build_config(cli: &Cli) -> Result<SchedulerConfig> {
    let mut config =
        SchedulerConfig::from_env().context("Invalid SLOTMATCH_* environment configuration")?;
    if let Some(zone) = cli.zone.as_deref() {
        config.default_zone = parse_zone(zone)?;
    }
    if let Some(policy) = cli.dst_policy.as_deref() {
        config.dst_policy = policy.parse()?;
    }
    if let Some(sender) = cli.sender.as_deref() {
        config.sender = sender.trim().to_string();
    }
    Ok(config)
}

fn print_outcome(outcome: &MatchOutcome) {
    match outcome {
        MatchOutcome::Matched(slots) => {
            println!("Found {} common time slot(s):", slots.len());
            for slot in slots {
                println!("  {}", slot);
            }
        }
        MatchOutcome::NoInput(side) => {
            println!("Please provide at least one time slot for the {}.", side);
        }
        MatchOutcome::NoValidSlots(side) => {
            println!("None of the {} time slots could be read.", side);
        }
        MatchOutcome::NoOverlap => println!("No common time slots found."),
    }
}

fn report_rejected(side: Side, set: &SlotSet) {
    for line in set.rejected() {
        warn!(%side, line = %line, "skipping unreadable time slot");
    }
}

fn is_stdin(path: Option<&str>) -> bool {
    matches!(path, None | Some("-"))
}

fn read_sides(candidate: Option<&str>, interviewer: Option<&str>) -> Result<(String, String)> {
    if is_stdin(candidate) && is_stdin(interviewer) {
        anyhow::bail!("At most one of --candidate / --interviewer can be read from stdin");
    }
    Ok((read_input(candidate)?, read_input(interviewer)?))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
