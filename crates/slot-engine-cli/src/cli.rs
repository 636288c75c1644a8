use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info};

use slot_engine::{
    find_conflicts, parse_date, reservations_from_json, resolve, resolve_start, Reservation,
    SearchHorizon, SlotRequest,
};

#[derive(Debug, Parser)]
#[command(name = "slots", version, about = "Resolve booking slots against existing reservations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Propose the earliest free date range for a resource
    Resolve(ResolveArgs),
    /// Report overlapping reservations in a file
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Reservations JSON array (file path, or - for stdin). Empty calendar if omitted
    pub input: Option<PathBuf>,

    /// Length of the stay in days (values below 1 count as 1)
    #[arg(short, long, allow_negative_numbers = true)]
    pub duration: i64,

    /// Earliest start: today, tomorrow, +Nd, +Nw, or YYYY-MM-DD
    #[arg(short, long, default_value = "today")]
    pub from: String,

    /// IANA timezone used to decide what "today" is
    #[arg(long, env = "SLOTS_TIMEZONE", default_value = "UTC")]
    pub tz: String,

    /// Only consider reservations for this resource
    #[arg(short, long)]
    pub resource: Option<String>,

    /// Give up after this many conflict-driven advancements
    #[arg(long, env = "SLOTS_MAX_ADVANCES")]
    pub max_advances: Option<usize>,

    /// Give up if no slot can start on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub latest_start: Option<String>,

    /// Override the current instant (RFC 3339), for reproducible runs
    #[arg(long, env = "SLOTS_NOW", hide = true)]
    pub now: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Reservations JSON array (file path, or - for stdin)
    #[arg(default_value = "-")]
    pub input: PathBuf,
}

pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_resolve(args: ResolveArgs) -> Result<ExitCode> {
    let anchor = match &args.now {
        Some(now) => DateTime::parse_from_rfc3339(now)
            .with_context(|| format!("invalid --now '{now}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let earliest = resolve_start(&args.from, anchor, &args.tz)?;

    let mut horizon = SearchHorizon::default();
    if let Some(steps) = args.max_advances {
        horizon = horizon.with_max_advances(steps);
    }
    if let Some(latest) = &args.latest_start {
        horizon = horizon.with_latest_start(parse_date(latest)?);
    }

    let mut existing = match &args.input {
        Some(path) => read_reservations(path)?,
        None => Vec::new(),
    };
    if let Some(resource) = &args.resource {
        existing.retain(|r| r.resource_id.as_str() == resource);
    }
    debug!(
        reservations = existing.len(),
        %earliest,
        duration = args.duration,
        "resolving"
    );

    let request = SlotRequest::new(args.duration, earliest, existing).with_horizon(horizon);
    let result = resolve(&request);
    info!(found = result.is_found(), "resolved");

    println!("{}", serde_json::to_string(&result)?);
    Ok(ExitCode::SUCCESS)
}

fn run_check(args: CheckArgs) -> Result<ExitCode> {
    let reservations = read_reservations(&args.input)?;
    let conflicts = find_conflicts(&reservations);
    info!(
        reservations = reservations.len(),
        conflicts = conflicts.len(),
        "checked"
    );

    let report = serde_json::json!({
        "reservations": reservations.len(),
        "conflicts": conflicts,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if conflicts.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn read_reservations(path: &Path) -> Result<Vec<Reservation>> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read reservations from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    reservations_from_json(&raw)
        .with_context(|| format!("invalid reservations JSON in {}", path.display()))
}
