//! `slots` CLI — find and book common meeting slots against a JSON calendar file.
//!
//! ## Usage
//!
//! ```sh
//! # Write the demo users and calendar (five users, 2025-08-09 IST)
//! slots seed
//! slots users
//!
//! # Schedule from a request file (or stdin)
//! slots schedule -i request.json
//! echo '{"userIDs":["user1","user2"],"durationMinutes":60,
//!        "timeRange":{"start":"2025-08-09T09:00:00+05:30","end":"2025-08-09T17:00:00+05:30"}}' \
//!   | slots schedule
//!
//! # List a calendar, optionally within a window
//! slots calendar user1 --start 2025-08-09T00:00:00+05:30 --end 2025-08-10T00:00:00+05:30
//!
//! # Use another data file, with debug logs on stderr
//! slots --data-file team.json --log-level debug schedule -i request.json
//! ```
//!
//! Successful responses and error envelopes are printed to stdout as JSON.
//! Exit code 3 means no common slot was found; 1 means any other failure.

mod config;
mod seed;
mod storage;

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::{
    query_calendar, ErrorEnvelope, ScheduleRequest, Scheduler, SchedulerError, SystemClock,
};
use tracing::info;

use crate::config::{Config, GlobalOpts};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Find and book a common free slot across participants' calendars"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Book a meeting from a JSON schedule request
    Schedule {
        /// Request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List a participant's calendar
    Calendar {
        /// Participant id
        user: String,
        /// Window start (RFC 3339 with offset)
        #[arg(long)]
        start: Option<String>,
        /// Window end (RFC 3339 with offset)
        #[arg(long)]
        end: Option<String>,
    },
    /// List the user directory
    Users,
    /// Write the demo users and calendar into the data file
    Seed,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_opts(&cli.global)?;
    config.init_logging();

    match cli.command {
        Commands::Schedule { input } => {
            let body = read_input(input.as_deref())?;
            let data = storage::load(&config.data_file)?;
            let scheduler = Scheduler::new(data.store, SystemClock);

            let outcome = ScheduleRequest::from_json(&body).and_then(|req| scheduler.schedule(&req));
            match outcome {
                Ok(response) => {
                    storage::save(&config.data_file, scheduler.store(), &data.users)?;
                    info!(meeting_id = %response.meeting_id, "saved {}", config.data_file.display());
                    print_json(&response)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => respond_error(&err),
            }
        }
        Commands::Calendar { user, start, end } => {
            let data = storage::load(&config.data_file)?;
            match query_calendar(&data.store, &user, start.as_deref(), end.as_deref()) {
                Ok(events) => {
                    print_json(&events)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => respond_error(&err),
            }
        }
        Commands::Users => {
            let data = storage::load(&config.data_file)?;
            print_json(&data.users)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Seed => {
            let mut data = storage::load(&config.data_file)?;
            let events = seed::seed_events(&data.store).context("Failed to seed demo calendar")?;
            let users = seed::seed_users(&mut data.users);
            storage::save(&config.data_file, &data.store, &data.users)?;
            println!(
                "Seeded {} demo events and {} users into {}",
                events,
                users,
                config.data_file.display()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print the error envelope and pick the exit code.
fn respond_error(err: &SchedulerError) -> Result<ExitCode> {
    tracing::warn!("{err}");
    print_json(&ErrorEnvelope::from(err))?;
    Ok(if err.is_conflict() {
        ExitCode::from(3)
    } else {
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{}", json);
    Ok(())
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
