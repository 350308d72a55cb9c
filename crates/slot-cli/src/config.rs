//! Runtime configuration resolved from flags and environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::Level;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// JSON file holding the calendar store
    #[arg(long, global = true, env = "SLOTS_DATA_FILE", default_value = "calendar.json")]
    pub data_file: PathBuf,

    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long, global = true, env = "SLOTS_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_level: Level,
}

impl Config {
    pub fn from_opts(opts: &GlobalOpts) -> Result<Self> {
        let log_level = opts.log_level.parse::<Level>().with_context(|| {
            format!(
                "Unknown log level: '{}'. Expected error, warn, info, debug or trace",
                opts.log_level
            )
        })?;
        Ok(Self {
            data_file: opts.data_file.clone(),
            log_level,
        })
    }

    /// Install the stderr log subscriber. Stdout stays reserved for JSON output.
    pub fn init_logging(&self) {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
