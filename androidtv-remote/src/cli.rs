//! Command-line interface and logging setup

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Android TV remote command-line interface
#[derive(Parser, Debug)]
#[command(name = "androidtv-remote")]
#[command(about = "Pair with and control an Android TV", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: $ANDROIDTV_REMOTE_CONFIG or the user config dir)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// TV host name or IP address, overriding the configuration file
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log every protocol message
    #[arg(long)]
    pub events: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pair with the TV, creating the client certificate if needed
    Pair,

    /// Send key presses by name (e.g. KEYCODE_HOME KEYCODE_DPAD_DOWN)
    Key {
        #[arg(required = true, value_name = "KEYCODE")]
        keys: Vec<String>,
    },

    /// Mute and/or pause the TV until interrupted, then restore it
    Hold {
        /// Mute the TV
        #[arg(long)]
        mute: bool,

        /// Pause playback
        #[arg(long)]
        pause: bool,
    },
}

/// Initialize logging based on CLI arguments
pub fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = cli.log_level.parse::<Level>().with_context(|| {
        format!(
            "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
            cli.log_level
        )
    })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.as_str()))
        .context("Failed to create log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized: level={}", log_level);
    Ok(())
}
