//! Command-line parsing for the wind monitor.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the watch/parse code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_POLL_INTERVAL_MS;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "windy", version, about = "Live wind telemetry monitor for the Windy data file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal UI (the default).
    Tui(TuiArgs),
    /// Poll the data file and print a line whenever the display changes.
    Watch(WatchArgs),
    /// Read the data file once and print it.
    Show(ShowArgs),
    /// Write simulated wind data in the game add-on's format.
    ///
    /// Useful for trying the monitor without the game running.
    Simulate(SimulateArgs),
}

/// Where the data file lives.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Data file path. Defaults to WindyData.txt in the game root.
    #[arg(value_name = "FILE", env = "WINDY_DATA_FILE")]
    pub file: Option<PathBuf>,

    /// Game root directory that holds WindyData.txt (used when FILE is not given).
    #[arg(long, value_name = "DIR", env = "KSP_ROOT")]
    pub ksp_root: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Choose a data file from the files under the current directory.
    #[arg(long)]
    pub pick: bool,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Directory for the log file (defaults to a `windy` folder in the temp dir).
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Choose a data file from the files under the current directory.
    #[arg(long)]
    pub pick: bool,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Stop after this many poll ticks (runs until interrupted otherwise).
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Choose a data file from the files under the current directory.
    #[arg(long)]
    pub pick: bool,

    /// Print JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    // Output file; resolved the same way as the monitor's data file.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Milliseconds between writes.
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,

    /// Celestial body; bodies without an atmosphere table entry get calm frames.
    #[arg(long, default_value = "Kerbin")]
    pub body: String,

    /// Starting altitude in metres.
    #[arg(long, default_value_t = 1200.0)]
    pub altitude: f64,

    /// Vertical speed in m/s applied over time.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub climb_rate: f64,

    /// Maximum wind speed in m/s (values <= 1 fall back to 25).
    #[arg(long, default_value_t = 25.0)]
    pub max_wind: f64,

    /// Noise seed (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seconds added to the simulation clock.
    #[arg(long, default_value_t = 0.0)]
    pub time_offset: f64,

    /// Stop after writing this many frames.
    #[arg(long)]
    pub frames: Option<u64>,
}
