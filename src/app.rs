//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - resolves the data file path
//! - sets up logging for the chosen front-end
//! - runs the TUI, the line-mode poll loop, a one-shot read, or the simulator

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use crate::cli::{Command, ShowArgs, SimulateArgs, SourceArgs, TuiArgs, WatchArgs};
use crate::domain::{DEFAULT_DATA_FILE_NAME, DEFAULT_POLL_INTERVAL_MS, MonitorConfig};
use crate::error::AppError;
use crate::report::{SnapshotJson, WindDisplay, format_snapshot, format_watch_line, now_unix, status_line};
use crate::sim::{SimConfig, Simulator};

pub mod monitor;
pub mod schedule;

use monitor::Monitor;
use schedule::Ticker;

/// Entry point for the `windy` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` values feed clap's `env` fallbacks, so load them first.
    dotenvy::dotenv().ok();

    // We want `windy` and `windy <FILE>` to behave like `windy tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Watch(args) => handle_watch(args),
        Command::Show(args) => handle_show(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

/// Data file from arguments: explicit file, then `<ksp_root>/WindyData.txt`,
/// then `WindyData.txt` in the working directory.
///
/// Environment fallbacks (`WINDY_DATA_FILE`, `KSP_ROOT`) are applied by clap.
pub fn resolve_data_file(source: &SourceArgs) -> PathBuf {
    if let Some(file) = &source.file {
        return file.clone();
    }
    match &source.ksp_root {
        Some(root) => root.join(DEFAULT_DATA_FILE_NAME),
        None => PathBuf::from(DEFAULT_DATA_FILE_NAME),
    }
}

fn monitor_config(source: &SourceArgs, pick: bool, interval_ms: u64) -> Result<MonitorConfig, AppError> {
    let data_file = if pick {
        crate::cli::picker::prompt_for_data_path()?
    } else {
        resolve_data_file(source)
    };
    Ok(MonitorConfig {
        data_file,
        poll_interval: Duration::from_millis(interval_ms),
    })
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = monitor_config(&args.source, args.pick, args.interval_ms)?;
    let log_dir = args.log_dir.unwrap_or_else(crate::logging::default_log_dir);
    let _guard = crate::logging::init_file(&log_dir);

    tracing::info!(
        path = %config.data_file.display(),
        interval_ms = args.interval_ms,
        "starting tui"
    );
    crate::tui::run(config)
}

fn handle_watch(args: WatchArgs) -> Result<(), AppError> {
    let _guard = crate::logging::init_stderr();
    let config = monitor_config(&args.source, args.pick, args.interval_ms)?;

    let mut monitor = Monitor::new(config.data_file);
    watch_loop(&mut io::stdout().lock(), &mut monitor, config.poll_interval, args.max_ticks)
}

/// Poll `monitor` every `interval`, writing one line per visible change.
///
/// Runs until `max_ticks` ticks have fired, or forever when it is `None`.
pub fn watch_loop(
    out: &mut impl Write,
    monitor: &mut Monitor,
    interval: Duration,
    max_ticks: Option<u64>,
) -> Result<(), AppError> {
    let mut ticker = Ticker::new(interval, Instant::now());

    loop {
        if max_ticks.is_some_and(|max| ticker.fired() >= max) {
            break;
        }

        let wait = ticker.time_until_due(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        if !ticker.poll(Instant::now()) {
            continue;
        }

        if monitor.tick() {
            let display = WindDisplay::from_record(monitor.record());
            let status = status_line(monitor.status(), monitor.path(), monitor.record(), now_unix());
            writeln!(out, "{}", format_watch_line(&display, &status))
                .and_then(|_| out.flush())
                .map_err(|e| AppError::runtime(format!("Failed to write output: {e}")))?;
        }
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let _guard = crate::logging::init_stderr();
    let config = monitor_config(&args.source, args.pick, DEFAULT_POLL_INTERVAL_MS)?;

    let mut monitor = Monitor::new(config.data_file);
    monitor.tick();
    write_snapshot(&mut io::stdout().lock(), &monitor, args.json, now_unix())
}

/// Write the monitor's current state as text or pretty JSON.
///
/// A missing or invalid file is not an error: the status says so.
pub fn write_snapshot(out: &mut impl Write, monitor: &Monitor, json: bool, now: f64) -> Result<(), AppError> {
    let rendered = if json {
        let snapshot = SnapshotJson::new(monitor.path(), monitor.status(), monitor.record(), now);
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| AppError::runtime(format!("Failed to encode JSON: {e}")))?
    } else {
        let display = WindDisplay::from_record(monitor.record());
        let status = status_line(monitor.status(), monitor.path(), monitor.record(), now);
        format_snapshot(monitor.path(), &display, &status)
    };
    writeln!(out, "{rendered}").map_err(|e| AppError::runtime(format!("Failed to write output: {e}")))
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let _guard = crate::logging::init_stderr();
    let config = sim_config_from_args(&args)?;
    let path = resolve_data_file(&args.source);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(AppError::usage(format!(
                "Output directory does not exist: {}",
                parent.display()
            )));
        }
    }

    let sim = Simulator::new(&config);
    if !sim.has_wind() {
        tracing::warn!(body = %config.body, "body has no wind; writing calm frames");
    }
    println!(
        "Writing simulated wind for {} to {} every {} ms (seed {})",
        config.body,
        path.display(),
        args.interval_ms,
        config.seed
    );

    let start = Instant::now();
    let mut ticker = Ticker::new(Duration::from_millis(args.interval_ms), start);
    loop {
        if args.frames.is_some_and(|max| ticker.fired() >= max) {
            break;
        }

        let wait = ticker.time_until_due(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        let now = Instant::now();
        if !ticker.poll(now) {
            continue;
        }

        let frame = sim.frame(now.duration_since(start).as_secs_f64(), now_unix());
        crate::io::write_data_file(&path, &frame)?;
    }

    Ok(())
}

pub fn sim_config_from_args(args: &SimulateArgs) -> Result<SimConfig, AppError> {
    for (name, v) in [
        ("altitude", args.altitude),
        ("climb-rate", args.climb_rate),
        ("time-offset", args.time_offset),
    ] {
        if !v.is_finite() {
            return Err(AppError::usage(format!("--{name} must be a finite number.")));
        }
    }

    Ok(SimConfig {
        body: args.body.clone(),
        altitude: args.altitude,
        climb_rate: args.climb_rate,
        max_wind: args.max_wind,
        seed: args.seed.unwrap_or_else(rand::random),
        time_offset: args.time_offset,
    })
}

/// Rewrite argv so `windy` defaults to `windy tui`.
///
/// Rules:
/// - `windy`                       -> `windy tui`
/// - `windy WindyData.txt ...`     -> `windy tui WindyData.txt ...`
/// - `windy --pick ...`            -> `windy tui --pick ...`
/// - `windy --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "watch" | "show" | "simulate");
    if is_subcommand {
        return argv;
    }

    // Anything else (a flag or a file path) is treated as TUI input.
    argv.insert(1, "tui".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonitorStatus;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(argv(&["windy"])), argv(&["windy", "tui"]));
    }

    #[test]
    fn file_or_flags_run_tui() {
        assert_eq!(
            rewrite_args(argv(&["windy", "data/WindyData.txt"])),
            argv(&["windy", "tui", "data/WindyData.txt"])
        );
        assert_eq!(
            rewrite_args(argv(&["windy", "--interval-ms", "500"])),
            argv(&["windy", "tui", "--interval-ms", "500"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for args in [&["windy", "show", "--json"][..], &["windy", "--help"], &["windy", "simulate"]] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn data_file_resolution_order() {
        let explicit = SourceArgs {
            file: Some(PathBuf::from("/tmp/custom.txt")),
            ksp_root: Some(PathBuf::from("/games/ksp")),
        };
        assert_eq!(resolve_data_file(&explicit), PathBuf::from("/tmp/custom.txt"));

        let rooted = SourceArgs {
            file: None,
            ksp_root: Some(PathBuf::from("/games/ksp")),
        };
        assert_eq!(resolve_data_file(&rooted), PathBuf::from("/games/ksp/WindyData.txt"));

        assert_eq!(resolve_data_file(&SourceArgs::default()), PathBuf::from("WindyData.txt"));
    }

    #[test]
    fn cli_parses_watch_options() {
        let cli = crate::cli::Cli::parse_from(argv(&["windy", "watch", "w.txt", "--max-ticks", "3"]));
        let Command::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.max_ticks, Some(3));
        assert_eq!(args.interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(args.source.file, Some(PathBuf::from("w.txt")));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let res = crate::cli::Cli::try_parse_from(argv(&["windy", "tui", "--interval-ms", "0"]));
        assert!(res.is_err());
    }

    #[test]
    fn simulate_rejects_non_finite_altitude() {
        let cli = crate::cli::Cli::parse_from(argv(&["windy", "simulate", "out.txt", "--altitude", "NaN", "--seed", "1"]));
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let err = sim_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn show_reports_missing_file_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let mut monitor = Monitor::new(dir.path().join("WindyData.txt"));
        monitor.tick();
        assert_eq!(monitor.status(), MonitorStatus::NotFound);

        let mut text = Vec::new();
        write_snapshot(&mut text, &monitor, false, 0.0).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(text.contains("File not found:"), "got: {text}");

        let mut json = Vec::new();
        write_snapshot(&mut json, &monitor, true, 0.0).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["status"], "not_found");
        assert!(value["record"].is_null());
    }

    #[test]
    fn watch_prints_once_per_visible_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WindyData.txt");
        std::fs::write(&path, "speed=7.4\ndirection_deg=45\n").unwrap();

        let mut monitor = Monitor::new(&path);
        let mut out = Vec::new();
        watch_loop(&mut out, &mut monitor, Duration::from_millis(1), Some(3)).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 1, "got: {out}");
        assert!(out.contains("7.4"), "got: {out}");
    }
}
