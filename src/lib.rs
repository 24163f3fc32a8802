//! `windy-monitor` library crate.
//!
//! The binary (`windy`) is a thin wrapper around this library so that:
//!
//! - the poll/parse core is testable without spawning processes
//! - the TUI and line-mode front-ends share one `Monitor`
//! - the simulator can reuse the exact file format the monitor reads

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod sim;
pub mod tui;
