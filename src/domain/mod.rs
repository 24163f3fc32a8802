//! Domain types used throughout the monitor.
//!
//! This module defines:
//!
//! - parsed file values (`FieldValue`, `WindRecord`)
//! - forecast horizons (`ForecastHorizon`, `Forecast`)
//! - poll state (`WatchState`, `WatchEvent`, `MonitorStatus`)

pub mod types;

pub use types::*;
