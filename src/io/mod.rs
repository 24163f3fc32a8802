//! Input/output helpers.
//!
//! - data file parsing + validation (`parse`)
//! - modification-time polling (`watch`)
//! - producer-format writes for the simulator (`writer`)

pub mod parse;
pub mod watch;
pub mod writer;

pub use parse::*;
pub use watch::*;
pub use writer::*;
