//! Reporting utilities: display strings, status lines, and snapshot output.

pub mod format;

pub use format::*;
