//! `overload-curves` library crate.
//!
//! Reads the published overload spreadsheet and turns it into one
//! [`domain::Overload`] record per manufacturer/part number. The binary
//! (`overload`) is a thin wrapper around this library so that:
//!
//! - ingest and query logic is testable without spawning processes
//! - a chart front-end can depend on the same records and payloads

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod select;
