//! Input/output helpers.
//!
//! - CSV ingest + grouping (`ingest`)
//! - sample CSV and chart JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
