//! Terminal reports: grouped listing, per-record statistics, filter facets.

pub mod format;

pub use format::*;
