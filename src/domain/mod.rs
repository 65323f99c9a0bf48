//! Domain types.
//!
//! - `Sample`: one `(time, current)` point
//! - `OverloadProperties`: descriptive fields of a curve
//! - `Overload`: a curve record with its samples and derived queries

pub mod types;

pub use types::*;
