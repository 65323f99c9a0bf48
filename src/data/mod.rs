//! Data acquisition: fetching the raw overload CSV text.

pub mod source;

pub use source::*;
