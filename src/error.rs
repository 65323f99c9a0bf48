//! Error types.
//!
//! - `OverloadError`: failures of the ingest core (fetch, schema, sample misuse)
//! - `AppError`: what the binary reports, carrying a process exit code

use thiserror::Error;

/// Errors raised by the ingest core and the `Overload` record API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverloadError {
    /// Retrieving the source text failed (transport, status, or file I/O).
    #[error("Failed to fetch overload data: {0}")]
    Fetch(String),

    /// A required column could not be located in the header row.
    #[error("CSV must contain time and current columns (missing `{missing}`)")]
    Schema { missing: &'static str },

    /// `add_sample` was called without one of its coordinates.
    #[error("Both time and current must be provided")]
    InvalidSample,
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<OverloadError> for AppError {
    fn from(err: OverloadError) -> Self {
        let exit_code = match err {
            OverloadError::Fetch(_) => 4,
            OverloadError::Schema { .. } => 2,
            OverloadError::InvalidSample => 1,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overload_errors_map_to_exit_codes() {
        let fetch: AppError = OverloadError::Fetch("HTTP error! status: 404".to_string()).into();
        assert_eq!(fetch.exit_code(), 4);
        assert!(fetch.to_string().contains("404"));

        let schema: AppError = OverloadError::Schema { missing: "time" }.into();
        assert_eq!(schema.exit_code(), 2);
        assert!(schema.to_string().contains("`time`"));

        let sample: AppError = OverloadError::InvalidSample.into();
        assert_eq!(sample.exit_code(), 1);
    }
}
