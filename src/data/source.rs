//! Where the overload CSV text comes from.
//!
//! Fetching is kept apart from parsing so the ingest core can be exercised
//! with plain strings. Two sources are provided:
//! - `HttpSource`: the published spreadsheet (blocking `reqwest`)
//! - `FileSource`: a local CSV export

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::error::OverloadError;

/// Published-to-web export of the overload spreadsheet.
pub const DEFAULT_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/1FFMfCSl5xtW77oJwEzK4CP14w0rE70TyHUfODs9U6ic/pub?gid=118551&single=true&output=csv";

/// Environment variable overriding `DEFAULT_CSV_URL`.
pub const URL_ENV: &str = "OVERLOAD_CSV_URL";

/// Environment variable setting the HTTP timeout in seconds.
pub const TIMEOUT_ENV: &str = "OVERLOAD_HTTP_TIMEOUT_SECS";

/// Anything that can produce the raw CSV text.
pub trait CsvSource {
    fn fetch_text(&self) -> Result<String, OverloadError>;

    /// Short description for logs and error messages.
    fn describe(&self) -> String;
}

pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, OverloadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| OverloadError::Fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CsvSource for HttpSource {
    fn fetch_text(&self) -> Result<String, OverloadError> {
        info!(url = %self.url, "fetching overload CSV");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| OverloadError::Fetch(format!("request to {} failed: {e}", self.url)))?;

        if !resp.status().is_success() {
            return Err(OverloadError::Fetch(format!(
                "HTTP error! status: {}",
                resp.status()
            )));
        }

        resp.text()
            .map_err(|e| OverloadError::Fetch(format!("failed to read response body: {e}")))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CsvSource for FileSource {
    fn fetch_text(&self) -> Result<String, OverloadError> {
        info!(path = %self.path.display(), "reading overload CSV");
        std::fs::read_to_string(&self.path)
            .map_err(|e| OverloadError::Fetch(format!("failed to read '{}': {e}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Resolved choice of source, built from CLI flags and the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    File(PathBuf),
    Url {
        url: String,
        timeout: Option<Duration>,
    },
}

impl SourceConfig {
    /// Resolve the source.
    ///
    /// Precedence: `--file`, then `--url`, then `OVERLOAD_CSV_URL`, then the
    /// published default. The timeout comes from the flag or
    /// `OVERLOAD_HTTP_TIMEOUT_SECS`. Only the process environment is read;
    /// `app::run` loads `.env` once at startup.
    pub fn resolve(file: Option<PathBuf>, url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(path) = file {
            return SourceConfig::File(path);
        }

        let url = url
            .or_else(|| std::env::var(URL_ENV).ok().filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_CSV_URL.to_string());
        let timeout = timeout_secs
            .or_else(|| std::env::var(TIMEOUT_ENV).ok().and_then(|s| s.trim().parse().ok()))
            .map(Duration::from_secs);

        SourceConfig::Url { url, timeout }
    }

    pub fn open(&self) -> Result<Box<dyn CsvSource>, OverloadError> {
        match self {
            SourceConfig::File(path) => Ok(Box::new(FileSource::new(path.clone()))),
            SourceConfig::Url { url, timeout } => Ok(Box::new(HttpSource::new(url.clone(), *timeout)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_flag_wins_over_url() {
        let config = SourceConfig::resolve(
            Some(PathBuf::from("curves.csv")),
            Some("https://example.com/curves.csv".to_string()),
            None,
        );
        assert_eq!(config, SourceConfig::File(PathBuf::from("curves.csv")));
    }

    #[test]
    fn explicit_url_and_timeout_are_kept() {
        let config = SourceConfig::resolve(None, Some("https://example.com/curves.csv".to_string()), Some(7));
        assert_eq!(
            config,
            SourceConfig::Url {
                url: "https://example.com/curves.csv".to_string(),
                timeout: Some(Duration::from_secs(7)),
            }
        );
    }

    #[test]
    fn file_source_reads_text() {
        let path = std::env::temp_dir().join(format!("overload_source_{}.csv", std::process::id()));
        std::fs::write(&path, "time,current\n1,2\n").unwrap();

        let text = FileSource::new(&path).fetch_text().unwrap();
        assert_eq!(text, "time,current\n1,2\n");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let path = std::env::temp_dir().join("overload_source_does_not_exist.csv");
        let err = FileSource::new(&path).fetch_text().unwrap_err();
        assert!(matches!(err, OverloadError::Fetch(_)));
    }
}
