//! Shared "load curves" step used by every subcommand.
//!
//! Source resolution -> fetch -> parse, so the handlers only deal with
//! selecting and presenting records.

use tracing::info;

use crate::data::{CsvSource, SourceConfig};
use crate::domain::Overload;
use crate::error::AppError;
use crate::io::ingest;

/// Records loaded for one run, with where they came from.
#[derive(Debug, Clone)]
pub struct LoadedCurves {
    pub source: String,
    pub records: Vec<Overload>,
}

impl LoadedCurves {
    pub fn sample_count(&self) -> usize {
        self.records.iter().map(Overload::len).sum()
    }
}

/// Resolve the configured source and load its records.
pub fn load_curves(config: &SourceConfig) -> Result<LoadedCurves, AppError> {
    let source = config.open()?;
    load_from(source.as_ref())
}

/// Load records from an already opened source.
pub fn load_from(source: &dyn CsvSource) -> Result<LoadedCurves, AppError> {
    let records = ingest::load(source)?;
    let loaded = LoadedCurves {
        source: source.describe(),
        records,
    };
    info!(
        source = %loaded.source,
        records = loaded.records.len(),
        samples = loaded.sample_count(),
        "loaded overload curves"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_file_config() {
        let path = std::env::temp_dir().join(format!("overload_pipeline_{}.csv", std::process::id()));
        std::fs::write(&path, "time,current,mfg,mpn\n0.1,5,Acme,F1\n0.2,4,Acme,F1\n0.1,9,Acme,F2\n").unwrap();

        let loaded = load_curves(&SourceConfig::File(path.clone())).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.sample_count(), 3);
        assert_eq!(loaded.source, path.display().to_string());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn schema_errors_become_exit_code_two() {
        let path = std::env::temp_dir().join(format!("overload_pipeline_schema_{}.csv", std::process::id()));
        std::fs::write(&path, "mfg,mpn\nAcme,F1\n").unwrap();

        let err = load_curves(&SourceConfig::File(path.clone())).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_becomes_exit_code_four() {
        let path = std::env::temp_dir().join("overload_pipeline_missing.csv");
        let err = load_curves(&SourceConfig::File(path)).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
