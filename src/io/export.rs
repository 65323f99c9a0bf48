//! Export selected curves as flat CSV or chart JSON.
//!
//! Both writers take any `io::Write` so the CLI can target a file or stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::chart::SeriesDocument;
use crate::domain::Overload;
use crate::error::AppError;

const SAMPLE_HEADER: [&str; 8] = ["label", "mfg", "mpn", "type", "voltage", "rating", "time", "current"];

/// Open `path` for writing, or stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, AppError> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// One CSV row per sample, samples sorted by time within each record.
pub fn write_samples_csv<W: Write>(writer: W, records: &[&Overload]) -> Result<(), AppError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(SAMPLE_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        let label = r.label();
        for s in r.sorted_samples() {
            let time = s.time.to_string();
            let current = s.current.to_string();
            csv.write_record([
                label.as_str(),
                r.mfg(),
                r.mpn(),
                r.curve_type(),
                r.voltage(),
                r.rating(),
                time.as_str(),
                current.as_str(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
        }
    }

    csv.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Pretty-printed chart JSON.
pub fn write_series_json<W: Write>(mut writer: W, document: &SeriesDocument) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut writer, document)
        .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;
    writeln!(writer).map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush series JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, build_series};
    use crate::domain::OverloadProperties;
    use crate::select::OverloadFilter;

    fn fuse() -> Overload {
        let mut r = Overload::new(
            OverloadProperties::default()
                .with_mfg("Acme")
                .with_mpn("F1")
                .with_type("fuse")
                .with_voltage("250V")
                .with_rating("10A"),
        );
        r.add_sample(Some(0.002), Some(12.0)).unwrap();
        r.add_sample(Some(0.001), Some(10.0)).unwrap();
        r
    }

    #[test]
    fn samples_csv_has_header_and_sorted_rows() {
        let record = fuse();
        let mut buf = Vec::new();
        write_samples_csv(&mut buf, &[&record]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "label,mfg,mpn,type,voltage,rating,time,current");
        assert_eq!(lines[1], "Acme F1,Acme,F1,fuse,250V,10A,0.001,10");
        assert_eq!(lines[2], "Acme F1,Acme,F1,fuse,250V,10A,0.002,12");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn series_json_round_trips() {
        let records = vec![fuse()];
        let doc = SeriesDocument::new(
            "test.csv",
            Axis::time(),
            Axis::current(),
            build_series(&records, &OverloadFilter::default()),
        );
        let mut buf = Vec::new();
        write_series_json(&mut buf, &doc).unwrap();

        let back: SeriesDocument = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn open_output_reports_bad_paths() {
        let path = std::env::temp_dir().join("overload_missing_dir").join("out.csv");
        let err = open_output(Some(&path)).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
