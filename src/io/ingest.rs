//! CSV ingest and grouping.
//!
//! This module turns the published overload spreadsheet into one `Overload`
//! record per `(mfg, mpn)` pair.
//!
//! Leniency policies (kept on purpose, tightening them changes which sheets load):
//! - **Substring header matching**: a column is found when its lower-cased
//!   header *contains* the fragment (`"Time (s)"` matches `time`).
//! - **Plain comma splitting**: no quoting or escaping. A comma inside a
//!   field shifts every later column of that row.
//! - **Prefix number parsing**: a cell reads as its longest leading number,
//!   so `"10A"` is `10` and `"1e"` is `1`. Only `Infinity` is accepted as a
//!   word; `"inf"` and `"NaN"` do not parse.
//! - **Silent sample skip**: a row whose time or current does not parse adds
//!   no sample, but still creates its record.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::data::CsvSource;
use crate::domain::{Overload, OverloadProperties};
use crate::error::OverloadError;

/// Resolved column positions for one header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub time: usize,
    pub current: usize,
    pub mfg: Option<usize>,
    pub mpn: Option<usize>,
    pub curve_type: Option<usize>,
    pub voltage: Option<usize>,
    pub rating: Option<usize>,
}

impl ColumnMap {
    /// Locate columns in a raw header line.
    ///
    /// `time` and `current` are required; the rest fall back to empty values.
    pub fn from_header(header: &str) -> Result<Self, OverloadError> {
        let header = header.to_lowercase();
        let headers: Vec<&str> = header.split(',').collect();

        let find = |fragment: &str| headers.iter().position(|h| h.contains(fragment));

        let time = find("time").ok_or(OverloadError::Schema { missing: "time" })?;
        let current = find("current").ok_or(OverloadError::Schema { missing: "current" })?;

        Ok(Self {
            time,
            current,
            mfg: find("mfg"),
            mpn: find("mpn"),
            curve_type: find("type"),
            voltage: find("voltage"),
            rating: find("rating"),
        })
    }

    fn properties(&self, values: &[&str]) -> OverloadProperties {
        OverloadProperties {
            mfg: field(values, self.mfg),
            mpn: field(values, self.mpn),
            curve_type: field(values, self.curve_type),
            voltage: field(values, self.voltage),
            rating: field(values, self.rating),
        }
    }
}

/// Fetch the CSV text from `source` and parse it.
pub fn load(source: &(impl CsvSource + ?Sized)) -> Result<Vec<Overload>, OverloadError> {
    let text = source.fetch_text()?;
    parse(&text)
}

/// Parse CSV text into records, one per grouping key, in first-seen order.
pub fn parse(text: &str) -> Result<Vec<Overload>, OverloadError> {
    let mut lines = text.split('\n');
    let header = lines.next().unwrap_or("");
    let columns = ColumnMap::from_header(header)?;
    debug!(?columns, "resolved overload columns");

    // Grouping key -> position in `records`, so output keeps first-seen order.
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut records: Vec<Overload> = Vec::new();
    let mut samples = 0usize;

    for (idx, raw) in lines.enumerate() {
        // +2: the header is line 1 and `enumerate` starts at 0.
        let line_no = idx + 2;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split(',').collect();
        let properties = columns.properties(&values);
        let key = properties.grouping_key();

        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                records.push(Overload::new(properties));
                index.insert(key, records.len() - 1);
                records.len() - 1
            }
        };

        let time = parse_number(values.get(columns.time).copied());
        let current = parse_number(values.get(columns.current).copied());
        if time.is_none() || current.is_none() {
            debug!(line = line_no, "skipping row without numeric time/current");
            continue;
        }

        records[slot].add_sample(time, current)?;
        samples += 1;
    }

    info!(records = records.len(), samples, "parsed overload CSV");
    Ok(records)
}

fn field(values: &[&str], idx: Option<usize>) -> String {
    idx.and_then(|i| values.get(i))
        .map(|v| v.to_string())
        .unwrap_or_default()
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits == 0 {
            return None;
        }
        end += 1 + frac_digits;
    } else if int_digits == 0 {
        return None;
    }

    // An exponent only counts when digits follow it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;

    const ACME: &str = "time,current,mfg,mpn,type\n\
                        0.001,10,Acme,F1,fuse\n\
                        0.002,12,Acme,F1,fuse\n\
                        0.001,8,Acme,F2,breaker\n";

    struct StaticSource(Result<String, OverloadError>);

    impl CsvSource for StaticSource {
        fn fetch_text(&self) -> Result<String, OverloadError> {
            self.0.clone()
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[test]
    fn groups_rows_by_mfg_and_mpn_in_first_seen_order() {
        let records = parse(ACME).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].grouping_key(), "Acme-F1");
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0].curve_type(), "fuse");

        assert_eq!(records[1].grouping_key(), "Acme-F2");
        assert_eq!(records[1].len(), 1);
        assert_eq!(records[1].curve_type(), "breaker");
    }

    #[test]
    fn range_query_on_parsed_records() {
        let records = parse(ACME).unwrap();
        let hits: Vec<Sample> = records
            .iter()
            .flat_map(|r| r.samples_in_range(0.001, 0.001))
            .collect();
        assert_eq!(hits, vec![Sample::new(0.001, 10.0), Sample::new(0.001, 8.0)]);
    }

    #[test]
    fn missing_time_column_is_a_schema_error() {
        let err = parse("duration,current,mfg\n1,2,Acme\n").unwrap_err();
        assert_eq!(err, OverloadError::Schema { missing: "time" });
    }

    #[test]
    fn missing_current_column_is_a_schema_error() {
        let err = parse("time,amps\n1,2\n").unwrap_err();
        assert_eq!(err, OverloadError::Schema { missing: "current" });
    }

    #[test]
    fn empty_input_is_a_schema_error() {
        assert!(matches!(parse(""), Err(OverloadError::Schema { .. })));
    }

    #[test]
    fn header_matching_is_substring_and_case_insensitive() {
        let columns = ColumnMap::from_header("Mfg Name,MPN,Trip Time (s),Current (A),Device Type,Voltage,Rating\r").unwrap();
        assert_eq!(columns.time, 2);
        assert_eq!(columns.current, 3);
        assert_eq!(columns.mfg, Some(0));
        assert_eq!(columns.mpn, Some(1));
        assert_eq!(columns.curve_type, Some(4));
        assert_eq!(columns.voltage, Some(5));
        assert_eq!(columns.rating, Some(6));
    }

    #[test]
    fn first_matching_column_wins() {
        let columns = ColumnMap::from_header("time,start time,current,peak current").unwrap();
        assert_eq!(columns.time, 0);
        assert_eq!(columns.current, 2);
    }

    #[test]
    fn non_numeric_cells_skip_only_that_sample() {
        let text = "time,current,mfg,mpn\n\
                    0.001,n/a,Acme,F1\n\
                    0.002,12,Acme,F1\n\
                    ,14,Acme,F1\n\
                    0.004,16,Acme,F1\n";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].samples(),
            &[Sample::new(0.002, 12.0), Sample::new(0.004, 16.0)]
        );
    }

    #[test]
    fn record_exists_even_without_valid_samples() {
        let records = parse("time,current,mfg,mpn\nx,y,Acme,F9\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label(), "Acme F9");
        assert!(records[0].is_empty());
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let text = "time,current,mfg,mpn,voltage,rating\r\n\
                    0.01,5,Acme,F1,250V,10A\r\n\
                    \r\n   \n\
                    0.02,4,Acme,F1,250V,10A\r\n";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rating(), "10A");
        assert_eq!(records[0].voltage(), "250V");
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn missing_optional_columns_default_to_empty() {
        let records = parse("time,current\n1,2\n3,4\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].grouping_key(), "-");
        assert_eq!(records[0].properties(), OverloadProperties::default());
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn short_rows_yield_empty_fields() {
        let records = parse("time,current,mfg,mpn\n1,2,Acme\n").unwrap();
        assert_eq!(records[0].mfg(), "Acme");
        assert_eq!(records[0].mpn(), "");
        assert_eq!(records[0].len(), 1);
    }

    #[test]
    fn first_row_properties_win_for_a_group() {
        let text = "time,current,mfg,mpn,type\n1,2,Acme,F1,fuse\n2,3,Acme,F1,breaker\n";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].curve_type(), "fuse");
    }

    #[test]
    fn numbers_accept_surrounding_whitespace_and_exponents() {
        assert_eq!(parse_number(Some(" 1e-3 ")), Some(0.001));
        assert_eq!(parse_number(Some("0")), Some(0.0));
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(Some("n/a")), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn numbers_read_the_longest_leading_prefix() {
        assert_eq!(parse_number(Some("10A")), Some(10.0));
        assert_eq!(parse_number(Some("0.5s")), Some(0.5));
        assert_eq!(parse_number(Some("12 A")), Some(12.0));
        assert_eq!(parse_number(Some(".5")), Some(0.5));
        assert_eq!(parse_number(Some("5.")), Some(5.0));
        assert_eq!(parse_number(Some("-2.5e2x")), Some(-250.0));
        assert_eq!(parse_number(Some("1e")), Some(1.0));
        assert_eq!(parse_number(Some("1e+")), Some(1.0));
        assert_eq!(parse_number(Some("Infinity")), Some(f64::INFINITY));
        assert_eq!(parse_number(Some("-Infinity ms")), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number(Some("inf")), None);
        assert_eq!(parse_number(Some("infinity")), None);
        assert_eq!(parse_number(Some(".")), None);
        assert_eq!(parse_number(Some("-")), None);
        assert_eq!(parse_number(Some("")), None);
    }

    #[test]
    fn unit_suffixed_cells_still_become_samples() {
        let text = "time,current,mfg,mpn\n0.5s,10A,Acme,F1\n0.1,20,Acme,F1\ninf,30,Acme,F1\n";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].samples(), &[Sample::new(0.5, 10.0), Sample::new(0.1, 20.0)]);
    }

    #[test]
    fn load_parses_fetched_text() {
        let records = load(&StaticSource(Ok(ACME.to_string()))).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn load_propagates_fetch_errors() {
        let source = StaticSource(Err(OverloadError::Fetch("HTTP error! status: 500".to_string())));
        let err = load(&source).unwrap_err();
        assert!(matches!(err, OverloadError::Fetch(_)));
    }

    #[test]
    fn separate_loads_share_no_state() {
        let mut first = parse(ACME).unwrap();
        let second = parse(ACME).unwrap();
        first[0].add_sample(Some(1.0), Some(1.0)).unwrap();
        assert_eq!(first[0].len(), 3);
        assert_eq!(second[0].len(), 2);
    }
}
