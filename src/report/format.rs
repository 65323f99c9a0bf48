//! Formatted terminal output.
//!
//! We keep formatting code in one place so the record/query code stays free
//! of presentation concerns and output changes stay localized.

use crate::chart::{format_time_tick, to_fixed};
use crate::domain::Overload;
use crate::select::{Facets, group_by_type};

/// Inclusive time window counted by the summary table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

/// Records grouped by curve type, one label per line.
pub fn format_list(records: &[&Overload]) -> String {
    let mut out = String::new();
    for group in group_by_type(records.iter().copied()) {
        out.push_str(&format!("{} ({})\n", group.name, group.records.len()));
        for r in &group.records {
            out.push_str(&format!("  {:<32} {:>5} pts\n", truncate(&r.label(), 32), r.len()));
        }
    }
    out
}

/// Per-record statistics table.
pub fn format_summary(records: &[&Overload], window: Option<TimeWindow>) -> String {
    let mut out = String::new();

    let in_range_header = window
        .map(|w| format!("in[{},{}]", format_time_tick(w.start), format_time_tick(w.end)))
        .unwrap_or_default();

    out.push_str(
        format!(
            "{:<24} {:<10} {:<8} {:<8} {:>5} {:>10} {:>10} {:<20} {}",
            "label", "type", "voltage", "rating", "n", "max_i", "avg_i", "peak (t, i)", in_range_header
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<24} {:-<10} {:-<8} {:-<8} {:-<5} {:-<10} {:-<10} {:-<20}",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in records {
        let in_range = window
            .map(|w| r.samples_in_range(w.start, w.end).len().to_string())
            .unwrap_or_default();
        let peak = r
            .peak_sample()
            .map(|p| format!("({}, {})", format_time_tick(p.time), to_fixed(p.current, 1)))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(
            format!(
                "{:<24} {:<10} {:<8} {:<8} {:>5} {:>10} {:>10} {:<20} {}",
                truncate(&r.label(), 24),
                truncate(r.curve_type(), 10),
                truncate(r.voltage(), 8),
                truncate(r.rating(), 8),
                r.len(),
                fmt_opt(r.max_current()),
                fmt_opt(r.average_current()),
                peak,
                in_range,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str(&format!("{} record(s)\n", records.len()));
    out
}

/// Distinct filter values.
pub fn format_facets(facets: &Facets) -> String {
    let mut out = String::new();
    out.push_str(&format!("types   : {}\n", facets.types.join(", ")));
    out.push_str(&format!("voltages: {}\n", facets.voltages.join(", ")));
    out.push_str(&format!("ratings : {}\n", facets.ratings.join(", ")));
    out
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| to_fixed(x, 2)).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
