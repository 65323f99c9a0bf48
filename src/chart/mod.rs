//! Chart payloads for front-ends.
//!
//! Nothing here draws. These types describe what a scatter/line chart of
//! time-current curves needs: one series per selected record, axis scale
//! and limits, and the tick/tooltip text conventions used for time and
//! current values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Overload, Sample};
use crate::select::{OverloadFilter, group_by_type};

/// Series colours, assigned by a record's position in the grouped list.
pub const PALETTE: [&str; 20] = [
    "rgba(75, 192, 192, 0.6)",
    "rgba(255, 99, 132, 0.6)",
    "rgba(54, 162, 235, 0.6)",
    "rgba(255, 206, 86, 0.6)",
    "rgba(153, 102, 255, 0.6)",
    "rgba(255, 159, 64, 0.6)",
    "rgba(201, 203, 207, 0.6)",
    "rgba(0, 204, 102, 0.6)",
    "rgba(102, 51, 153, 0.6)",
    "rgba(255, 102, 178, 0.6)",
    "rgba(0, 128, 255, 0.6)",
    "rgba(255, 255, 0, 0.6)",
    "rgba(128, 0, 0, 0.6)",
    "rgba(0, 153, 76, 0.6)",
    "rgba(255, 128, 0, 0.6)",
    "rgba(76, 0, 153, 0.6)",
    "rgba(102, 255, 178, 0.6)",
    "rgba(204, 102, 255, 0.6)",
    "rgba(0, 102, 204, 0.6)",
    "rgba(255, 51, 51, 0.6)",
];

/// Curve type drawn with a dashed line.
pub const DASHED_TYPE: &str = "fuse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Logarithmic,
}

/// Optional axis limits; `None` means auto-scale that bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisRange {
    /// Build limits from free-text inputs. Blank or unparseable text leaves
    /// the bound on auto.
    pub fn from_inputs(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: parse_bound(min),
            max: parse_bound(max),
        }
    }

    pub fn is_auto(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

fn parse_bound(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub scale: AxisScale,
    pub range: AxisRange,
}

impl Axis {
    /// Time axis: logarithmic by default.
    pub fn time() -> Self {
        Self {
            title: "Time".to_string(),
            scale: AxisScale::Logarithmic,
            range: AxisRange::default(),
        }
    }

    /// Current axis: linear by default.
    pub fn current() -> Self {
        Self {
            title: "Current".to_string(),
            scale: AxisScale::Linear,
            range: AxisRange::default(),
        }
    }

    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_range(mut self, range: AxisRange) -> Self {
        self.range = range;
        self
    }
}

/// One plotted curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    #[serde(rename = "type")]
    pub curve_type: String,
    /// Samples sorted by time.
    pub points: Vec<Sample>,
    pub color: String,
    pub dashed: bool,
    pub show_line: bool,
}

/// Build series for every record accepted by `filter`.
///
/// Records are walked in type-group order (the order a picker lists them)
/// and the colour index counts every record, selected or not, so a curve
/// keeps its colour when other selections change.
pub fn build_series(records: &[Overload], filter: &OverloadFilter) -> Vec<ChartSeries> {
    let mut out = Vec::new();
    let grouped = group_by_type(records);
    let ordered = grouped.iter().flat_map(|g| g.records.iter().copied());

    for (idx, overload) in ordered.enumerate() {
        if !filter.matches(overload) {
            continue;
        }
        out.push(ChartSeries {
            label: overload.label(),
            curve_type: overload.curve_type().to_string(),
            points: overload.sorted_samples(),
            color: PALETTE[idx % PALETTE.len()].to_string(),
            dashed: overload.curve_type() == DASHED_TYPE,
            show_line: true,
        });
    }
    out
}

/// Complete chart payload, written by `overload series`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDocument {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<ChartSeries>,
}

impl SeriesDocument {
    pub fn new(source: impl Into<String>, x_axis: Axis, y_axis: Axis, series: Vec<ChartSeries>) -> Self {
        Self {
            tool: "overload".to_string(),
            generated_at: Utc::now(),
            source: source.into(),
            x_axis,
            y_axis,
            series,
        }
    }
}

/// Tick text for a time value; precision shrinks as the value grows.
pub fn format_time_tick(value: f64) -> String {
    if value < 0.002 {
        to_fixed(value, 5)
    } else if value < 0.01 {
        to_fixed(value, 3)
    } else if value < 0.1 {
        to_fixed(value, 2)
    } else if value < 1.0 {
        to_fixed(value, 1)
    } else if value < 10.0 {
        to_fixed(value, 0)
    } else {
        format!("{value}")
    }
}

pub fn format_current_tick(value: f64) -> String {
    to_fixed(value, 0)
}

/// Tooltip lines for a hovered point: the series label, then `( time, current )`.
pub fn format_tooltip(label: &str, sample: Sample) -> [String; 2] {
    [
        label.to_string(),
        format!("( {}, {} )", format_time_tick(sample.time), to_fixed(sample.current, 1)),
    ]
}

/// `value` with exactly `digits` decimals, rounding half away from zero on
/// the exact binary value (`2.5` gives `"3"`, `1.005` gives `"1.00"`).
///
/// `format!("{:.N}")` rounds ties to even instead, which would disagree
/// with browser front-ends on values such as `0.125`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value < 0.0 {
        return format!("-{}", to_fixed(-value, digits));
    }

    // 1074 fractional digits hold any finite f64 exactly.
    let exact = format!("{value:.1074}");
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part.bytes().chain(frac_part.bytes().take(digits)).collect();
    if frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, b'1');
                break;
            }
            i -= 1;
            if kept[i] == b'9' {
                kept[i] = b'0';
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    let text: String = kept.into_iter().map(char::from).collect();
    let (whole, fraction) = text.split_at(text.len() - digits);
    if digits == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}
