//! Overload curve records.
//!
//! An `Overload` is one named time-current characteristic (a fuse, breaker,
//! or other protective device) together with the `(time, current)` samples
//! read for it. Records are built during ingest and treated as read-only
//! afterwards.

use serde::{Deserialize, Serialize};

use crate::error::OverloadError;

/// One point on a time-current curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub current: f64,
}

impl Sample {
    pub fn new(time: f64, current: f64) -> Self {
        Self { time, current }
    }
}

/// Descriptive fields of a curve. Anything not supplied stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverloadProperties {
    pub mfg: String,
    pub mpn: String,
    #[serde(rename = "type")]
    pub curve_type: String,
    pub voltage: String,
    pub rating: String,
}

impl OverloadProperties {
    pub fn with_mfg(mut self, mfg: impl Into<String>) -> Self {
        self.mfg = mfg.into();
        self
    }

    pub fn with_mpn(mut self, mpn: impl Into<String>) -> Self {
        self.mpn = mpn.into();
        self
    }

    pub fn with_type(mut self, curve_type: impl Into<String>) -> Self {
        self.curve_type = curve_type.into();
        self
    }

    pub fn with_voltage(mut self, voltage: impl Into<String>) -> Self {
        self.voltage = voltage.into();
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    /// Key used to merge CSV rows into a single record: `"{mfg}-{mpn}"`.
    ///
    /// The join is not escaped, so `("A-", "B")` and `("A", "-B")` collide.
    pub fn grouping_key(&self) -> String {
        format!("{}-{}", self.mfg, self.mpn)
    }
}

/// A single overload curve and its samples in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overload {
    #[serde(flatten)]
    properties: OverloadProperties,
    samples: Vec<Sample>,
}

impl Overload {
    pub fn new(properties: OverloadProperties) -> Self {
        Self {
            properties,
            samples: Vec::new(),
        }
    }

    /// Append a sample.
    ///
    /// `None` in either position is rejected with `InvalidSample`. Zero and
    /// NaN are real values and are stored as given.
    pub fn add_sample(&mut self, time: Option<f64>, current: Option<f64>) -> Result<(), OverloadError> {
        let (Some(time), Some(current)) = (time, current) else {
            return Err(OverloadError::InvalidSample);
        };
        self.samples.push(Sample { time, current });
        Ok(())
    }

    /// Samples in the order they were added.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// A copy of the samples sorted ascending by time.
    ///
    /// The sort is stable, so equal times keep their insertion order; `0.0`
    /// and `-0.0` count as equal. NaN times sort after every number.
    pub fn sorted_samples(&self) -> Vec<Sample> {
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| {
            a.time
                .partial_cmp(&b.time)
                .unwrap_or_else(|| a.time.is_nan().cmp(&b.time.is_nan()))
        });
        sorted
    }

    /// Greatest current over all samples. A single NaN current makes the
    /// result NaN, wherever it sits.
    pub fn max_current(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        if self.samples.iter().any(|s| s.current.is_nan()) {
            return Some(f64::NAN);
        }
        self.samples.iter().map(|s| s.current).reduce(f64::max)
    }

    /// The sample with the greatest current; the first one wins ties.
    pub fn peak_sample(&self) -> Option<Sample> {
        let (first, rest) = self.samples.split_first()?;
        let peak = rest
            .iter()
            .fold(*first, |best, s| if s.current > best.current { *s } else { best });
        Some(peak)
    }

    /// Samples with `start <= time <= end`, in storage order.
    pub fn samples_in_range(&self, start: f64, end: f64) -> Vec<Sample> {
        self.samples
            .iter()
            .filter(|s| s.time >= start && s.time <= end)
            .copied()
            .collect()
    }

    pub fn average_current(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.current).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Display identity used in legends and selections.
    pub fn label(&self) -> String {
        format!("{} {}", self.properties.mfg, self.properties.mpn)
            .trim()
            .to_string()
    }

    /// Snapshot of the descriptive fields (samples excluded).
    pub fn properties(&self) -> OverloadProperties {
        self.properties.clone()
    }

    pub fn mfg(&self) -> &str {
        &self.properties.mfg
    }

    pub fn mpn(&self) -> &str {
        &self.properties.mpn
    }

    pub fn curve_type(&self) -> &str {
        &self.properties.curve_type
    }

    pub fn voltage(&self) -> &str {
        &self.properties.voltage
    }

    pub fn rating(&self) -> &str {
        &self.properties.rating
    }

    pub fn grouping_key(&self) -> String {
        self.properties.grouping_key()
    }
}
