//! Selection helpers for curve pickers.
//!
//! A chart front-end needs three things from the record list:
//! - the distinct values to offer as filters (`Facets`)
//! - the records grouped by device type (`group_by_type`)
//! - which records survive the current filter (`OverloadFilter`)
//!
//! None of these mutate or reorder the records they are given.

use crate::domain::Overload;

/// Group name used for records with an empty type.
pub const OTHER_GROUP: &str = "Other";

/// Distinct descriptive values, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub types: Vec<String>,
    pub voltages: Vec<String>,
    pub ratings: Vec<String>,
}

impl Facets {
    pub fn collect(records: &[Overload]) -> Self {
        let mut facets = Facets::default();
        for r in records {
            push_distinct(&mut facets.types, r.curve_type());
            push_distinct(&mut facets.voltages, r.voltage());
            push_distinct(&mut facets.ratings, r.rating());
        }
        facets
    }
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if value.is_empty() || values.iter().any(|v| v == value) {
        return;
    }
    values.push(value.to_string());
}

/// Records sharing one curve type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeGroup<'a> {
    pub name: String,
    pub records: Vec<&'a Overload>,
}

/// Group records by type; groups appear in the order their type is first seen.
pub fn group_by_type<'a>(records: impl IntoIterator<Item = &'a Overload>) -> Vec<TypeGroup<'a>> {
    let mut groups: Vec<TypeGroup<'a>> = Vec::new();
    for r in records {
        let name = if r.curve_type().is_empty() {
            OTHER_GROUP
        } else {
            r.curve_type()
        };
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.records.push(r),
            None => groups.push(TypeGroup {
                name: name.to_string(),
                records: vec![r],
            }),
        }
    }
    groups
}

/// Record filter. Each empty list accepts everything.
///
/// Type, voltage and rating compare trimmed values case-insensitively.
/// Labels must match exactly, like ticking a checkbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverloadFilter {
    pub types: Vec<String>,
    pub voltages: Vec<String>,
    pub ratings: Vec<String>,
    pub labels: Vec<String>,
}

impl OverloadFilter {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.voltages.is_empty() && self.ratings.is_empty() && self.labels.is_empty()
    }

    pub fn matches(&self, overload: &Overload) -> bool {
        matches_any(&self.types, overload.curve_type())
            && matches_any(&self.voltages, overload.voltage())
            && matches_any(&self.ratings, overload.rating())
            && (self.labels.is_empty() || self.labels.iter().any(|l| *l == overload.label()))
    }

    pub fn apply<'a>(&self, records: &'a [Overload]) -> Vec<&'a Overload> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn matches_any(filters: &[String], value: &str) -> bool {
    filters.is_empty() || filters.iter().any(|f| f.trim().eq_ignore_ascii_case(value.trim()))
}
