//! Dataset Module
//! In-memory year-indexed records and the lookups the frame drivers need.

use std::collections::HashSet;

/// One observation: a location's indicators for a single year.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub location: String,
    pub time: i64,
    pub fertility_rate: f64,
    pub life_expectancy: f64,
    pub pop_mlns: f64,
}

/// Numeric fields a scale can be built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FertilityRate,
    LifeExpectancy,
    Population,
}

impl Field {
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Field::FertilityRate => record.fertility_rate,
            Field::LifeExpectancy => record.life_expectancy,
            Field::Population => record.pop_mlns,
        }
    }
}

/// Ordered, immutable collection of records in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Min and max of a numeric field, ignoring NaN.
    pub fn extent(&self, field: Field) -> Option<(f64, f64)> {
        self.records
            .iter()
            .map(|r| field.value(r))
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// First and last year present.
    pub fn year_extent(&self) -> Option<(i64, i64)> {
        let min = self.records.iter().map(|r| r.time).min()?;
        let max = self.records.iter().map(|r| r.time).max()?;
        Some((min, max))
    }

    /// Records with `time == year`, in file order.
    pub fn records_for_year(&self, year: i64) -> Vec<&Record> {
        self.records.iter().filter(|r| r.time == year).collect()
    }

    pub fn record_for(&self, location: &str, year: i64) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.time == year && r.location == location)
    }

    /// Distinct locations in first-seen order.
    pub fn locations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.location.as_str()))
            .map(|r| r.location.as_str())
            .collect()
    }
}
