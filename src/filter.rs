//! Inclusive date-range selection applied before aggregation.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dataset::{Dataset, FactRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("dataset has no records to select from")]
    EmptyDataset,

    #[error("{date} is outside the data range {first} .. {last}")]
    OutOfBounds {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The range spanning every date in `dataset`, or `None` if it is empty.
    pub fn covering(dataset: &Dataset) -> Option<Self> {
        dataset
            .date_bounds()
            .map(|(start, end)| Self::new(start, end))
    }

    /// Builds a range from a user selection. Missing ends default to the
    /// dataset bounds, and both ends must lie within them. `start > end` is
    /// accepted and selects nothing.
    pub fn resolve(
        dataset: &Dataset,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, RangeError> {
        let (first, last) = dataset.date_bounds().ok_or(RangeError::EmptyDataset)?;
        let range = Self::new(start.unwrap_or(first), end.unwrap_or(last));

        for date in [range.start, range.end] {
            if date < first || date > last {
                return Err(RangeError::OutOfBounds { date, first, last });
            }
        }
        if range.is_inverted() {
            warn!(start = %range.start, end = %range.end, "Start is after end, report will be empty");
        }

        Ok(range)
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// `start > end`; such a range selects nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Copies out the rows with `start <= date <= end`, in load order.
pub fn filter_range(dataset: &Dataset, range: DateRange) -> Vec<FactRecord> {
    let rows: Vec<FactRecord> = dataset
        .records()
        .iter()
        .filter(|r| range.contains(r.date))
        .copied()
        .collect();

    debug!(
        start = %range.start,
        end = %range.end,
        selected = rows.len(),
        total = dataset.len(),
        "Range filter applied"
    );

    rows
}
