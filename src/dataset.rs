//! Loading and normalization of the hourly usage CSV.
//!
//! [`Dataset`] is the immutable fact table. It is loaded once and then handed
//! by reference (or cheap clone) to the filter and the aggregators.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::analyzers::types::UserCounts;
use crate::codes::{Season, WeatherSituation, weekday_from_code};
use crate::error::DataFormatError;

/// Scale factor of the dataset's normalized temperature column.
pub const TEMPERATURE_SCALE: f64 = 41.0;

const REQUIRED_COLUMNS: &[&str] = &[
    "dteday",
    "hr",
    "weekday",
    "season",
    "weathersit",
    "workingday",
    "temp",
    "cnt",
    "registered",
    "casual",
];

/// A row exactly as it appears in the CSV. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    dteday: String,
    hr: u8,
    weekday: u8,
    season: u8,
    weathersit: u8,
    workingday: u8,
    temp: f64,
    cnt: u32,
    registered: u32,
    casual: u32,
}

impl RawRecord {
    fn normalize(self) -> Result<FactRecord, DataFormatError> {
        Ok(FactRecord {
            date: parse_date(&self.dteday)?,
            hour: shift_hour(self.hr)?,
            weekday: weekday_from_code(self.weekday)?,
            season: Season::try_from(self.season)?,
            weathersit: WeatherSituation::try_from(self.weathersit)?,
            workingday: recode_flag("workingday", self.workingday)?,
            temperature: normalize_temperature(self.temp)?,
            counts: UserCounts::new(self.cnt, self.registered, self.casual),
        })
    }
}

/// One normalized hourly observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactRecord {
    pub date: NaiveDate,
    /// Hour of day shifted to 1-24.
    pub hour: u8,
    pub weekday: Weekday,
    pub season: Season,
    pub weathersit: WeatherSituation,
    pub workingday: bool,
    /// Celsius, rounded to two decimals.
    pub temperature: f64,
    pub counts: UserCounts<u32>,
}

impl FactRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DataFormatError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| DataFormatError::InvalidDate {
        value: value.to_string(),
    })
}

/// Maps the raw 0-23 hour onto 1-24.
pub fn shift_hour(raw: u8) -> Result<u8, DataFormatError> {
    if raw > 23 {
        return Err(DataFormatError::OutOfDomain {
            column: "hr",
            value: raw.into(),
        });
    }
    Ok(raw + 1)
}

pub fn recode_flag(column: &'static str, raw: u8) -> Result<bool, DataFormatError> {
    match raw {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DataFormatError::OutOfDomain {
            column,
            value: other.into(),
        }),
    }
}

/// Converts the normalized [0, 1] temperature to Celsius, two decimals.
pub fn to_celsius(raw: f64) -> f64 {
    (raw * TEMPERATURE_SCALE * 100.0).round() / 100.0
}

/// Validates the raw temperature (finite, within [0, 1]) before conversion.
pub fn normalize_temperature(raw: f64) -> Result<f64, DataFormatError> {
    if !(0.0..=1.0).contains(&raw) {
        return Err(DataFormatError::InvalidFloat {
            column: "temp",
            value: raw,
        });
    }
    Ok(to_celsius(raw))
}

/// Immutable, shareable fact table.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[FactRecord]>,
}

impl Dataset {
    /// Reads and normalizes the CSV at `path`. Any bad row fails the load.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, DataFormatError> {
        let reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        let dataset = Self::read_records(reader)?;

        if let Some((first, last)) = dataset.date_bounds() {
            info!(records = dataset.len(), %first, %last, "Dataset loaded");
        } else {
            warn!("Dataset loaded but contains no records");
        }

        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataFormatError> {
        let reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        Self::read_records(reader)
    }

    /// Wraps records that are already normalized.
    pub fn from_records(records: Vec<FactRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DataFormatError> {
        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(DataFormatError::MissingColumn(*column));
            }
        }
        debug!(columns = headers.len(), "CSV header validated");

        let mut records = Vec::new();
        let mut unbalanced = 0usize;

        for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
            // header is line 1
            let line = idx as u64 + 2;
            let raw = result.map_err(|source| DataFormatError::Malformed { line, source })?;
            let record = raw.normalize().map_err(|e| e.at_line(line))?;

            let c = record.counts;
            if c.registered.checked_add(c.casual) != Some(c.total) {
                unbalanced += 1;
            }
            records.push(record);
        }

        if unbalanced > 0 {
            warn!(unbalanced, "Rows where cnt != registered + casual");
        }
        debug!(records = records.len(), "CSV rows normalized");

        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[FactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date present, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}
