//! Load-time error type.
//!
//! Every failure while reading or normalizing the hourly CSV is a
//! [`DataFormatError`]. A single bad row aborts the whole load.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataFormatError {
    /// The reader itself failed (missing file, unreadable header, I/O).
    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column `{0}` is missing")]
    MissingColumn(&'static str),

    /// A row could not be deserialized into the raw record shape.
    #[error("line {line}: malformed row: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("invalid date `{value}`, expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A code fell outside its fixed domain (season 1-4, weekday 0-6, ...).
    #[error("value {value} is out of range for column `{column}`")]
    OutOfDomain { column: &'static str, value: i64 },

    /// A float column held NaN, infinity, or a value outside its range.
    #[error("value {value} is not valid for column `{column}`")]
    InvalidFloat { column: &'static str, value: f64 },

    #[error("line {line}: {source}")]
    AtLine {
        line: u64,
        #[source]
        source: Box<DataFormatError>,
    },
}

impl DataFormatError {
    /// Attaches the 1-based data line a normalization failure came from.
    pub fn at_line(self, line: u64) -> Self {
        DataFormatError::AtLine {
            line,
            source: Box::new(self),
        }
    }
}
