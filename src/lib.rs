pub mod analyzers;
pub mod codes;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod output;
pub mod report;
pub mod segment;

pub use dataset::{Dataset, FactRecord};
pub use error::DataFormatError;
pub use filter::{DateRange, RangeError};
pub use report::Report;
pub use segment::Segment;
