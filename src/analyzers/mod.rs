//! The aggregation pipeline.
//!
//! Turns a filtered set of hourly fact rows into the six summary tables
//! (hour, weekday, month, season, weather, day). Every aggregator is a pure
//! function of its input rows.

pub mod aggregate;
pub mod types;
pub mod utility;
