//! Data types produced by the aggregation pipeline.

use chrono::NaiveDate;
use serde::Serialize;

/// The three count columns every table carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UserCounts<T> {
    pub total: T,
    pub registered: T,
    pub casual: T,
}

impl<T> UserCounts<T> {
    pub fn new(total: T, registered: T, casual: T) -> Self {
        Self {
            total,
            registered,
            casual,
        }
    }
}

/// Common view over the summary rows, used for highlighting and charts.
pub trait SummaryRow {
    /// Axis label of the row's group.
    fn label(&self) -> String;

    fn counts(&self) -> UserCounts<f64>;
}

/// Mean usage for one hour of the day (1-24).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRow {
    pub hour: u8,
    pub avg_total: f64,
    pub avg_registered: f64,
    pub avg_casual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayRow {
    pub weekday: &'static str,
    pub avg_total: f64,
    pub avg_registered: f64,
    pub avg_casual: f64,
}

/// Mean usage for one calendar month of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub year: i32,
    pub month_number: u32,
    pub month: String,
    pub avg_total: f64,
    pub avg_registered: f64,
    pub avg_casual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonRow {
    pub season: &'static str,
    pub avg_total: f64,
    pub avg_registered: f64,
    pub avg_casual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeathersitRow {
    pub weathersit: u8,
    pub description: &'static str,
    pub avg_total: f64,
    pub avg_registered: f64,
    pub avg_casual: f64,
}

/// Daily totals plus mean temperature in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub sum_total: u64,
    pub sum_registered: u64,
    pub sum_casual: u64,
    pub avg_temp: f64,
}

impl DayRow {
    pub fn sums(&self) -> UserCounts<u64> {
        UserCounts::new(self.sum_total, self.sum_registered, self.sum_casual)
    }
}

macro_rules! impl_mean_row {
    ($row:ty, |$r:ident| $label:expr) => {
        impl SummaryRow for $row {
            fn label(&self) -> String {
                let $r = self;
                $label
            }

            fn counts(&self) -> UserCounts<f64> {
                UserCounts::new(self.avg_total, self.avg_registered, self.avg_casual)
            }
        }
    };
}

impl_mean_row!(HourRow, |r| r.hour.to_string());
impl_mean_row!(WeekdayRow, |r| r.weekday.to_string());
impl_mean_row!(MonthRow, |r| format!("{} {}", r.month, r.year));
impl_mean_row!(SeasonRow, |r| r.season.to_string());
impl_mean_row!(WeathersitRow, |r| r.weathersit.to_string());

impl SummaryRow for DayRow {
    fn label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    fn counts(&self) -> UserCounts<f64> {
        UserCounts::new(
            self.sum_total as f64,
            self.sum_registered as f64,
            self.sum_casual as f64,
        )
    }
}

/// The six derived tables for one filtered row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summaries {
    pub by_hour: Vec<HourRow>,
    pub by_weekday: Vec<WeekdayRow>,
    pub by_month: Vec<MonthRow>,
    pub by_season: Vec<SeasonRow>,
    pub by_weathersit: Vec<WeathersitRow>,
    pub by_day: Vec<DayRow>,
}

impl Summaries {
    pub fn is_empty(&self) -> bool {
        self.by_hour.is_empty()
            && self.by_weekday.is_empty()
            && self.by_month.is_empty()
            && self.by_season.is_empty()
            && self.by_weathersit.is_empty()
            && self.by_day.is_empty()
    }
}
