//! The dashboard report for one (date range, segment) selection.
//!
//! [`Report::build`] filters the fact table, runs every aggregator, and then
//! projects the result onto the selected [`Segment`]. Changing the segment
//! afterwards only re-runs the projection ([`Report::with_segment`]).

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::analyzers::aggregate::summarize;
use crate::analyzers::types::{Summaries, SummaryRow, UserCounts};
use crate::analyzers::utility::{linear_fit, pct, pearson};
use crate::dataset::Dataset;
use crate::filter::{DateRange, filter_range};
use crate::segment::Segment;

/// Identifies one of the six summary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    ByHour,
    ByWeekday,
    ByMonth,
    BySeason,
    ByWeathersit,
    ByDay,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::ByHour,
        Table::ByWeekday,
        Table::ByMonth,
        Table::BySeason,
        Table::ByWeathersit,
        Table::ByDay,
    ];

    /// File-stem style name, e.g. `by_hour`.
    pub fn name(self) -> &'static str {
        match self {
            Table::ByHour => "by_hour",
            Table::ByWeekday => "by_weekday",
            Table::ByMonth => "by_month",
            Table::BySeason => "by_season",
            Table::ByWeathersit => "by_weathersit",
            Table::ByDay => "by_day",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Table::ByHour => "Average users per hour",
            Table::ByWeekday => "Average users per weekday",
            Table::ByMonth => "Average users per month",
            Table::BySeason => "Average users per season",
            Table::ByWeathersit => "Average users per weather situation",
            Table::ByDay => "Users per day",
        }
    }
}

/// Row index, per table, of the group with the largest selected value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    pub by_hour: Option<usize>,
    pub by_weekday: Option<usize>,
    pub by_month: Option<usize>,
    pub by_season: Option<usize>,
    pub by_weathersit: Option<usize>,
    pub by_day: Option<usize>,
}

impl Highlights {
    fn compute(summaries: &Summaries, segment: Segment) -> Self {
        Self {
            by_hour: peak_index(&summaries.by_hour, segment),
            by_weekday: peak_index(&summaries.by_weekday, segment),
            by_month: peak_index(&summaries.by_month, segment),
            by_season: peak_index(&summaries.by_season, segment),
            by_weathersit: peak_index(&summaries.by_weathersit, segment),
            by_day: peak_index(&summaries.by_day, segment),
        }
    }

    pub fn get(&self, table: Table) -> Option<usize> {
        match table {
            Table::ByHour => self.by_hour,
            Table::ByWeekday => self.by_weekday,
            Table::ByMonth => self.by_month,
            Table::BySeason => self.by_season,
            Table::ByWeathersit => self.by_weathersit,
            Table::ByDay => self.by_day,
        }
    }
}

/// Casual vs registered share of all rentals in range, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserShare {
    pub casual_pct: f64,
    pub registered_pct: f64,
}

/// Daily rentals of the selected segment against mean daily temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureFit {
    pub correlation: f64,
    pub slope: f64,
    pub intercept: f64,
}

/// One bar of a chart: the group label, its value and whether it is the peak.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: u64,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub range: DateRange,
    pub segment: Segment,
    /// Hourly rows that survived the range filter.
    pub rows: usize,
    pub totals: UserCounts<u64>,
    /// The selected segment's total.
    pub headline: u64,
    pub highlights: Highlights,
    pub distribution: Option<UserShare>,
    pub temperature_fit: Option<TemperatureFit>,
    #[serde(flatten)]
    pub summaries: Summaries,
}

impl Report {
    #[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
    pub fn build(dataset: &Dataset, range: DateRange, segment: Segment) -> Self {
        let rows = filter_range(dataset, range);
        let summaries = summarize(&rows);
        let report = Self::project(range, segment, rows.len(), summaries);

        info!(
            rows = report.rows,
            days = report.summaries.by_day.len(),
            headline = report.headline,
            "Report built"
        );

        report
    }

    /// Re-targets the report at another segment without re-aggregating.
    pub fn with_segment(&self, segment: Segment) -> Self {
        Self::project(self.range, segment, self.rows, self.summaries.clone())
    }

    fn project(range: DateRange, segment: Segment, rows: usize, summaries: Summaries) -> Self {
        let totals = summaries
            .by_day
            .iter()
            .fold(UserCounts::<u64>::default(), |acc, day| {
                let s = day.sums();
                UserCounts::new(
                    acc.total + s.total,
                    acc.registered + s.registered,
                    acc.casual + s.casual,
                )
            });

        let distribution = {
            let users = (totals.registered + totals.casual) as f64;
            (users > 0.0).then(|| UserShare {
                casual_pct: pct(totals.casual as f64, users),
                registered_pct: pct(totals.registered as f64, users),
            })
        };

        Self {
            range,
            segment,
            rows,
            headline: segment.select(&totals),
            totals,
            highlights: Highlights::compute(&summaries, segment),
            distribution,
            temperature_fit: temperature_fit(&summaries, segment),
            summaries,
        }
    }

    /// True when the range selected no rows; every table is then empty.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Chart bars for `table`, valued by the report's segment.
    pub fn bars(&self, table: Table) -> Vec<Bar> {
        let highlight = self.highlights.get(table);
        let s = &self.summaries;
        match table {
            Table::ByHour => bars(&s.by_hour, self.segment, highlight),
            Table::ByWeekday => bars(&s.by_weekday, self.segment, highlight),
            Table::ByMonth => bars(&s.by_month, self.segment, highlight),
            Table::BySeason => bars(&s.by_season, self.segment, highlight),
            Table::ByWeathersit => bars(&s.by_weathersit, self.segment, highlight),
            Table::ByDay => bars(&s.by_day, self.segment, highlight),
        }
    }

    /// The daily time series of the selected segment.
    pub fn daily_series(&self) -> Vec<DailyPoint> {
        self.summaries
            .by_day
            .iter()
            .map(|day| DailyPoint {
                date: day.date,
                value: self.segment.select(&day.sums()),
                temperature: day.avg_temp,
            })
            .collect()
    }
}

/// Index of the first row holding the maximum selected value.
pub fn peak_index<R: SummaryRow>(rows: &[R], segment: Segment) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, row) in rows.iter().enumerate() {
        let value = segment.select(&row.counts());
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

fn bars<R: SummaryRow>(rows: &[R], segment: Segment, highlight: Option<usize>) -> Vec<Bar> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| Bar {
            label: row.label(),
            value: segment.select(&row.counts()),
            highlighted: highlight == Some(idx),
        })
        .collect()
}

fn temperature_fit(summaries: &Summaries, segment: Segment) -> Option<TemperatureFit> {
    let (temps, users): (Vec<f64>, Vec<f64>) = summaries
        .by_day
        .iter()
        .map(|day| (day.avg_temp, segment.select(&day.counts())))
        .unzip();

    let correlation = pearson(&temps, &users)?;
    let (slope, intercept) = linear_fit(&temps, &users)?;
    Some(TemperatureFit {
        correlation,
        slope,
        intercept,
    })
}
