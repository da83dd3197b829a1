use crate::analyzers::types::{
    DayRow, HourRow, MonthRow, SeasonRow, Summaries, UserCounts, WeathersitRow, WeekdayRow,
};
use crate::codes::{weekday_code, weekday_label};
use crate::dataset::FactRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Running sums for one group of hourly rows.
#[derive(Debug, Default, Clone, Copy)]
struct CountSums {
    rows: u64,
    total: u64,
    registered: u64,
    casual: u64,
}

impl CountSums {
    fn push(&mut self, counts: UserCounts<u32>) {
        self.rows += 1;
        self.total += u64::from(counts.total);
        self.registered += u64::from(counts.registered);
        self.casual += u64::from(counts.casual);
    }

    fn sums(&self) -> UserCounts<u64> {
        UserCounts::new(self.total, self.registered, self.casual)
    }

    fn means(&self) -> UserCounts<f64> {
        if self.rows == 0 {
            return UserCounts::default();
        }
        let n = self.rows as f64;
        UserCounts::new(
            self.total as f64 / n,
            self.registered as f64 / n,
            self.casual as f64 / n,
        )
    }
}

/// One group: the first record seen (for labels) and its running sums.
struct Group {
    sample: FactRecord,
    sums: CountSums,
}

/// Groups `rows` by `key` in ascending key order. Keys with no rows never
/// appear in the output.
fn group_by<K: Ord>(rows: &[FactRecord], key: impl Fn(&FactRecord) -> K) -> BTreeMap<K, Group> {
    let mut groups: BTreeMap<K, Group> = BTreeMap::new();

    for row in rows {
        groups
            .entry(key(row))
            .or_insert_with(|| Group {
                sample: *row,
                sums: CountSums::default(),
            })
            .sums
            .push(row.counts);
    }

    groups
}

pub fn by_hour(rows: &[FactRecord]) -> Vec<HourRow> {
    group_by(rows, |r| r.hour)
        .into_iter()
        .map(|(hour, group)| {
            let avg = group.sums.means();
            HourRow {
                hour,
                avg_total: avg.total,
                avg_registered: avg.registered,
                avg_casual: avg.casual,
            }
        })
        .collect()
}

/// Ordered Sunday first, following the dataset's weekday codes.
pub fn by_weekday(rows: &[FactRecord]) -> Vec<WeekdayRow> {
    group_by(rows, |r| weekday_code(r.weekday))
        .into_values()
        .map(|group| {
            let avg = group.sums.means();
            WeekdayRow {
                weekday: weekday_label(group.sample.weekday),
                avg_total: avg.total,
                avg_registered: avg.registered,
                avg_casual: avg.casual,
            }
        })
        .collect()
}

/// One row per (year, month) bucket, labelled by the month's name.
pub fn by_month(rows: &[FactRecord]) -> Vec<MonthRow> {
    group_by(rows, |r| (r.year(), r.month()))
        .into_iter()
        .map(|((year, month_number), group)| {
            let avg = group.sums.means();
            MonthRow {
                year,
                month_number,
                month: group.sample.date.format("%B").to_string(),
                avg_total: avg.total,
                avg_registered: avg.registered,
                avg_casual: avg.casual,
            }
        })
        .collect()
}

pub fn by_season(rows: &[FactRecord]) -> Vec<SeasonRow> {
    group_by(rows, |r| r.season)
        .into_iter()
        .map(|(season, group)| {
            let avg = group.sums.means();
            SeasonRow {
                season: season.label(),
                avg_total: avg.total,
                avg_registered: avg.registered,
                avg_casual: avg.casual,
            }
        })
        .collect()
}

pub fn by_weathersit(rows: &[FactRecord]) -> Vec<WeathersitRow> {
    group_by(rows, |r| r.weathersit)
        .into_iter()
        .map(|(weather, group)| {
            let avg = group.sums.means();
            WeathersitRow {
                weathersit: weather.code(),
                description: weather.description(),
                avg_total: avg.total,
                avg_registered: avg.registered,
                avg_casual: avg.casual,
            }
        })
        .collect()
}

/// Daily buckets: summed counts and mean temperature.
pub fn by_day(rows: &[FactRecord]) -> Vec<DayRow> {
    let mut days: BTreeMap<NaiveDate, (CountSums, f64)> = BTreeMap::new();

    for row in rows {
        let (sums, temp_sum) = days.entry(row.date).or_default();
        sums.push(row.counts);
        *temp_sum += row.temperature;
    }

    days.into_iter()
        .map(|(date, (sums, temp_sum))| {
            let total = sums.sums();
            DayRow {
                date,
                sum_total: total.total,
                sum_registered: total.registered,
                sum_casual: total.casual,
                avg_temp: temp_sum / sums.rows as f64,
            }
        })
        .collect()
}

/// Runs all six aggregators over an already filtered row set.
pub fn summarize(rows: &[FactRecord]) -> Summaries {
    let summaries = Summaries {
        by_hour: by_hour(rows),
        by_weekday: by_weekday(rows),
        by_month: by_month(rows),
        by_season: by_season(rows),
        by_weathersit: by_weathersit(rows),
        by_day: by_day(rows),
    };

    debug!(
        rows = rows.len(),
        hours = summaries.by_hour.len(),
        weekdays = summaries.by_weekday.len(),
        months = summaries.by_month.len(),
        seasons = summaries.by_season.len(),
        weathers = summaries.by_weathersit.len(),
        days = summaries.by_day.len(),
        "Summaries computed"
    );

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{Season, WeatherSituation};
    use chrono::Datelike;

    fn record(
        date: (i32, u32, u32),
        hour: u8,
        season: Season,
        weather: WeatherSituation,
        registered: u32,
        casual: u32,
    ) -> FactRecord {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        FactRecord {
            date,
            hour,
            weekday: date.weekday(),
            season,
            weathersit: weather,
            workingday: true,
            temperature: f64::from(hour),
            counts: UserCounts::new(registered + casual, registered, casual),
        }
    }

    fn sample() -> Vec<FactRecord> {
        use Season::*;
        use WeatherSituation::*;
        vec![
            record((2011, 1, 1), 1, Spring, Clear, 10, 2),
            record((2011, 1, 1), 2, Spring, Mist, 20, 4),
            record((2011, 1, 2), 1, Spring, Clear, 30, 6),
            record((2011, 7, 4), 5, Fall, LightPrecipitation, 7, 1),
            record((2012, 1, 3), 5, Spring, Clear, 1, 1),
        ]
    }

    #[test]
    fn test_empty_input_gives_empty_tables() {
        let s = summarize(&[]);
        assert!(s.is_empty());
        assert_eq!(s, Summaries::default());
    }

    #[test]
    fn test_by_hour_means_sorted_ascending() {
        let rows = by_hour(&sample());
        let hours: Vec<_> = rows.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![1, 2, 5]);

        // hour 1: totals 12 and 36
        assert_eq!(rows[0].avg_total, 24.0);
        assert_eq!(rows[0].avg_registered, 20.0);
        assert_eq!(rows[0].avg_casual, 4.0);
    }

    #[test]
    fn test_absent_keys_produce_no_row() {
        let rows = by_season(&sample());
        let seasons: Vec<_> = rows.iter().map(|r| r.season).collect();
        assert_eq!(seasons, vec!["Spring", "Fall"]);
    }

    #[test]
    fn test_by_weekday_starts_on_sunday() {
        let rows = by_weekday(&sample());
        let names: Vec<_> = rows.iter().map(|r| r.weekday).collect();
        // 2011-01-02 Sun, 2011-07-04 Mon, 2012-01-03 Tue, 2011-01-01 Sat
        assert_eq!(names, vec!["Sunday", "Monday", "Tuesday", "Saturday"]);
    }

    #[test]
    fn test_by_month_keeps_years_apart() {
        let rows = by_month(&sample());
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.year, r.month.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![(2011, "January"), (2011, "July"), (2012, "January")]
        );
        assert_eq!(rows[0].avg_total, 24.0);
    }

    #[test]
    fn test_by_weathersit_carries_code_and_description() {
        let rows = by_weathersit(&sample());
        let codes: Vec<_> = rows.iter().map(|r| r.weathersit).collect();
        assert_eq!(codes, vec![1, 2, 3]);
        assert!(rows[1].description.starts_with("Mist"));
    }

    #[test]
    fn test_by_day_sums_and_mean_temperature() {
        let rows = by_day(&sample());
        assert_eq!(rows.len(), 4);

        let first = &rows[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(first.sum_total, 36);
        assert_eq!(first.sum_registered, 30);
        assert_eq!(first.sum_casual, 6);
        assert_eq!(first.avg_temp, 1.5);

        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_by_day_skips_days_without_rows() {
        let rows = by_day(&sample());
        let gap = NaiveDate::from_ymd_opt(2011, 1, 3).unwrap();
        assert!(rows.iter().all(|r| r.date != gap));
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2011, 1, 2).unwrap());
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2011, 7, 4).unwrap());
        assert!(rows.iter().all(|r| r.sum_total > 0));
    }
}
