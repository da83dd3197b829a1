//! Output formatting and persistence for reports.
//!
//! Supports terminal tables, JSON serialization, and CSV export of the
//! summary tables.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tabled::{Table as TextTable, Tabled, settings::Style as TableStyle};
use tracing::{debug, info};

use crate::analyzers::types::Summaries;
use crate::report::{Report, Table};

#[derive(Tabled)]
struct BarRow {
    #[tabled(rename = "Group")]
    label: String,
    #[tabled(rename = "Users")]
    value: String,
    #[tabled(rename = "Peak")]
    peak: &'static str,
}

#[derive(Tabled)]
struct DailyRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Users")]
    users: u64,
    #[tabled(rename = "Avg Temp (C)")]
    temperature: String,
}

/// Renders the report as plain-text tables for the terminal.
pub fn render_pretty(report: &Report) -> String {
    Pretty(report).to_string()
}

struct Pretty<'a>(&'a Report);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(
            f,
            "Bike rental usage {} .. {} (segment: {})",
            report.range.start, report.range.end, report.segment
        )?;

        if report.is_empty() {
            return writeln!(f, "No data for the selected range.");
        }

        writeln!(f, "Total users: {}", report.headline)?;
        let t = report.totals;
        writeln!(
            f,
            "All: {}  Registered: {}  Casual: {}",
            t.total, t.registered, t.casual
        )?;
        if let Some(share) = report.distribution {
            writeln!(
                f,
                "Distribution: casual {:.1}%, registered {:.1}%",
                share.casual_pct, share.registered_pct
            )?;
        }
        if let Some(fit) = report.temperature_fit {
            writeln!(
                f,
                "Temperature vs users: r = {:.3}, users = {:.2} * temp + {:.2}",
                fit.correlation, fit.slope, fit.intercept
            )?;
        }

        for table in Table::ALL {
            if table == Table::ByDay {
                continue;
            }
            let rows: Vec<BarRow> = report
                .bars(table)
                .into_iter()
                .map(|bar| BarRow {
                    label: bar.label,
                    value: format!("{:.2}", bar.value),
                    peak: if bar.highlighted { "*" } else { "" },
                })
                .collect();

            let text = TextTable::new(rows)
                .with(TableStyle::ascii_rounded())
                .to_string();
            writeln!(f, "\n{}\n{}", table.title(), text)?;
        }

        let days: Vec<DailyRow> = report
            .daily_series()
            .into_iter()
            .map(|point| DailyRow {
                date: point.date.to_string(),
                users: point.value,
                temperature: format!("{:.2}", point.temperature),
            })
            .collect();
        let text = TextTable::new(days)
            .with(TableStyle::ascii_rounded())
            .to_string();
        writeln!(f, "\n{}\n{}", Table::ByDay.title(), text)
    }
}

/// Serializes the full report as pretty-printed JSON.
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes each summary table to `<dir>/<table>.csv`, replacing old files.
///
/// An empty table produces an empty file.
pub fn export_csv(dir: &Path, summaries: &Summaries) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(Table::ALL.len());
    for table in Table::ALL {
        let path = dir.join(format!("{}.csv", table.name()));
        match table {
            Table::ByHour => write_rows(&path, &summaries.by_hour)?,
            Table::ByWeekday => write_rows(&path, &summaries.by_weekday)?,
            Table::ByMonth => write_rows(&path, &summaries.by_month)?,
            Table::BySeason => write_rows(&path, &summaries.by_season)?,
            Table::ByWeathersit => write_rows(&path, &summaries.by_weathersit)?,
            Table::ByDay => write_rows(&path, &summaries.by_day)?,
        }
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "Summary tables exported");
    Ok(written)
}

fn write_rows<S: Serialize>(path: &Path, rows: &[S]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::UserCounts;
    use crate::codes::{Season, WeatherSituation};
    use crate::dataset::{Dataset, FactRecord};
    use crate::filter::DateRange;
    use crate::segment::Segment;
    use chrono::{Datelike, NaiveDate};
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn report(range_days: (u32, u32)) -> Report {
        let records = (1..=3)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2012, 6, d).unwrap();
                FactRecord {
                    date,
                    hour: 18,
                    weekday: date.weekday(),
                    season: Season::Summer,
                    weathersit: WeatherSituation::Mist,
                    workingday: true,
                    temperature: 25.0 + f64::from(d),
                    counts: UserCounts::new(100 * d, 80 * d, 20 * d),
                }
            })
            .collect();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2012, 6, range_days.0).unwrap(),
            NaiveDate::from_ymd_opt(2012, 6, range_days.1).unwrap(),
        );
        Report::build(&Dataset::from_records(records), range, Segment::All)
    }

    #[test]
    fn test_render_pretty_lists_tables() {
        let text = render_pretty(&report((1, 3)));
        assert!(text.contains("Total users: 600"));
        assert!(text.contains(Table::ByHour.title()));
        assert!(text.contains("Summer"));
        assert!(text.contains("2012-06-03"));
    }

    #[test]
    fn test_render_pretty_header_lines() {
        let text = render_pretty(&report((1, 3)));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Bike rental usage 2012-06-01 .. 2012-06-03 (segment: all)");
        assert_eq!(lines[1], "Total users: 600");
        assert_eq!(lines[2], "All: 600  Registered: 480  Casual: 120");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_pretty_empty_range() {
        let text = render_pretty(&report((3, 1)));
        assert!(text.contains("No data for the selected range."));
        assert!(!text.contains("Total users"));
    }

    #[test]
    fn test_render_json_has_tables() {
        let json = render_json(&report((1, 2))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["headline"], 300);
        assert_eq!(value["segment"], "all");
        assert_eq!(value["by_day"].as_array().unwrap().len(), 2);
        assert_eq!(value["by_weathersit"][0]["weathersit"], 2);
    }

    #[test]
    fn test_export_csv_writes_six_files() {
        let dir = temp_dir("bikeshare_dash_test_export");
        let _ = fs::remove_dir_all(&dir);

        let written = export_csv(&dir, &report((1, 3)).summaries).unwrap();
        assert_eq!(written.len(), 6);

        let by_day = fs::read_to_string(dir.join("by_day.csv")).unwrap();
        let lines: Vec<_> = by_day.lines().collect();
        assert_eq!(lines[0], "date,sum_total,sum_registered,sum_casual,avg_temp");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2012-06-01,100,80,20,"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_csv_empty_tables() {
        let dir = temp_dir("bikeshare_dash_test_export_empty");
        let _ = fs::remove_dir_all(&dir);

        export_csv(&dir, &Summaries::default()).unwrap();
        let content = fs::read_to_string(dir.join("by_hour.csv")).unwrap();
        assert!(content.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }
}
