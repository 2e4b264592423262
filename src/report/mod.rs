//! Disk-space report transform.
//!
//! Every operation here is a pure function over an immutable row snapshot:
//! filter by selection, derive usage, order by free space, melt into a chart
//! series, pick a representative timestamp, and format the summary table.

use crate::models::disk::{
    ChartSeriesPoint, DerivedDiskRow, DiskRow, RepresentativeTimestamp, Selection, SpaceType,
    ALL_COMPUTERS,
};
use crate::util::human::{fmt_gb, fmt_ratio};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::warn;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m-%Y %H:%M:%S";
pub const DEFAULT_PLACEHOLDER: &str = "N/A";

/// One formatted row of the summary table, keyed by the table's column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "ComputerName")]
    pub computer:        String,
    #[serde(rename = "Drive")]
    pub drive:           String,
    #[serde(rename = "UsedSpace_GB")]
    pub used_space:      String,
    #[serde(rename = "FreeSpace_GB")]
    pub free_space:      String,
    #[serde(rename = "TotalSize_GB")]
    pub total_size:      String,
    #[serde(rename = "PercentageUsed")]
    pub percentage_used: String,
}

/// One stacked bar: a single (computer, drive) with its used and free totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedBar {
    pub computer: String,
    pub drive:    String,
    pub used_gb:  f64,
    pub free_gb:  f64,
}

impl StackedBar {
    pub fn total_gb(&self) -> f64 {
        self.used_gb + self.free_gb
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.computer, self.drive)
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.computer, &self.drive)
    }
}

/// Everything a presentation layer needs for one report request.
#[derive(Debug, Clone, Serialize)]
pub struct DiskSpaceReport {
    pub selection:    Selection,
    pub title:        String,
    pub last_updated: String,
    #[serde(skip)]
    pub timestamp:    RepresentativeTimestamp,
    pub rows:         Vec<DerivedDiskRow>,
    pub summary:      Vec<SummaryRow>,
    pub chart:        Vec<ChartSeriesPoint>,
}

impl DiskSpaceReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Chart bar that summary row `idx` is stacked into. Duplicate
    /// (computer, drive) rows share one bar, so this is not always `idx`.
    pub fn bar_index(&self, idx: usize) -> Option<usize> {
        let row = &self.rows.get(idx)?.row;
        stack_chart(&self.chart)
            .iter()
            .position(|b| b.key() == (row.computer.as_str(), row.drive.as_str()))
    }
}

/// Stateless report transform. Only carries formatting options.
#[derive(Debug, Clone)]
pub struct DiskSpaceReportBuilder {
    placeholder:      String,
    timestamp_format: String,
}

impl Default for DiskSpaceReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER, DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl DiskSpaceReportBuilder {
    pub fn new(placeholder: impl Into<String>, timestamp_format: impl Into<String>) -> Self {
        Self {
            placeholder:      placeholder.into(),
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Full pipeline for one request.
    pub fn build(&self, rows: &[DiskRow], selection: &Selection) -> DiskSpaceReport {
        let scoped    = filter(rows, selection);
        let timestamp = representative_timestamp(&scoped, selection);
        let derived   = sort_by_free_space_ascending(derive(scoped));

        for d in derived.iter().filter(|d| d.row.is_anomalous()) {
            warn!(
                computer = %d.row.computer,
                drive = %d.row.drive,
                total_gb = d.row.total_size_gb,
                free_gb = d.row.free_space_gb,
                "free space outside 0..=total; reporting as-is"
            );
        }

        let last_updated = timestamp.format(&self.timestamp_format, &self.placeholder);
        DiskSpaceReport {
            selection: selection.clone(),
            title:     format!("{} - {}", selection, last_updated),
            last_updated,
            timestamp,
            summary:   self.format_summary(&derived),
            chart:     to_chart_series(&derived),
            rows:      derived,
        }
    }

    /// Render sizes as "X,XXX.XX GB" and usage as "XX.XX%".
    pub fn format_summary(&self, rows: &[DerivedDiskRow]) -> Vec<SummaryRow> {
        rows.iter()
            .map(|d| SummaryRow {
                computer:        d.row.computer.clone(),
                drive:           d.row.drive.clone(),
                used_space:      fmt_gb(d.used_space_gb),
                free_space:      fmt_gb(d.row.free_space_gb),
                total_size:      fmt_gb(d.row.total_size_gb),
                percentage_used: fmt_ratio(d.percentage_used, &self.placeholder),
            })
            .collect()
    }
}

pub fn filter(rows: &[DiskRow], selection: &Selection) -> Vec<DiskRow> {
    rows.iter()
        .filter(|r| selection.matches(&r.computer))
        .cloned()
        .collect()
}

pub fn derive(rows: Vec<DiskRow>) -> Vec<DerivedDiskRow> {
    rows.into_iter().map(DerivedDiskRow::from_row).collect()
}

/// Least free space first. `sort_by` is stable, so ties keep input order.
/// `-0.0` and `0.0` compare equal; rows are finite after source validation.
pub fn sort_by_free_space_ascending(mut rows: Vec<DerivedDiskRow>) -> Vec<DerivedDiskRow> {
    rows.sort_by(|a, b| {
        a.row.free_space_gb
            .partial_cmp(&b.row.free_space_gb)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Melt each row into a Used and a Free point, in row order.
pub fn to_chart_series(rows: &[DerivedDiskRow]) -> Vec<ChartSeriesPoint> {
    rows.iter()
        .flat_map(|d| {
            [
                (SpaceType::Used, d.used_space_gb),
                (SpaceType::Free, d.row.free_space_gb),
            ]
            .into_iter()
            .map(move |(space_type, value_gb)| ChartSeriesPoint {
                computer: d.row.computer.clone(),
                drive:    d.row.drive.clone(),
                space_type,
                value_gb,
            })
        })
        .collect()
}

/// Sum chart points per (computer, drive) into stacked bars, first-seen order.
pub fn stack_chart(points: &[ChartSeriesPoint]) -> Vec<StackedBar> {
    let mut bars: Vec<StackedBar> = Vec::new();
    for p in points {
        let idx = match bars.iter().position(|b| b.key() == p.key()) {
            Some(i) => i,
            None => {
                bars.push(StackedBar {
                    computer: p.computer.clone(),
                    drive:    p.drive.clone(),
                    used_gb:  0.0,
                    free_gb:  0.0,
                });
                bars.len() - 1
            }
        };
        match p.space_type {
            SpaceType::Used => bars[idx].used_gb += p.value_gb,
            SpaceType::Free => bars[idx].free_gb += p.value_gb,
        }
    }
    bars
}

/// Mean update time rounded to the whole second (ties to even).
/// Averaging across machines is meaningless, so "All Computers" is N/A.
pub fn representative_timestamp(rows: &[DiskRow], selection: &Selection) -> RepresentativeTimestamp {
    if rows.is_empty() || *selection == Selection::AllComputers {
        return RepresentativeTimestamp::NotApplicable;
    }

    let stamps: Vec<i128> = rows
        .iter()
        .filter_map(|r| r.updated_at)
        .filter_map(|t| t.and_utc().timestamp_nanos_opt())
        .map(i128::from)
        .collect();
    if stamps.is_empty() {
        return RepresentativeTimestamp::Unknown;
    }

    let mean_ns = stamps.iter().sum::<i128>() / stamps.len() as i128;
    match from_nanos(round_to_second(mean_ns)) {
        Some(t) => RepresentativeTimestamp::At(t),
        None    => RepresentativeTimestamp::Unknown,
    }
}

/// `["All Computers", <computers in first-seen order>...]`
pub fn selection_options(rows: &[DiskRow]) -> Vec<String> {
    let mut out = vec![ALL_COMPUTERS.to_string()];
    for r in rows {
        if !out[1..].iter().any(|c| c == &r.computer) {
            out.push(r.computer.clone());
        }
    }
    out
}

const NANOS_PER_SEC: i128 = 1_000_000_000;

fn round_to_second(ns: i128) -> i128 {
    let secs = ns.div_euclid(NANOS_PER_SEC);
    let rem  = ns.rem_euclid(NANOS_PER_SEC);
    let up = match (rem * 2).cmp(&NANOS_PER_SEC) {
        Ordering::Greater => true,
        Ordering::Less    => false,
        Ordering::Equal   => secs % 2 != 0,
    };
    (secs + i128::from(up)) * NANOS_PER_SEC
}

fn from_nanos(ns: i128) -> Option<NaiveDateTime> {
    let ns = i64::try_from(ns).ok()?;
    Some(DateTime::<Utc>::from_timestamp_nanos(ns).naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::disk::UsageRatio;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32, milli: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_milli_opt(h, m, s, milli).unwrap()
    }

    fn row(computer: &str, drive: &str, total: f64, free: f64) -> DiskRow {
        DiskRow::new(computer, drive, total, free, Some(ts(10, 0, 0, 0)))
    }

    #[test]
    fn derive_and_sort_worked_example() {
        let rows = vec![row("C1", "C:", 500.0, 100.0), row("C1", "D:", 1000.0, 1000.0)];
        let derived = derive(rows);
        assert_eq!(derived[0].used_space_gb, 400.0);
        assert_eq!(derived[0].percentage_used, UsageRatio::Ratio(0.8));
        assert_eq!(derived[1].used_space_gb, 0.0);
        assert_eq!(derived[1].percentage_used, UsageRatio::Ratio(0.0));

        let sorted = sort_by_free_space_ascending(derived);
        let drives: Vec<&str> = sorted.iter().map(|d| d.row.drive.as_str()).collect();
        assert_eq!(drives, ["C:", "D:"]);
    }

    #[test]
    fn used_is_total_minus_free_for_every_row() {
        let rows = vec![
            row("A", "C:", 931.51, 12.07),
            row("A", "D:", 0.0, 0.0),
            row("B", "C:", 100.0, 250.0),
            row("B", "E:", 1e6, 0.5),
        ];
        for d in derive(rows) {
            assert_eq!(d.used_space_gb, d.row.total_size_gb - d.row.free_space_gb);
            if d.row.total_size_gb > 0.0 {
                assert_eq!(d.percentage_used, UsageRatio::Ratio(d.used_space_gb / d.row.total_size_gb));
            }
        }
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let rows = vec![
            row("A", "C:", 100.0, 50.0),
            row("A", "D:", 100.0, 10.0),
            row("A", "E:", 200.0, 50.0),
            row("A", "F:", 300.0, 50.0),
        ];
        let sorted = sort_by_free_space_ascending(derive(rows));
        let drives: Vec<&str> = sorted.iter().map(|d| d.row.drive.as_str()).collect();
        assert_eq!(drives, ["D:", "C:", "E:", "F:"]);

        let zeros = vec![row("A", "C:", 100.0, 0.0), row("A", "D:", 100.0, -0.0)];
        let sorted = sort_by_free_space_ascending(derive(zeros));
        let drives: Vec<&str> = sorted.iter().map(|d| d.row.drive.as_str()).collect();
        assert_eq!(drives, ["C:", "D:"]);
    }

    #[test]
    fn filter_by_computer_or_all() {
        let rows = vec![row("A", "C:", 1.0, 1.0), row("B", "C:", 1.0, 1.0), row("A", "D:", 1.0, 1.0)];
        assert_eq!(filter(&rows, &Selection::AllComputers), rows);
        let only_a = filter(&rows, &Selection::Computer("A".into()));
        assert_eq!(only_a.len(), 2);
        assert!(only_a.iter().all(|r| r.computer == "A"));
        assert!(filter(&rows, &Selection::Computer("Z".into())).is_empty());
    }

    #[test]
    fn chart_series_has_two_points_per_row_summing_to_total() {
        let rows = vec![row("A", "C:", 500.0, 100.0), row("A", "D:", 1000.0, 1000.0), row("B", "C:", 10.0, 20.0)];
        let derived = derive(rows);
        let points = to_chart_series(&derived);
        assert_eq!(points.len(), 2 * derived.len());
        assert_eq!(points[0].space_type, SpaceType::Used);
        assert_eq!(points[1].space_type, SpaceType::Free);

        for d in &derived {
            let sum: f64 = points
                .iter()
                .filter(|p| p.key() == (d.row.computer.as_str(), d.row.drive.as_str()))
                .map(|p| p.value_gb)
                .sum();
            assert_eq!(sum, d.row.total_size_gb);
        }
    }

    #[test]
    fn same_drive_letter_on_two_machines_is_not_merged() {
        let rows = vec![row("SRV01", "C:", 100.0, 40.0), row("SRV02", "C:", 200.0, 50.0)];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::AllComputers);

        assert_eq!(report.timestamp, RepresentativeTimestamp::NotApplicable);
        assert_eq!(report.last_updated, "N/A");

        let bars = stack_chart(&report.chart);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label(), "SRV01 C:");
        assert_eq!(bars[0].total_gb(), 100.0);
        assert_eq!(bars[1].label(), "SRV02 C:");
        assert_eq!(bars[1].total_gb(), 200.0);
    }

    #[test]
    fn duplicate_rows_for_one_drive_are_summed() {
        let rows = vec![row("A", "C:", 100.0, 40.0), row("A", "C:", 100.0, 30.0)];
        let bars = stack_chart(&to_chart_series(&derive(rows)));
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].used_gb, 130.0);
        assert_eq!(bars[0].free_gb, 70.0);
    }

    #[test]
    fn bar_index_follows_merged_bars() {
        let rows = vec![
            row("A", "C:", 100.0, 40.0),
            row("B", "C:", 100.0, 10.0),
            row("A", "C:", 100.0, 30.0),
        ];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::AllComputers);
        assert_eq!(stack_chart(&report.chart).len(), 2);
        assert_eq!(report.bar_index(0), Some(0));
        assert_eq!(report.bar_index(1), Some(1));
        assert_eq!(report.bar_index(2), Some(1));
        assert_eq!(report.bar_index(3), None);
    }

    #[test]
    fn zero_total_renders_placeholder() {
        let rows = vec![row("A", "Z:", 0.0, 0.0)];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::Computer("A".into()));
        assert_eq!(report.rows[0].percentage_used, UsageRatio::Undefined);
        assert_eq!(report.summary[0].percentage_used, "N/A");
        assert_eq!(report.summary[0].total_size, "0.00 GB");
    }

    #[test]
    fn summary_formats_columns() {
        let rows = vec![row("A", "C:", 1863.0149, 412.5)];
        let summary = DiskSpaceReportBuilder::default().format_summary(&derive(rows));
        assert_eq!(summary[0].total_size, "1,863.01 GB");
        assert_eq!(summary[0].free_space, "412.50 GB");
        assert_eq!(summary[0].used_space, "1,450.51 GB");
        assert_eq!(summary[0].percentage_used, "77.86%");
    }

    #[test]
    fn slight_overreport_of_free_space_formats_as_zero_used() {
        let rows = vec![row("A", "C:", 100.0, 100.001)];
        let derived = derive(rows);
        assert!(derived[0].used_space_gb < 0.0);
        let summary = DiskSpaceReportBuilder::default().format_summary(&derived);
        assert_eq!(summary[0].used_space, "0.00 GB");
        assert_eq!(summary[0].free_space, "100.00 GB");
        assert_eq!(summary[0].percentage_used, "0.00%");
    }

    #[test]
    fn custom_placeholder_is_used() {
        let builder = DiskSpaceReportBuilder::new("n/a", DEFAULT_TIMESTAMP_FORMAT);
        let summary = builder.format_summary(&derive(vec![row("A", "C:", 0.0, 1.0)]));
        assert_eq!(summary[0].percentage_used, "n/a");
    }

    #[test]
    fn timestamp_is_rounded_mean_for_single_computer() {
        let rows = vec![
            DiskRow::new("A", "C:", 1.0, 1.0, Some(ts(10, 0, 0, 0))),
            DiskRow::new("A", "D:", 1.0, 1.0, Some(ts(10, 0, 3, 0))),
        ];
        // mean 10:00:01.5 -> ties to even -> 10:00:02
        assert_eq!(
            representative_timestamp(&rows, &Selection::Computer("A".into())),
            RepresentativeTimestamp::At(ts(10, 0, 2, 0))
        );

        let rows = vec![
            DiskRow::new("A", "C:", 1.0, 1.0, Some(ts(10, 0, 0, 0))),
            DiskRow::new("A", "D:", 1.0, 1.0, Some(ts(10, 0, 5, 0))),
        ];
        // mean 10:00:02.5 -> ties to even -> 10:00:02
        assert_eq!(
            representative_timestamp(&rows, &Selection::Computer("A".into())),
            RepresentativeTimestamp::At(ts(10, 0, 2, 0))
        );

        let rows = vec![DiskRow::new("A", "C:", 1.0, 1.0, Some(ts(10, 0, 0, 600)))];
        assert_eq!(
            representative_timestamp(&rows, &Selection::Computer("A".into())),
            RepresentativeTimestamp::At(ts(10, 0, 1, 0))
        );
    }

    #[test]
    fn timestamp_sentinels() {
        let sel = Selection::Computer("A".into());
        assert_eq!(representative_timestamp(&[], &sel), RepresentativeTimestamp::NotApplicable);

        let unknown = vec![DiskRow::new("A", "C:", 1.0, 1.0, None)];
        assert_eq!(representative_timestamp(&unknown, &sel), RepresentativeTimestamp::Unknown);

        let mixed = vec![
            DiskRow::new("A", "C:", 1.0, 1.0, None),
            DiskRow::new("A", "D:", 1.0, 1.0, Some(ts(9, 30, 0, 0))),
        ];
        assert_eq!(
            representative_timestamp(&mixed, &sel),
            RepresentativeTimestamp::At(ts(9, 30, 0, 0))
        );
    }

    #[test]
    fn build_for_single_computer_sets_title() {
        let rows = vec![row("A", "C:", 500.0, 100.0), row("B", "C:", 10.0, 1.0)];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::Computer("A".into()));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.last_updated, "01/03-2024 10:00:00");
        assert_eq!(report.title, "A - 01/03-2024 10:00:00");
    }

    #[test]
    fn empty_selection_yields_empty_report() {
        let rows = vec![row("A", "C:", 500.0, 100.0)];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::Computer("B".into()));
        assert!(report.is_empty());
        assert!(report.summary.is_empty());
        assert!(report.chart.is_empty());
        assert_eq!(report.timestamp, RepresentativeTimestamp::NotApplicable);
    }

    #[test]
    fn options_list_all_then_computers_in_order() {
        let rows = vec![row("B", "C:", 1.0, 1.0), row("A", "C:", 1.0, 1.0), row("B", "D:", 1.0, 1.0)];
        assert_eq!(selection_options(&rows), ["All Computers", "B", "A"]);
        assert_eq!(selection_options(&[]), ["All Computers"]);
    }

    #[test]
    fn report_serializes_summary_with_column_names() {
        let rows = vec![row("A", "C:", 0.0, 0.0)];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::AllComputers);
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["selection"], "All Computers");
        assert_eq!(v["summary"][0]["PercentageUsed"], "N/A");
        assert!(v["rows"][0]["percentage_used"].is_null());
        assert_eq!(v["chart"][0]["space_type"], "Used");
    }
}
