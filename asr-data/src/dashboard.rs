//! Monthly per-airport dashboard rows.

use std::collections::BTreeSet;

use asr_core::tally::Tally;
use asr_core::{Report, ReportId};
use serde::Serialize;

/// What the dashboard shows for one airport in the selected month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardCell {
    NoData,
    Report(ReportCell),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCell {
    pub id: ReportId,
    pub inspector: String,
    pub date_range: String,
    pub tally: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub airport: String,
    pub cell: DashboardCell,
}

impl DashboardRow {
    pub fn tally(&self) -> Option<&Tally> {
        match &self.cell {
            DashboardCell::Report(cell) => Some(&cell.tally),
            DashboardCell::NoData => None,
        }
    }
}

/// The report occupying an (airport, year, month) slot.
///
/// Writes keep one report per slot, but older stores may hold several; the
/// highest id (the newest import) is chosen.
pub fn find_report<'a>(
    summaries: &'a [Report],
    airport: &str,
    year: i32,
    month: u32,
) -> Option<&'a Report> {
    summaries
        .iter()
        .filter(|r| r.airport == airport && r.in_month(year, month))
        .max_by_key(|r| r.id)
}

/// One row per airport, in the order given.
pub fn dashboard_rows(
    summaries: &[Report],
    year: i32,
    month: u32,
    airports: &[String],
) -> Vec<DashboardRow> {
    airports
        .iter()
        .map(|airport| {
            let cell = match find_report(summaries, airport, year, month) {
                Some(report) => DashboardCell::Report(ReportCell {
                    id: report.id,
                    inspector: report.inspector.clone(),
                    date_range: report.date_range_label(),
                    tally: Tally::of(report),
                }),
                None => DashboardCell::NoData,
            };
            DashboardRow {
                airport: airport.clone(),
                cell,
            }
        })
        .collect()
}

/// Distinct (year, month) pairs that have at least one report, newest first.
pub fn months_with_data(summaries: &[Report]) -> Vec<(i32, u32)> {
    let months: BTreeSet<(i32, u32)> = summaries
        .iter()
        .filter_map(|r| r.slot().map(|s| (s.year, s.month)))
        .collect();
    months.into_iter().rev().collect()
}
