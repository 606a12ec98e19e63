//! Listing, dashboard and maintenance subcommands.

use asr_core::tally::Tally;
use asr_data::{DashboardCell, ReportLibrary};

pub const RESET_UNCONFIRMED: &str =
    "reset deletes every stored report; re-run with --yes to confirm";

pub fn run_list(library: &ReportLibrary) -> anyhow::Result<()> {
    for report in library.summaries() {
        let tally = Tally::of(report);
        println!(
            "{}\t{}\t{}\t{}\t{} items, {} critical",
            report.id,
            report.airport,
            report.date_range_label(),
            report.inspector,
            tally.total,
            tally.critical
        );
    }
    Ok(())
}

pub fn run_dashboard(
    library: &ReportLibrary,
    year: i32,
    month: u32,
    json: bool,
) -> anyhow::Result<()> {
    let rows = library.dashboard(year, month);
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("{}-{:02}", year, month);
    println!(
        "{:<10} {:<16} {:>5} {:>5} {:>5} {:>8} {:>5} {:>5}",
        "airport", "period", "good", "minor", "poor", "critical", "na", "total"
    );
    for row in &rows {
        match &row.cell {
            DashboardCell::Report(cell) => {
                let t = &cell.tally;
                println!(
                    "{:<10} {:<16} {:>5} {:>5} {:>5} {:>8} {:>5} {:>5}",
                    row.airport, cell.date_range, t.good, t.minor, t.poor, t.critical, t.na, t.total
                );
            }
            DashboardCell::NoData => println!("{:<10} no data", row.airport),
        }
    }
    Ok(())
}

pub fn run_months(library: &ReportLibrary) -> anyhow::Result<()> {
    for (year, month) in library.months() {
        println!("{}-{:02}", year, month);
    }
    Ok(())
}

pub fn run_show(library: &ReportLibrary, id: i64, json: bool) -> anyhow::Result<()> {
    let report = library.detail(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("{} {} ({})", report.airport, report.date_range_label(), report.inspector);
    for item in &report.items {
        println!(
            "  [{}] {} - {}{}{}",
            item.category,
            item.label,
            item.status.label(),
            item.opinion
                .as_deref()
                .map(|o| format!(": {}", o))
                .unwrap_or_default(),
            if item.photos.is_empty() {
                String::new()
            } else {
                format!(" ({} photos)", item.photos.len())
            }
        );
    }
    Ok(())
}

pub fn run_delete(library: &mut ReportLibrary, id: i64) -> anyhow::Result<()> {
    if library.remove(id)? {
        println!("deleted report {}", id);
    } else {
        println!("report {} was not stored", id);
    }
    Ok(())
}

pub fn run_reset(library: &mut ReportLibrary, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!(RESET_UNCONFIRMED);
    }
    library.reset()?;
    println!("all reports deleted");
    Ok(())
}
