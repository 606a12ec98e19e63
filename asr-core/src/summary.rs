//! Lightweight listing projection of a report.

use crate::report::{Report, ReportItem};

/// Strip every photo payload from a report.
///
/// Item order, statuses, opinions, category dates and extra fields are kept
/// as they are. Detail and export paths must read the full record instead.
pub fn summarize(report: &Report) -> Report {
    Report {
        items: report.items.iter().map(summarize_item).collect(),
        ..report.clone()
    }
}

fn summarize_item(item: &ReportItem) -> ReportItem {
    ReportItem {
        photos: Vec::new(),
        photo: None,
        ..item.clone()
    }
}
