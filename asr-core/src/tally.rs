use serde::Serialize;

use crate::report::{Report, ReportItem, Status};

/// Per-status item counts for one report.
///
/// `total` is the sum of the five buckets, so items with an unrecognised
/// status appear in none of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub good: u32,
    pub minor: u32,
    pub poor: u32,
    pub critical: u32,
    pub na: u32,
    pub total: u32,
}

impl Tally {
    pub fn from_items(items: &[ReportItem]) -> Self {
        let mut tally = Tally::default();
        for item in items {
            match item.status {
                Status::Good => tally.good += 1,
                Status::Minor => tally.minor += 1,
                Status::Poor => tally.poor += 1,
                Status::Critical => tally.critical += 1,
                Status::NotApplicable => tally.na += 1,
                Status::Unknown(_) => continue,
            }
        }
        tally.total = tally.good + tally.minor + tally.poor + tally.critical + tally.na;
        tally
    }

    pub fn of(report: &Report) -> Self {
        Self::from_items(&report.items)
    }
}
