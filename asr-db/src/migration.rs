//! One-time move of the legacy single-array store into per-record storage.
//!
//! The migration is versioned: once [`LEGACY_MIGRATION_VERSION`] is recorded
//! in the store it never runs again. The marker, the migrated records and the
//! removal of the legacy array are committed together, so a failure part way
//! leaves the legacy data where it was and the next startup retries.
//!
//! Entries that cannot be read as reports are not dropped: they are kept,
//! unchanged, under a separate legacy key for manual recovery.

use std::collections::HashSet;

use asr_core::id::now_millis;
use asr_core::{Error, Report, ReportId, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::ReportStore;

pub const LEGACY_MIGRATION_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    AlreadyApplied,
    NothingToMigrate,
    Migrated { reports: usize, skipped: usize },
}

/// Run the legacy migration if it has not been applied yet.
pub fn run_legacy_migration<S>(store: &mut S) -> Result<MigrationOutcome>
where
    S: ReportStore + ?Sized,
{
    if store.migration_version()? >= LEGACY_MIGRATION_VERSION {
        return Ok(MigrationOutcome::AlreadyApplied);
    }

    let blob = store.legacy_blob()?;
    let entries = match blob.as_deref().map(str::trim) {
        None | Some("") => Vec::new(),
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            _ => {
                return Err(Error::Parse(
                    "legacy report store is not a JSON array".to_string(),
                ))
            }
        },
    };

    if entries.is_empty() {
        store.commit_migration(LEGACY_MIGRATION_VERSION, &[], None)?;
        debug!("migration: no legacy reports");
        return Ok(MigrationOutcome::NothingToMigrate);
    }

    let (reports, rejected) = legacy_reports(entries, now_millis());
    let skipped = rejected.len();
    let kept = if rejected.is_empty() {
        None
    } else {
        Some(merge_rejected(store.rejected_legacy()?, rejected)?)
    };
    store.commit_migration(LEGACY_MIGRATION_VERSION, &reports, kept.as_deref())?;
    info!(
        "migration: moved {} legacy reports into the record store ({} kept aside)",
        reports.len(),
        skipped
    );
    Ok(MigrationOutcome::Migrated {
        reports: reports.len(),
        skipped,
    })
}

/// Convert legacy entries to reports.
///
/// Entries without a usable integer id, or whose id repeats one already
/// taken, get the first free id from `base + index` upwards. Entries that do
/// not read as reports are returned unchanged in the second list.
fn legacy_reports(entries: Vec<Value>, base: ReportId) -> (Vec<Report>, Vec<Value>) {
    let mut seen = HashSet::new();
    let mut reports = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let mut object = match entry {
            Value::Object(object) => object,
            other => {
                warn!("migration: setting aside non-object legacy entry {}", index);
                rejected.push(other);
                continue;
            }
        };
        let raw_id = object.remove("id");
        let entry = Value::Object(object);

        match Report::deserialize(&entry) {
            Ok(mut report) => {
                let mut id = raw_id
                    .as_ref()
                    .and_then(integral_id)
                    .filter(|id| !seen.contains(id))
                    .unwrap_or(base + index as ReportId);
                while seen.contains(&id) {
                    id += 1;
                }
                report.id = id;
                report.normalize();
                seen.insert(id);
                reports.push(report);
            }
            Err(e) => {
                warn!("migration: setting aside legacy entry {}: {}", index, e);
                let mut entry = entry;
                if let (Value::Object(object), Some(raw_id)) = (&mut entry, raw_id) {
                    object.insert("id".to_string(), raw_id);
                }
                rejected.push(entry);
            }
        }
    }
    (reports, rejected)
}

/// Append newly rejected entries to any kept from an earlier run.
fn merge_rejected(previous: Option<String>, rejected: Vec<Value>) -> Result<String> {
    let mut all = match previous.as_deref().map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Array(entries))) => entries,
        Some(Ok(other)) => vec![other],
        Some(Err(e)) => return Err(Error::Parse(format!("kept legacy entries: {}", e))),
        None => Vec::new(),
    };
    all.extend(rejected);
    Ok(serde_json::to_string(&all)?)
}

fn integral_id(value: &Value) -> Option<ReportId> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
        .map(|f| f as ReportId)
}
