//! Durable storage for airport safety reports.
//!
//! Every report is one record keyed by its id. Two backends implement
//! [`ReportStore`]:
//!
//! - [`SqliteStore`] - a SQLite file (or in-memory database) read lazily,
//!   one page of records at a time
//! - [`JsonFileStore`] - the whole store held in memory and written out to a
//!   single JSON file on every mutation
//!
//! Callers above this crate only see the trait, so the dashboard and the
//! application state never know which backend is active.
//!
//! # Usage
//!
//! ```rust
//! use asr_core::Report;
//! use asr_db::{ReportStore, SqliteStore};
//!
//! let mut store = SqliteStore::in_memory().unwrap();
//! let report = Report { id: 1, airport: "인천".into(), date: "2024-03-05".into(), ..Default::default() };
//! store.put(&report).unwrap();
//! assert_eq!(store.get(1).unwrap(), Some(report));
//! ```
//!
//! # Legacy data
//!
//! Older installs kept all reports as one JSON array under a single key.
//! [`migration::run_legacy_migration`] moves them into per-record storage
//! once and records a version marker so it never runs twice.

pub mod json_file;
pub mod migration;
pub mod schema;
pub mod sqlite;

pub use json_file::JsonFileStore;
pub use migration::{run_legacy_migration, MigrationOutcome, LEGACY_MIGRATION_VERSION};
pub use sqlite::SqliteStore;

use asr_core::{Report, ReportId, Result};

/// Records fetched per round trip by the default [`ReportStore::list_all`].
pub const PAGE_SIZE: usize = 50;

/// Keyed storage of full report records.
///
/// Reads apply legacy field normalization, so callers always see `photos`
/// and never the deprecated `photo` field. Multi-record mutations are atomic.
pub trait ReportStore {
    /// Insert or overwrite the record at `report.id`.
    fn put(&mut self, report: &Report) -> Result<()>;

    /// The full record, or `None` when absent.
    fn get(&self, id: ReportId) -> Result<Option<Report>>;

    /// Remove a record. Absent ids are not an error.
    fn delete(&mut self, id: ReportId) -> Result<()>;

    /// Remove every record and all legacy data in one atomic step.
    fn clear(&mut self) -> Result<()>;

    /// One page of records ordered by id.
    ///
    /// `offset` and `limit` count stored rows; rows that cannot be decoded
    /// are logged and left out, so a page may come back short.
    fn list_page(&self, offset: usize, limit: usize) -> Result<Vec<Report>>;

    fn count(&self) -> Result<usize>;

    /// Atomically delete `evicted` and put `report`.
    fn replace_slot(&mut self, report: &Report, evicted: &[ReportId]) -> Result<()>;

    /// The raw legacy array, if one is still present.
    fn legacy_blob(&self) -> Result<Option<String>>;

    fn set_legacy_blob(&mut self, json: &str) -> Result<()>;

    /// Last legacy migration version applied; 0 when none.
    fn migration_version(&self) -> Result<u32>;

    /// Legacy entries a migration could not read, as a JSON array.
    fn rejected_legacy(&self) -> Result<Option<String>>;

    /// Atomically write `reports`, drop the legacy blob and record `version`.
    ///
    /// `rejected` replaces the kept copy of unreadable legacy entries.
    fn commit_migration(
        &mut self,
        version: u32,
        reports: &[Report],
        rejected: Option<&str>,
    ) -> Result<()>;

    /// Every readable record, in id order.
    fn list_all(&self) -> Result<Vec<Report>> {
        let total = self.count()?;
        let mut all = Vec::with_capacity(total);
        let mut offset = 0;
        while offset < total {
            all.extend(self.list_page(offset, PAGE_SIZE)?);
            offset += PAGE_SIZE;
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asr_core::ReportItem;

    fn with_legacy_photo(id: ReportId) -> Report {
        Report {
            id,
            airport: "광주".into(),
            date: "2024-08-14".into(),
            items: vec![ReportItem {
                category: "항공등화".into(),
                photo: Some("old.jpg".into()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn check_reads_normalize(store: &mut dyn ReportStore) {
        store.put(&with_legacy_photo(1)).unwrap();
        store.replace_slot(&with_legacy_photo(2), &[]).unwrap();

        let got = store.get(1).unwrap().unwrap();
        assert_eq!(got.items[0].photos, vec!["old.jpg".to_string()]);
        assert!(got.items[0].photo.is_none());

        for report in store.list_all().unwrap() {
            assert_eq!(report.items[0].photos, vec!["old.jpg".to_string()]);
            assert!(report.items[0].photo.is_none());
        }
        for report in store.list_page(0, 10).unwrap() {
            assert_eq!(report.items[0].photos, vec!["old.jpg".to_string()]);
        }
    }

    #[test]
    fn sqlite_reads_promote_legacy_photo() {
        let mut store = SqliteStore::in_memory().unwrap();
        check_reads_normalize(&mut store);
    }

    #[test]
    fn json_reads_promote_legacy_photo() {
        let mut store = JsonFileStore::in_memory();
        check_reads_normalize(&mut store);
    }
}
