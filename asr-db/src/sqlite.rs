//! SQLite-backed report store.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use asr_core::{Error, Report, ReportId, Result};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::schema::{self, LEGACY_MIGRATION_KEY, LEGACY_REJECTED_KEY, LEGACY_REPORTS_KEY};
use crate::ReportStore;

/// Report store on a SQLite connection.
///
/// Cheaply cloneable (via `Rc`); clones share one connection, which suits the
/// single-threaded control flow that owns the store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Rc<RefCell<Connection>>,
}

impl SqliteStore {
    /// Open or create a store file, applying the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(Error::storage)?;
            }
        }
        let conn = Connection::open(path).map_err(Error::storage)?;
        info!("store: opened SQLite store at {}", path.display());
        Self::with_connection(conn)
    }

    /// A fresh store that lives only as long as this value.
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(Error::storage)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(schema::create_schema())
            .map_err(Error::storage)?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    fn legacy_value(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .borrow()
            .query_row(
                "SELECT value FROM legacy_kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::storage)
    }

    fn in_transaction<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&Transaction<'_>) -> Result<()>,
    {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction().map_err(Error::storage)?;
        f(&tx)?;
        tx.commit().map_err(Error::storage)
    }
}

fn insert_report(conn: &Connection, report: &Report) -> Result<()> {
    let body = serde_json::to_string(report).map_err(Error::storage)?;
    conn.execute(
        "INSERT OR REPLACE INTO reports (id, airport, date, body) VALUES (?1, ?2, ?3, ?4)",
        params![report.id, report.airport, report.date, body],
    )
    .map_err(Error::storage)?;
    Ok(())
}

fn decode(id: ReportId, body: &str) -> Result<Report> {
    let report: Report = serde_json::from_str(body)
        .map_err(|e| Error::Storage(format!("record {} is unreadable: {}", id, e)))?;
    Ok(report.normalized())
}

impl ReportStore for SqliteStore {
    fn put(&mut self, report: &Report) -> Result<()> {
        insert_report(&self.conn.borrow(), report)?;
        debug!("store: put report {}", report.id);
        Ok(())
    }

    fn get(&self, id: ReportId) -> Result<Option<Report>> {
        let conn = self.conn.borrow();
        let body: Option<String> = conn
            .query_row("SELECT body FROM reports WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Error::storage)?;
        body.map(|b| decode(id, &b)).transpose()
    }

    fn delete(&mut self, id: ReportId) -> Result<()> {
        let removed = self
            .conn
            .borrow()
            .execute("DELETE FROM reports WHERE id = ?1", params![id])
            .map_err(Error::storage)?;
        debug!("store: delete report {} (removed {})", id, removed);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.in_transaction(|tx| {
            tx.execute("DELETE FROM reports", []).map_err(Error::storage)?;
            tx.execute("DELETE FROM legacy_kv", []).map_err(Error::storage)?;
            Ok(())
        })?;
        info!("store: cleared all reports and legacy data");
        Ok(())
    }

    fn list_page(&self, offset: usize, limit: usize) -> Result<Vec<Report>> {
        let conn = self.conn.borrow();
        let mut stmt = conn
            .prepare("SELECT id, body FROM reports ORDER BY id LIMIT ?1 OFFSET ?2")
            .map_err(Error::storage)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], |row| {
                Ok((row.get::<_, ReportId>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(Error::storage)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::storage)?;
        let reports = rows
            .iter()
            .filter_map(|(id, body)| match decode(*id, body) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("store: skipping {}", e);
                    None
                }
            })
            .collect();
        Ok(reports)
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .borrow()
            .query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))
            .map_err(Error::storage)?;
        Ok(count as usize)
    }

    fn replace_slot(&mut self, report: &Report, evicted: &[ReportId]) -> Result<()> {
        self.in_transaction(|tx| {
            for id in evicted.iter().filter(|id| **id != report.id) {
                tx.execute("DELETE FROM reports WHERE id = ?1", params![id])
                    .map_err(Error::storage)?;
            }
            insert_report(tx, report)
        })?;
        debug!("store: put report {} replacing {:?}", report.id, evicted);
        Ok(())
    }

    fn legacy_blob(&self) -> Result<Option<String>> {
        self.legacy_value(LEGACY_REPORTS_KEY)
    }

    fn rejected_legacy(&self) -> Result<Option<String>> {
        self.legacy_value(LEGACY_REJECTED_KEY)
    }

    fn set_legacy_blob(&mut self, json: &str) -> Result<()> {
        self.conn
            .borrow()
            .execute(
                "INSERT OR REPLACE INTO legacy_kv (key, value) VALUES (?1, ?2)",
                params![LEGACY_REPORTS_KEY, json],
            )
            .map_err(Error::storage)?;
        Ok(())
    }

    fn migration_version(&self) -> Result<u32> {
        let value: Option<String> = self
            .conn
            .borrow()
            .query_row(
                "SELECT value FROM schema_meta WHERE key = ?1",
                params![LEGACY_MIGRATION_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::storage)?;
        match value {
            Some(v) => v
                .parse::<u32>()
                .map_err(|_| Error::Storage(format!("bad migration marker '{}'", v))),
            None => Ok(0),
        }
    }

    fn commit_migration(
        &mut self,
        version: u32,
        reports: &[Report],
        rejected: Option<&str>,
    ) -> Result<()> {
        self.in_transaction(|tx| {
            for report in reports {
                insert_report(tx, report)?;
            }
            if let Some(rejected) = rejected {
                tx.execute(
                    "INSERT OR REPLACE INTO legacy_kv (key, value) VALUES (?1, ?2)",
                    params![LEGACY_REJECTED_KEY, rejected],
                )
                .map_err(Error::storage)?;
            }
            tx.execute(
                "DELETE FROM legacy_kv WHERE key = ?1",
                params![LEGACY_REPORTS_KEY],
            )
            .map_err(Error::storage)?;
            tx.execute(
                "INSERT OR REPLACE INTO schema_meta (key, value) VALUES (?1, ?2)",
                params![LEGACY_MIGRATION_KEY, version.to_string()],
            )
            .map_err(Error::storage)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asr_core::{ReportItem, Status};

    fn report(id: ReportId, airport: &str, date: &str) -> Report {
        Report {
            id,
            airport: airport.into(),
            date: date.into(),
            inspector: "Choi".into(),
            items: vec![ReportItem {
                category: "활주로".into(),
                label: "lights".into(),
                status: Status::Good,
                photos: vec!["data:image/png;base64,iVBOR".into()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut store = SqliteStore::in_memory().unwrap();
        let r = report(10, "인천", "2024-03-05");
        store.put(&r).unwrap();
        assert_eq!(store.get(10).unwrap(), Some(r));
    }

    #[test]
    fn put_overwrites() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.put(&report(10, "인천", "2024-03-05")).unwrap();
        let updated = Report {
            inspector: "Jung".into(),
            ..report(10, "인천", "2024-03-05")
        };
        store.put(&updated).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(10).unwrap().unwrap().inspector, "Jung");
    }

    #[test]
    fn get_missing_is_none() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get(99).unwrap(), None);
    }

    #[test]
    fn delete_removes_and_tolerates_absent() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.put(&report(10, "인천", "2024-03-05")).unwrap();
        store.delete(10).unwrap();
        assert_eq!(store.get(10).unwrap(), None);
        store.delete(10).unwrap();
        store.delete(12345).unwrap();
    }

    #[test]
    fn get_promotes_legacy_photo() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .conn
            .borrow()
            .execute(
                "INSERT INTO reports (id, airport, date, body) VALUES (5, '김포', '2024-01-02', ?1)",
                params![r#"{"id":5,"airport":"김포","date":"2024-01-02","items":[{"category":"보안","label":"gate","status":"good","photo":"old.jpg"}]}"#],
            )
            .unwrap();
        let r = store.get(5).unwrap().unwrap();
        assert_eq!(r.items[0].photos, vec!["old.jpg".to_string()]);
        assert!(r.items[0].photo.is_none());
    }

    #[test]
    fn unreadable_row_does_not_hide_others() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.put(&report(1, "인천", "2024-03-05")).unwrap();
        store
            .conn
            .borrow()
            .execute(
                "INSERT INTO reports (id, airport, date, body) VALUES (2, '김포', '', ?1)",
                params![r#"{"airport":"김포"}"#],
            )
            .unwrap();
        store.put(&report(3, "제주", "2024-03-07")).unwrap();

        let ids: Vec<_> = store.list_all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(matches!(store.get(2), Err(Error::Storage(_))));

        store.delete(2).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn list_all_pages_through_everything() {
        let mut store = SqliteStore::in_memory().unwrap();
        for id in 1..=(crate::PAGE_SIZE as i64 * 2 + 3) {
            store.put(&report(id, "인천", "2024-03-05")).unwrap();
        }
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), crate::PAGE_SIZE * 2 + 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn clear_removes_records_and_legacy_blob() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.put(&report(1, "인천", "2024-03-05")).unwrap();
        store.commit_migration(1, &[], Some("[3]")).unwrap();
        store.set_legacy_blob("[]").unwrap();
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.legacy_blob().unwrap(), None);
        assert_eq!(store.rejected_legacy().unwrap(), None);
    }

    #[test]
    fn replace_slot_evicts_and_inserts() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.put(&report(1, "인천", "2024-03-05")).unwrap();
        store.put(&report(2, "김포", "2024-03-06")).unwrap();
        store
            .replace_slot(&report(3, "인천", "2024-03-20"), &[1])
            .unwrap();
        assert_eq!(store.get(1).unwrap(), None);
        assert!(store.get(2).unwrap().is_some());
        assert!(store.get(3).unwrap().is_some());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reports.sqlite3");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.put(&report(7, "제주", "2024-06-01")).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get(7).unwrap().unwrap().airport, "제주");
    }

    #[test]
    fn migration_version_defaults_to_zero() {
        let mut store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.migration_version().unwrap(), 0);
        store.commit_migration(1, &[], None).unwrap();
        assert_eq!(store.migration_version().unwrap(), 1);
    }
}
