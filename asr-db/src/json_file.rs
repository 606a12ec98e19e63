//! Eager report store persisted as a single JSON file.
//!
//! The whole store lives in memory. Each mutation is applied to a copy,
//! the copy is written to `<file>.tmp` and renamed over the store file, and
//! only then does the copy replace the live state. A failed write therefore
//! leaves both the file and the in-memory state as they were.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use asr_core::{Error, Report, ReportId, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::ReportStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    reports: BTreeMap<ReportId, Report>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    legacy_reports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    legacy_rejected: Option<String>,
    #[serde(default)]
    legacy_migration_version: u32,
}

pub struct JsonFileStore {
    path: Option<PathBuf>,
    state: Snapshot,
}

impl JsonFileStore {
    /// Load the store file, or start empty if it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(Error::storage)?;
            let mut state: Snapshot = serde_json::from_str(&raw).map_err(|e| {
                Error::Storage(format!("store file {} is unreadable: {}", path.display(), e))
            })?;
            state.reports.values_mut().for_each(Report::normalize);
            state
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(Error::storage)?;
                }
            }
            Snapshot::default()
        };
        info!(
            "store: loaded {} reports from {}",
            state.reports.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path),
            state,
        })
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Snapshot::default(),
        }
    }

    fn mutate<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Snapshot),
    {
        let mut next = self.state.clone();
        f(&mut next);
        if let Some(path) = &self.path {
            persist(path, &next)?;
        }
        self.state = next;
        Ok(())
    }
}

fn persist(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let body = serde_json::to_vec(snapshot).map_err(Error::storage)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = fs::write(&tmp, &body).and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Storage(format!(
            "could not write {}: {}",
            path.display(),
            e
        )));
    }
    debug!("store: wrote {} bytes to {}", body.len(), path.display());
    Ok(())
}

impl ReportStore for JsonFileStore {
    fn put(&mut self, report: &Report) -> Result<()> {
        self.mutate(|s| {
            s.reports.insert(report.id, report.clone());
        })
    }

    fn get(&self, id: ReportId) -> Result<Option<Report>> {
        Ok(self.state.reports.get(&id).cloned().map(Report::normalized))
    }

    fn delete(&mut self, id: ReportId) -> Result<()> {
        if !self.state.reports.contains_key(&id) {
            return Ok(());
        }
        self.mutate(|s| {
            s.reports.remove(&id);
        })
    }

    fn clear(&mut self) -> Result<()> {
        self.mutate(|s| {
            s.reports.clear();
            s.legacy_reports = None;
            s.legacy_rejected = None;
        })
    }

    fn list_page(&self, offset: usize, limit: usize) -> Result<Vec<Report>> {
        Ok(self
            .state
            .reports
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .map(Report::normalized)
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.state.reports.len())
    }

    fn replace_slot(&mut self, report: &Report, evicted: &[ReportId]) -> Result<()> {
        self.mutate(|s| {
            for id in evicted {
                s.reports.remove(id);
            }
            s.reports.insert(report.id, report.clone());
        })
    }

    fn legacy_blob(&self) -> Result<Option<String>> {
        Ok(self.state.legacy_reports.clone())
    }

    fn set_legacy_blob(&mut self, json: &str) -> Result<()> {
        self.mutate(|s| s.legacy_reports = Some(json.to_string()))
    }

    fn migration_version(&self) -> Result<u32> {
        Ok(self.state.legacy_migration_version)
    }

    fn rejected_legacy(&self) -> Result<Option<String>> {
        Ok(self.state.legacy_rejected.clone())
    }

    fn commit_migration(
        &mut self,
        version: u32,
        reports: &[Report],
        rejected: Option<&str>,
    ) -> Result<()> {
        self.mutate(|s| {
            for report in reports {
                s.reports.insert(report.id, report.clone());
            }
            if let Some(rejected) = rejected {
                s.legacy_rejected = Some(rejected.to_string());
            }
            s.legacy_reports = None;
            s.legacy_migration_version = version;
        })
    }

    fn list_all(&self) -> Result<Vec<Report>> {
        Ok(self
            .state
            .reports
            .values()
            .cloned()
            .map(Report::normalized)
            .collect())
    }
}
