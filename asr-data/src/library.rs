//! Application state: the record store plus its in-memory summary listing.

use asr_core::id::IdGenerator;
use asr_core::summary::summarize;
use asr_core::{Error, Report, ReportId, Result};
use asr_db::{run_legacy_migration, ReportStore};
use log::{debug, error, info};

use crate::dashboard::{dashboard_rows, months_with_data, DashboardRow};

/// Owns the store and the summary list derived from it.
///
/// Summaries are a disposable projection: every mutation goes to the store
/// first and the list is only touched once the store call succeeded, so a
/// storage error leaves the listing exactly as it was.
pub struct ReportLibrary {
    store: Box<dyn ReportStore>,
    summaries: Vec<Report>,
    airports: Vec<String>,
    ids: IdGenerator,
}

impl ReportLibrary {
    /// Run the legacy migration, then load every record.
    ///
    /// A failed migration is logged and startup continues with whatever the
    /// record store already holds; the legacy data stays for the next run.
    pub fn open(mut store: Box<dyn ReportStore>) -> Result<Self> {
        match run_legacy_migration(&mut *store) {
            Ok(outcome) => debug!("library: legacy migration {:?}", outcome),
            Err(e) => error!("library: legacy migration failed, will retry next start: {}", e),
        }
        let mut library = Self {
            store,
            summaries: Vec::new(),
            airports: asr_core::airport::default_airports(),
            ids: IdGenerator::new(),
        };
        library.load()?;
        Ok(library)
    }

    /// Replace the dashboard airport list (and its display order).
    pub fn with_airports(mut self, airports: Vec<String>) -> Self {
        self.airports = airports;
        self
    }

    pub fn airports(&self) -> &[String] {
        &self.airports
    }

    /// Rebuild the summary list from the store.
    pub fn load(&mut self) -> Result<()> {
        let mut summaries: Vec<Report> = self
            .store
            .list_all()?
            .iter()
            .map(summarize)
            .collect();
        sort_for_display(&mut summaries);
        for s in &summaries {
            self.ids.observe(s.id);
        }
        info!("library: loaded {} report summaries", summaries.len());
        self.summaries = summaries;
        Ok(())
    }

    /// Summaries sorted newest date first.
    pub fn summaries(&self) -> &[Report] {
        &self.summaries
    }

    pub fn id_generator(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Store a full report, replacing whatever occupied its slot.
    ///
    /// Returns the ids of reports that were evicted from the slot.
    pub fn upsert(&mut self, report: Report) -> Result<Vec<ReportId>> {
        let report = report.normalized();
        let evicted: Vec<ReportId> = match report.slot() {
            Some(slot) => self
                .summaries
                .iter()
                .filter(|s| s.id != report.id && s.slot().as_ref() == Some(&slot))
                .map(|s| s.id)
                .collect(),
            None => Vec::new(),
        };
        self.store.replace_slot(&report, &evicted)?;

        self.summaries
            .retain(|s| s.id != report.id && !evicted.contains(&s.id));
        self.summaries.push(summarize(&report));
        sort_for_display(&mut self.summaries);
        self.ids.observe(report.id);
        if !evicted.is_empty() {
            info!(
                "library: report {} replaced {:?} for {} {}",
                report.id, evicted, report.airport, report.date
            );
        }
        Ok(evicted)
    }

    /// Delete a report. Returns whether it was listed.
    pub fn remove(&mut self, id: ReportId) -> Result<bool> {
        self.store.delete(id)?;
        let before = self.summaries.len();
        self.summaries.retain(|s| s.id != id);
        Ok(self.summaries.len() != before)
    }

    /// Irreversibly drop every stored and listed report.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        self.summaries.clear();
        info!("library: reset");
        Ok(())
    }

    /// The full record, photos included.
    pub fn detail(&self, id: ReportId) -> Result<Report> {
        self.store.get(id)?.ok_or(Error::NotFound(id))
    }

    pub fn dashboard(&self, year: i32, month: u32) -> Vec<DashboardRow> {
        dashboard_rows(&self.summaries, year, month, &self.airports)
    }

    pub fn months(&self) -> Vec<(i32, u32)> {
        months_with_data(&self.summaries)
    }
}

fn sort_for_display(summaries: &mut [Report]) {
    summaries.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}
