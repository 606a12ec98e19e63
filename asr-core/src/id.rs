//! Time-based report id generation.

use crate::report::ReportId;

/// Current wall clock in milliseconds since the Unix epoch.
pub fn now_millis() -> ReportId {
    chrono::Utc::now().timestamp_millis()
}

/// Hands out millisecond-clock ids that never repeat within one generator.
///
/// Two imports in the same millisecond get consecutive ids instead of the
/// same one. Call [`IdGenerator::observe`] with ids already in the store so
/// new ids never fall at or below them.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: ReportId,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ReportId {
        let id = now_millis().max(self.last + 1);
        self.last = id;
        id
    }

    pub fn observe(&mut self, id: ReportId) {
        self.last = self.last.max(id);
    }
}
