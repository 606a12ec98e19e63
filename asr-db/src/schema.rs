//! SQL schema definitions for the SQLite report store.
//!
//! The schema is applied as a single batch whenever a store is opened.

/// Key under which the legacy single-array representation lives in `legacy_kv`.
pub const LEGACY_REPORTS_KEY: &str = "reports";

/// Key in `legacy_kv` holding legacy entries the migration could not read.
pub const LEGACY_REJECTED_KEY: &str = "reports_rejected";

/// `schema_meta` key recording the last applied legacy migration.
pub const LEGACY_MIGRATION_KEY: &str = "legacy_migration_version";

/// Returns the full SQL schema as a single batch string.
///
/// - `reports` - one row per report; `body` holds the full JSON record,
///   `airport` and `date` are copied out for slot lookups
/// - `legacy_kv` - the deprecated key/value store holding a JSON array of reports,
///   plus any entries a migration had to set aside
/// - `schema_meta` - persisted markers such as the legacy migration version
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS reports (
        id INTEGER PRIMARY KEY,
        airport TEXT NOT NULL,
        date TEXT NOT NULL,
        body TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_reports_airport_date ON reports(airport, date);

    CREATE TABLE IF NOT EXISTS legacy_kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS schema_meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#
}
