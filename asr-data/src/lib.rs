//! Dashboard aggregation, application state, import and export.
//!
//! [`ReportLibrary`](library::ReportLibrary) owns the record store and the
//! in-memory summary list. Everything else in this crate reads from it:
//! the monthly dashboard, the bulk and single-airport importers, and the
//! HTML/CSV exporters.

pub mod dashboard;
pub mod export;
pub mod import;
pub mod library;

pub use dashboard::{dashboard_rows, DashboardCell, DashboardRow, ReportCell};
pub use import::{import_files, import_for_airport, ImportSummary};
pub use library::ReportLibrary;
