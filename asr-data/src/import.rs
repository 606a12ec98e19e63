//! Bulk and single-airport import of report files.
//!
//! Files are handled strictly one at a time: each is read, parsed and
//! written to the store before the next one is opened. A batch therefore
//! never holds more than one full report (photos included) in memory.

use std::path::{Path, PathBuf};

use asr_core::import::{parse_report, validate_airport};
use asr_core::{Error, Report, Result};
use log::{info, warn};
use serde::Serialize;

use crate::library::ReportLibrary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    pub failures: Vec<ImportFailure>,
}

async fn read_report(path: &Path, library: &mut ReportLibrary) -> Result<Report> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Parse(format!("could not read {}: {}", path.display(), e)))?;
    parse_report(&raw, library.id_generator())
}

/// Import every file; failures are counted and the batch carries on.
pub async fn import_files<P>(library: &mut ReportLibrary, paths: &[P]) -> ImportSummary
where
    P: AsRef<Path>,
{
    let mut summary = ImportSummary::default();
    for path in paths {
        let path = path.as_ref();
        let outcome = match read_report(path, library).await {
            Ok(report) => library.upsert(report).map(|_| ()),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                warn!("import: skipping {}: {}", path.display(), e);
                summary.failed += 1;
                summary.failures.push(ImportFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }
    info!(
        "import: {} imported, {} failed",
        summary.imported, summary.failed
    );
    summary
}

/// Import one file into a specific airport's slot.
///
/// The file must name `airport`; on any error nothing is written.
pub async fn import_for_airport(
    library: &mut ReportLibrary,
    path: impl AsRef<Path>,
    airport: &str,
) -> Result<Report> {
    let report = read_report(path.as_ref(), library).await?;
    validate_airport(&report, airport)?;
    library.upsert(report.clone())?;
    Ok(report)
}
