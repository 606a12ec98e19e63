//! Import subcommands.

use std::path::{Path, PathBuf};

use asr_data::{import_files, import_for_airport, ReportLibrary};
use log::info;

/// Import files in order; a bad file is reported and skipped.
pub async fn run_import(library: &mut ReportLibrary, files: &[PathBuf]) -> anyhow::Result<()> {
    info!("Importing {} files", files.len());
    let summary = import_files(library, files).await;
    for failure in &summary.failures {
        eprintln!("skipped {}: {}", failure.path.display(), failure.reason);
    }
    println!("imported {}, failed {}", summary.imported, summary.failed);
    Ok(())
}

pub async fn run_import_airport(
    library: &mut ReportLibrary,
    file: &Path,
    airport: &str,
) -> anyhow::Result<()> {
    let report = import_for_airport(library, file, airport).await?;
    println!(
        "imported report {} for {} ({})",
        report.id, report.airport, report.date
    );
    Ok(())
}
