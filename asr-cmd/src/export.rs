//! Export subcommands.

use std::path::Path;

use asr_data::export::{
    dashboard_csv, dashboard_filename, dashboard_html, report_filename, report_html, write_export,
};
use asr_data::ReportLibrary;

pub fn run_export_report(library: &ReportLibrary, id: i64, out: &Path) -> anyhow::Result<()> {
    let report = library.detail(id)?;
    let path = write_export(out, &report_filename(&report), &report_html(&report))?;
    println!("{}", path.display());
    Ok(())
}

pub fn run_export_dashboard(
    library: &ReportLibrary,
    year: i32,
    month: u32,
    out: &Path,
    csv: bool,
) -> anyhow::Result<()> {
    let rows = library.dashboard(year, month);
    let path = if csv {
        write_export(out, &dashboard_filename(year, month, "csv"), &dashboard_csv(&rows)?)?
    } else {
        write_export(
            out,
            &dashboard_filename(year, month, "html"),
            &dashboard_html(&rows, year, month),
        )?
    };
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use asr_core::{Report, ReportItem, Status};
    use asr_db::JsonFileStore;

    fn library() -> ReportLibrary {
        let mut library = ReportLibrary::open(Box::new(JsonFileStore::in_memory())).unwrap();
        library
            .upsert(Report {
                id: 77,
                airport: "청주".into(),
                date: "2024-09-10".into(),
                items: vec![ReportItem {
                    status: Status::Poor,
                    photos: vec!["data:image/png;base64,QQ".into()],
                    ..Default::default()
                }],
                ..Default::default()
            })
            .unwrap();
        library
    }

    #[test]
    fn export_report_writes_full_record() {
        let dir = tempfile::tempdir().unwrap();
        run_export_report(&library(), 77, dir.path()).unwrap();
        let html =
            std::fs::read_to_string(dir.path().join("청주_2024-09-10_inspection.html")).unwrap();
        assert!(html.contains("data:image/png;base64,QQ"));
    }

    #[test]
    fn export_missing_report_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_export_report(&library(), 1, dir.path()).is_err());
    }

    #[test]
    fn export_dashboard_html_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let lib = library();
        run_export_dashboard(&lib, 2024, 9, dir.path(), false).unwrap();
        run_export_dashboard(&lib, 2024, 9, dir.path(), true).unwrap();
        assert!(dir.path().join("dashboard_2024-09.html").exists());
        let csv = std::fs::read_to_string(dir.path().join("dashboard_2024-09.csv")).unwrap();
        assert!(csv.contains("청주,77,24.09.10,,0,0,1,0,0,1"));
    }
}
