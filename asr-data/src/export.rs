//! HTML and CSV exports with deterministic filenames.
//!
//! HTML documents are self-contained: styles are inlined and photos are
//! referenced exactly as stored (usually data URIs).

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use asr_core::tally::Tally;
use asr_core::{Error, Report, Result};
use asr_utils::dates::{format_date, parse_date};
use log::info;

use crate::dashboard::{DashboardCell, DashboardRow};

const STYLE: &str = "body{font-family:sans-serif;margin:24px}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #999;padding:4px 8px;text-align:left}\
th{background:#eee}\
.good{color:#1a7f37}.minor{color:#9a6700}.poor{color:#bc4c00}.critical{color:#cf222e}.na{color:#666}\
img{max-width:240px;margin:2px}";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

fn tally_cells(tally: &Tally) -> String {
    format!(
        "<td class=\"good\">{}</td><td class=\"minor\">{}</td><td class=\"poor\">{}</td><td class=\"critical\">{}</td><td class=\"na\">{}</td><td>{}</td>",
        tally.good, tally.minor, tally.poor, tally.critical, tally.na, tally.total
    )
}

const TALLY_HEADERS: &str =
    "<th>양호</th><th>경미</th><th>불량</th><th>긴급</th><th>해당없음</th><th>합계</th>";

/// Full report as a standalone HTML document.
pub fn report_html(report: &Report) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{} 안전점검 보고서</h1>\n<p>점검일: {} / 점검자: {}</p>",
        escape(&report.airport),
        escape(&report.date_range_label()),
        escape(&report.inspector)
    );
    let _ = writeln!(
        body,
        "<table><tr>{}</tr><tr>{}</tr></table>",
        TALLY_HEADERS,
        tally_cells(&Tally::of(report))
    );
    body.push_str("<table>\n<tr><th>구분</th><th>점검항목</th><th>상태</th><th>의견</th><th>사진</th></tr>\n");
    for item in &report.items {
        let photos: String = item
            .photos
            .iter()
            .map(|p| format!("<img src=\"{}\" alt=\"\">", escape(p)))
            .collect();
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>",
            escape(&item.category),
            escape(&item.label),
            escape(item.status.as_str()),
            escape(item.status.label()),
            escape(item.opinion.as_deref().unwrap_or("")),
            photos
        );
    }
    body.push_str("</table>\n");
    document(&format!("{} {}", report.airport, report.date), &body)
}

/// Monthly dashboard table as a standalone HTML document.
pub fn dashboard_html(rows: &[DashboardRow], year: i32, month: u32) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}년 {}월 공항별 안전점검 현황</h1>", year, month);
    let _ = writeln!(
        body,
        "<table>\n<tr><th>공항</th><th>점검기간</th><th>점검자</th>{}</tr>",
        TALLY_HEADERS
    );
    for row in rows {
        match &row.cell {
            DashboardCell::Report(cell) => {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td>{}</td>{}</tr>",
                    escape(&row.airport),
                    escape(&cell.date_range),
                    escape(&cell.inspector),
                    tally_cells(&cell.tally)
                );
            }
            DashboardCell::NoData => {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td colspan=\"8\">자료 없음</td></tr>",
                    escape(&row.airport)
                );
            }
        }
    }
    body.push_str("</table>\n");
    document(&format!("dashboard {}-{:02}", year, month), &body)
}

/// Dashboard rows as CSV, one line per airport.
pub fn dashboard_csv(rows: &[DashboardRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "airport", "report_id", "date_range", "inspector", "good", "minor", "poor", "critical",
        "na", "total",
    ])
    .map_err(Error::export)?;
    for row in rows {
        let record = match &row.cell {
            DashboardCell::Report(cell) => vec![
                row.airport.clone(),
                cell.id.to_string(),
                cell.date_range.clone(),
                cell.inspector.clone(),
                cell.tally.good.to_string(),
                cell.tally.minor.to_string(),
                cell.tally.poor.to_string(),
                cell.tally.critical.to_string(),
                cell.tally.na.to_string(),
                cell.tally.total.to_string(),
            ],
            DashboardCell::NoData => {
                let mut r = vec![row.airport.clone()];
                r.resize(10, String::new());
                r
            }
        };
        wtr.write_record(&record).map_err(Error::export)?;
    }
    let bytes = wtr.into_inner().map_err(Error::export)?;
    String::from_utf8(bytes).map_err(Error::export)
}

fn safe_component(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// `{airport}_{YYYY-MM-DD}_inspection.html`
pub fn report_filename(report: &Report) -> String {
    let date = parse_date(&report.date)
        .map(|d| format_date(&d))
        .unwrap_or_else(|_| safe_component(&report.date));
    format!("{}_{}_inspection.html", safe_component(&report.airport), date)
}

/// `dashboard_{YYYY}-{MM}.{ext}`
pub fn dashboard_filename(year: i32, month: u32, ext: &str) -> String {
    format!("dashboard_{}-{:02}.{}", year, month, ext)
}

/// Write an export to `dir/filename`.
///
/// Goes through a temp file so a failed export leaves no partial output.
pub fn write_export(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(Error::export)?;
    let target = dir.join(filename);
    let tmp = dir.join(format!(".{}.partial", filename));
    let written = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, &target));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Export(format!(
            "could not write {}: {}",
            target.display(),
            e
        )));
    }
    info!("export: wrote {}", target.display());
    Ok(target)
}
