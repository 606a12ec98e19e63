//! Parsing and validation of uploaded report files.
//!
//! An import file is a JSON object with string `airport`, string `date` and
//! an `items` array. Any `id` in the file is discarded and a fresh one is
//! assigned. Extra fields are carried through untouched.

use log::warn;
use serde_json::{Map, Value};

use crate::airport::is_known_airport;
use crate::error::{Error, Result};
use crate::id::IdGenerator;
use crate::report::Report;

/// Parse one import file into a normalized report with a fresh id.
pub fn parse_report(json: &str, ids: &mut IdGenerator) -> Result<Report> {
    let value: Value = serde_json::from_str(json)?;
    let mut object = match value {
        Value::Object(map) => map,
        _ => return Err(Error::Parse("report must be a JSON object".to_string())),
    };
    require_string(&object, "airport")?;
    require_string(&object, "date")?;
    if !matches!(object.get("items"), Some(Value::Array(_))) {
        return Err(Error::Parse("missing or non-array field 'items'".to_string()));
    }
    object.remove("id");

    let mut report: Report = serde_json::from_value(Value::Object(object))?;
    report.normalize();
    report.id = ids.next_id();

    if !is_known_airport(&report.airport) {
        warn!("Report {} names unlisted airport '{}'", report.id, report.airport);
    }
    Ok(report)
}

fn require_string(object: &Map<String, Value>, field: &str) -> Result<()> {
    match object.get(field) {
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(Error::Parse(format!("field '{}' must be a string", field))),
        None => Err(Error::Parse(format!("missing field '{}'", field))),
    }
}

/// Reject a report whose airport differs from the one being uploaded to.
pub fn validate_airport(report: &Report, target: &str) -> Result<()> {
    if report.airport == target {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "file is a report for '{}', not '{}'",
            report.airport, target
        )))
    }
}
