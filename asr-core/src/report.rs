use std::collections::BTreeMap;
use std::fmt;

use asr_utils::dates::{format_date_range, parse_date, year_month};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a stored report. Assigned at import from the millisecond clock.
pub type ReportId = i64;

/// Result of one checklist item.
///
/// Wire values are `good`, `minor`, `poor`, `critical` and `na`. Anything
/// else is kept verbatim in `Unknown` so it round-trips through the store;
/// tallies skip it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Good,
    Minor,
    Poor,
    Critical,
    NotApplicable,
    Unknown(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Good => "good",
            Status::Minor => "minor",
            Status::Poor => "poor",
            Status::Critical => "critical",
            Status::NotApplicable => "na",
            Status::Unknown(s) => s.as_str(),
        }
    }

    /// Korean display label used in exports.
    pub fn label(&self) -> &str {
        match self {
            Status::Good => "양호",
            Status::Minor => "경미",
            Status::Poor => "불량",
            Status::Critical => "긴급",
            Status::NotApplicable => "해당없음",
            Status::Unknown(s) => s.as_str(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown(String::new())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Status::Good,
            "minor" => Status::Minor,
            "poor" => Status::Poor,
            "critical" => Status::Critical,
            "na" | "n/a" | "not-applicable" => Status::NotApplicable,
            _ => Status::Unknown(s),
        }
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        match s {
            Status::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One checklist entry within a report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportItem {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opinion: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    /// Deprecated single image. Folded into `photos` by [`ReportItem::normalize`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportItem {
    /// Promote a legacy `photo` into `photos` and drop the legacy field.
    ///
    /// Idempotent. When both are present `photos` wins.
    pub fn normalize(&mut self) {
        if let Some(photo) = self.photo.take() {
            if self.photos.is_empty() && !photo.is_empty() {
                self.photos.push(photo);
            }
        }
    }
}

/// One inspection submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub id: ReportId,
    pub airport: String,
    pub date: String,
    #[serde(default)]
    pub inspector: String,
    #[serde(default)]
    pub items: Vec<ReportItem>,
    /// Per-category inspection dates overriding `date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_dates: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The (airport, year, month) cell a report occupies on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub airport: String,
    pub year: i32,
    pub month: u32,
}

impl Report {
    /// Apply legacy field normalization to every item.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn normalize(&mut self) {
        self.items.iter_mut().for_each(ReportItem::normalize);
    }

    /// Dashboard slot, or `None` when `date` does not parse.
    pub fn slot(&self) -> Option<Slot> {
        year_month(&self.date).map(|(year, month)| Slot {
            airport: self.airport.clone(),
            year,
            month,
        })
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        year_month(&self.date) == Some((year, month))
    }

    /// Display label for the inspection period.
    ///
    /// Spans the primary date and every category date. Unparseable dates
    /// are ignored; if none parse the raw `date` is returned.
    pub fn date_range_label(&self) -> String {
        let category_dates = self.category_dates.iter().flat_map(|m| m.values());
        let dates = std::iter::once(&self.date)
            .chain(category_dates)
            .filter_map(|d| parse_date(d).ok());
        format_date_range(dates).unwrap_or_else(|| self.date.clone())
    }

    pub fn photo_count(&self) -> usize {
        self.items.iter().map(|i| i.photos.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parses_known_and_keeps_unknown() {
        assert_eq!(Status::from("good".to_string()), Status::Good);
        assert_eq!(Status::from("N/A".to_string()), Status::NotApplicable);
        assert_eq!(
            Status::from("not-applicable".to_string()),
            Status::NotApplicable
        );
        assert_eq!(
            Status::from("excellent".to_string()),
            Status::Unknown("excellent".to_string())
        );
        assert_eq!(String::from(Status::Unknown("excellent".into())), "excellent");
        assert_eq!(String::from(Status::NotApplicable), "na");
    }

    #[test]
    fn deserialize_preserves_extra_fields() {
        let value = json!({
            "id": 7,
            "airport": "김포",
            "date": "2024-03-05",
            "inspector": "Kim",
            "weather": "clear",
            "items": [
                {"category": "활주로", "label": "crack", "status": "minor", "note": 1}
            ]
        });
        let report: Report = serde_json::from_value(value).unwrap();
        assert_eq!(report.extra.get("weather"), Some(&json!("clear")));
        assert_eq!(report.items[0].extra.get("note"), Some(&json!(1)));

        let back = serde_json::to_value(&report).unwrap();
        assert_eq!(back["weather"], json!("clear"));
        assert_eq!(back["items"][0]["note"], json!(1));
        assert!(back.get("categoryDates").is_none());
    }

    #[test]
    fn category_dates_use_camel_case() {
        let value = json!({
            "airport": "김포",
            "date": "2024-03-05",
            "items": [],
            "categoryDates": {"활주로": "2024-03-09"}
        });
        let report: Report = serde_json::from_value(value).unwrap();
        let dates = report.category_dates.as_ref().unwrap();
        assert_eq!(dates.get("활주로").map(String::as_str), Some("2024-03-09"));
    }

    #[test]
    fn legacy_photo_is_promoted_once() {
        let mut item = ReportItem {
            photo: Some("data:image/png;base64,AAA".into()),
            ..Default::default()
        };
        item.normalize();
        assert_eq!(item.photos, vec!["data:image/png;base64,AAA".to_string()]);
        assert!(item.photo.is_none());

        let before = item.clone();
        item.normalize();
        assert_eq!(item, before);
    }

    #[test]
    fn legacy_photo_does_not_override_photos() {
        let mut item = ReportItem {
            photos: vec!["a.png".into()],
            photo: Some("b.png".into()),
            ..Default::default()
        };
        item.normalize();
        assert_eq!(item.photos, vec!["a.png".to_string()]);
        assert!(item.photo.is_none());
    }

    #[test]
    fn slot_from_date() {
        let report = Report {
            airport: "인천".into(),
            date: "2024-03-05".into(),
            ..Default::default()
        };
        assert_eq!(
            report.slot(),
            Some(Slot {
                airport: "인천".into(),
                year: 2024,
                month: 3
            })
        );
        assert!(report.in_month(2024, 3));
        assert!(!report.in_month(2024, 4));

        let undated = Report {
            date: "someday".into(),
            ..report
        };
        assert!(undated.slot().is_none());
    }

    #[test]
    fn date_range_label_spans_category_dates() {
        let mut report = Report {
            date: "2024-03-05".into(),
            ..Default::default()
        };
        assert_eq!(report.date_range_label(), "24.03.05");

        report.category_dates = Some(BTreeMap::from([
            ("A".to_string(), "2024-03-05".to_string()),
            ("B".to_string(), "2024-03-09".to_string()),
        ]));
        assert_eq!(report.date_range_label(), "24.03.05~09");

        report.category_dates = Some(BTreeMap::from([(
            "A".to_string(),
            "2024-02-20".to_string(),
        )]));
        assert_eq!(report.date_range_label(), "24.02.20~03.05");
    }

    #[test]
    fn date_range_label_falls_back_to_raw_date() {
        let report = Report {
            date: "March".into(),
            ..Default::default()
        };
        assert_eq!(report.date_range_label(), "March");
    }
}
