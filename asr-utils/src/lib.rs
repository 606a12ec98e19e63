//! Shared utility functions for airport safety report crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a NaiveDate as the compact "YY.MM.DD" display form
    pub fn format_short(date: &NaiveDate) -> String {
        date.format("%y.%m.%d").to_string()
    }

    /// Parse an ISO-8601 date string.
    ///
    /// Only the leading "YYYY-MM-DD" part is read, so full timestamps such as
    /// "2024-03-05T09:30:00Z" parse to their calendar date.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        let head = s.get(..10).unwrap_or(s);
        Ok(NaiveDate::parse_from_str(head, "%Y-%m-%d")?)
    }

    /// The (year, month) a date string falls in, if it parses.
    pub fn year_month(s: &str) -> Option<(i32, u32)> {
        parse_date(s).ok().map(|d| (d.year(), d.month()))
    }

    /// Format the span covered by a set of dates.
    ///
    /// - a single distinct date: `24.03.05`
    /// - same month: `24.03.05~09`
    /// - same year, different month: `24.02.20~03.05`
    /// - different year: `23.12.28~24.01.03`
    ///
    /// Returns `None` for an empty input.
    pub fn format_date_range<I>(dates: I) -> Option<String>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

        let start = format_short(&min);
        let formatted = if min == max {
            start
        } else if min.year() != max.year() {
            format!("{}~{}", start, format_short(&max))
        } else if min.month() != max.month() {
            format!("{}~{}", start, max.format("%m.%d"))
        } else {
            format!("{}~{}", start, max.format("%d"))
        };
        Some(formatted)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        }

        #[test]
        fn test_parse_date_plain_and_timestamp() {
            assert_eq!(parse_date("2024-03-05").unwrap(), ymd(2024, 3, 5));
            assert_eq!(parse_date("2024-03-05T09:30:00Z").unwrap(), ymd(2024, 3, 5));
            assert_eq!(parse_date(" 2024-03-05 ").unwrap(), ymd(2024, 3, 5));
            assert!(parse_date("03/05/2024").is_err());
            assert!(parse_date("").is_err());
        }

        #[test]
        fn test_year_month() {
            assert_eq!(year_month("2024-04-30"), Some((2024, 4)));
            assert_eq!(year_month("not a date"), None);
        }

        #[test]
        fn test_format_single_date() {
            let d = ymd(2024, 3, 5);
            assert_eq!(format_date_range([d, d]).unwrap(), "24.03.05");
        }

        #[test]
        fn test_format_same_month_range() {
            let dates = [ymd(2024, 3, 5), ymd(2024, 3, 9), ymd(2024, 3, 5)];
            assert_eq!(format_date_range(dates).unwrap(), "24.03.05~09");
        }

        #[test]
        fn test_format_cross_month_range() {
            let dates = [ymd(2024, 3, 5), ymd(2024, 2, 20)];
            assert_eq!(format_date_range(dates).unwrap(), "24.02.20~03.05");
        }

        #[test]
        fn test_format_cross_year_range() {
            let dates = [ymd(2024, 1, 3), ymd(2023, 12, 28)];
            assert_eq!(format_date_range(dates).unwrap(), "23.12.28~24.01.03");
        }

        #[test]
        fn test_format_empty() {
            assert!(format_date_range(Vec::new()).is_none());
        }

        #[test]
        fn test_format_and_parse() {
            let date = ymd(2023, 6, 15);
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            assert_eq!(parse_date(&formatted).unwrap(), date);
        }
    }
}
