//! Fixed airport and inspection category lists.
//!
//! The order of [`AIRPORTS`] is the dashboard display order. Both lists are
//! advisory: reports naming something outside them are stored and shown
//! with default styling, never rejected.

/// Airports in dashboard display order.
pub const AIRPORTS: [&str; 15] = [
    "인천",
    "김포",
    "김해",
    "제주",
    "대구",
    "청주",
    "광주",
    "무안",
    "양양",
    "여수",
    "울산",
    "포항경주",
    "사천",
    "군산",
    "원주",
];

/// Checklist categories in report display order.
pub const CATEGORIES: [&str; 8] = [
    "활주로",
    "유도로",
    "계류장",
    "항공등화",
    "항행안전시설",
    "소방·구조",
    "보안",
    "야생동물",
];

pub fn is_known_airport(name: &str) -> bool {
    AIRPORTS.contains(&name)
}

pub fn is_known_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

/// Display position of an airport; unknown airports sort last.
pub fn airport_rank(name: &str) -> usize {
    AIRPORTS
        .iter()
        .position(|a| *a == name)
        .unwrap_or(AIRPORTS.len())
}

/// The default dashboard airport list as owned strings.
pub fn default_airports() -> Vec<String> {
    AIRPORTS.iter().map(|a| a.to_string()).collect()
}
