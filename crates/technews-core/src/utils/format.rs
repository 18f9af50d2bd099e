use chrono::{DateTime, NaiveDate};

/// Characters kept by `excerpt`
const EXCERPT_LENGTH: usize = 150;

/// Average reading speed used by `read_time`
const WORDS_PER_MINUTE: usize = 200;

/// Short preview of post content: the first 150 characters followed by
/// "...", or the whole text when it is shorter.
pub fn excerpt(content: &str) -> String {
    if content.chars().count() < EXCERPT_LENGTH {
        content.to_string()
    } else {
        let head: String = content.chars().take(EXCERPT_LENGTH).collect();
        format!("{}...", head)
    }
}

/// Format a server timestamp as e.g. "October 19, 2026".
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates. Missing input
/// yields an empty string; anything unparseable is returned unchanged.
pub fn format_date(date: Option<&str>) -> String {
    let date = match date.map(str::trim) {
        Some(d) if !d.is_empty() => d,
        _ => return String::new(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        dt.format("%B %-d, %Y").to_string()
    } else if let Ok(day) = NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d") {
        day.format("%B %-d, %Y").to_string()
    } else {
        date.to_string()
    }
}

/// Estimated reading time in whole minutes, never less than one.
pub fn read_time(content: &str) -> usize {
    let words = content.split_whitespace().count().max(1);
    words.div_ceil(WORDS_PER_MINUTE)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
