use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::CoreError;

/// Date layouts accepted for both stored observations and queries.
/// Order matters only for readability: the layouts cannot both match the same text.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a date string into a calendar day.
///
/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, and full ISO timestamps such as
/// `2024-03-01T00:00:00Z` (the written calendar day is kept). Two texts that
/// denote the same day always produce the same `NaiveDate`, so comparisons
/// never depend on how the day was written.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidDate("empty date".into()));
    }

    // A time part is accepted only when the whole text is a valid ISO timestamp.
    if trimmed.contains('T') {
        return DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.date_naive())
            .or_else(|_| {
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date())
            })
            .map_err(|_| CoreError::InvalidDate(input.to_string()));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| CoreError::InvalidDate(input.to_string()))
}
