use chrono::{DateTime, NaiveDate};

/// Human-readable rendering used in every response, e.g. `Fri Jan 05 2024`.
pub const DISPLAY_FORMAT: &str = "%a %b %d %Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Parse a calendar date sent by a client.
///
/// Accepts `YYYY-MM-DD`, a full RFC 3339 timestamp (its date part is kept),
/// or the display form produced by [`format_date`].
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(input, DISPLAY_FORMAT).ok())
}
