//! Date helper functions

use chrono::NaiveDate;

/// Input layout for front-matter dates
pub const ISO_DATE: &str = "%Y-%m-%d";

/// The single display layout currently rendered
pub const DISPLAY_DATE: &str = "%B %d, %Y";

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, ISO_DATE).ok()
}

/// Re-render an ISO date for display
///
/// Unparseable input is returned unchanged. `_format` is accepted for
/// configuration compatibility but every date renders as `January 02, 2006`.
///
/// # Examples
/// ```ignore
/// format_date("2024-01-05", "%B %d, %Y") // -> "January 05, 2024"
/// ```
pub fn format_date(date: &str, _format: &str) -> String {
    match parse_date(date) {
        Some(d) => d.format(DISPLAY_DATE).to_string(),
        None => date.to_string(),
    }
}

/// Format a date in sitemap `lastmod` form
pub fn date_ymd<Tz: chrono::TimeZone>(date: &chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(ISO_DATE).to_string()
}
