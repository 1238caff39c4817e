//! HTTP cache validation module
//!
//! `Last-Modified` generation and `If-Modified-Since` handling.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Obsolete formats recipients must still accept: RFC 850 and asctime
const OBSOLETE_DATE_FORMATS: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// Parse an HTTP date header value, `None` when it is not a valid date
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    OBSOLETE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Decide whether a conditional GET can be answered with 304
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no
/// entity tags are issued, its presence disables the date comparison.
/// Modification times compare at second precision.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}
