//! Date header normalization

use chrono::{DateTime, Utc};
use tracing::debug;

/// Parse a `Date:` header value
///
/// Strict RFC 2822 is tried first, then the more lenient parser from
/// `mailparse` that copes with missing weekdays, odd spacing and zone
/// names. Returns `None` when neither understands the input.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    mailparse::dateparse(value)
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

/// Normalize a date header into a timestamp
///
/// Unparsable or missing dates become the current time. This is a lossy
/// fallback, not an error; use [`parse_date`] to tell the two apart.
#[must_use]
pub fn normalize_date(value: Option<&str>) -> DateTime<Utc> {
    value.and_then(parse_date).unwrap_or_else(|| {
        debug!("Unparsable date {:?}, using current time", value);
        Utc::now()
    })
}
