//! IMF-fixdate formatting and parsing (`Sun, 06 Nov 1994 08:49:37 GMT`)

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::time::SystemTime;

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Render `time` as an HTTP date, truncated to whole seconds
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP date; anything that is not IMF-fixdate yields `None`
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), IMF_FIXDATE).ok()?;
    Some(Utc.from_utc_datetime(&naive).into())
}
