//! Calendar-date plumbing for the ledger.
//!
//! Completion records carry dates as fixed-width `YYYY-MM-DD` strings with
//! local-day granularity; this module owns the conversions between that
//! form and `time::Date`, plus the humanized labels used by log lists.

use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Label returned for unparseable or missing dates.
pub const NO_DATE_LABEL: &str = "No date available";

/// Today's civil date in the local timezone, falling back to UTC when the
/// local offset cannot be determined.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Today as a `YYYY-MM-DD` string.
pub fn today_ymd() -> String {
    to_ymd(today())
}

/// Format a date as zero-padded `YYYY-MM-DD`. Lexicographic order on the
/// result is date order.
pub fn to_ymd(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .expect("fixed-width date formatting should not fail")
}

/// Parse a `YYYY-MM-DD` string. Returns `None` for anything else.
pub fn parse_ymd(s: &str) -> Option<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Current instant as an RFC 3339 timestamp, for creation stamps.
pub fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&time::format_description::well_known::Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

/// Humanized label for a log date relative to today: "Today", "Yesterday",
/// "3d ago", "Tomorrow", "in 2d", or a short absolute date.
pub fn date_label(date: &str) -> String {
    date_label_on(date, today())
}

/// Same as [`date_label`] with an explicit reference day.
pub fn date_label_on(date: &str, today: Date) -> String {
    let Some(d) = parse_ymd(date) else {
        return NO_DATE_LABEL.to_string();
    };
    let diff = (today - d).whole_days();
    match diff {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{diff}d ago"),
        -1 => "Tomorrow".to_string(),
        -6..=-2 => format!("in {}d", -diff),
        _ => format_short(d),
    }
}

/// Short absolute form, e.g. "Mon, Jan 5".
fn format_short(d: Date) -> String {
    let weekday = d.weekday().to_string();
    let month = d.month().to_string();
    format!("{}, {} {}", &weekday[..3], &month[..3], d.day())
}
