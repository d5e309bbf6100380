//! Date parsing and formatting
//!
//! Absolute dates are tried in a fixed priority so ambiguous strings resolve
//! deterministically: RFC 2822, `YYYY-MM-DD hh:mm:ss ±hhmm`, RFC 3339, bare
//! `YYYY-MM-DD` (local midnight), Unix `date` output.
//!
//! Relative dates additionally accept `now`, `today`, `yesterday`, `tomorrow`
//! and `<N> <unit> ago`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Timelike, Utc,
};
use regex::Regex;

use crate::bail_unsupported;
use crate::error::{NoteoError, Result};

/// Timestamps carry the offset they were written with.
pub type Timestamp = DateTime<FixedOffset>;

const ISO8601_LAYOUT: &str = "%Y-%m-%d %H:%M:%S %z";
const RFC2822_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S %z";
const UNIX_DATE_NUMERIC_LAYOUT: &str = "%a %b %e %H:%M:%S %z %Y";
const UNIX_DATE_LAYOUT: &str = "%a %b %e %H:%M:%S %Z %Y";
const BARE_DATE_LAYOUT: &str = "%Y-%m-%d";

/// Current time in the local offset
pub fn now() -> Timestamp {
    Local::now().fixed_offset()
}

/// Parse one of the supported absolute date formats.
pub fn parse_absolute(value: &str) -> Result<Timestamp> {
    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Ok(t);
    }
    if let Ok(t) = DateTime::parse_from_str(value, ISO8601_LAYOUT) {
        return Ok(t);
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t);
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, BARE_DATE_LAYOUT) {
        let midnight = day.and_time(NaiveTime::MIN);
        return Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|t| t.fixed_offset())
            .ok_or_else(|| NoteoError::parse(value, "no local midnight on that day"));
    }
    if let Ok(t) = DateTime::parse_from_str(value, UNIX_DATE_NUMERIC_LAYOUT) {
        return Ok(t);
    }
    // Zone abbreviations carry no offset; they are read as UTC.
    NaiveDateTime::parse_from_str(value, UNIX_DATE_LAYOUT)
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
        .map_err(|e| NoteoError::parse(value, e))
}

/// Parse an absolute or relative date, resolving relative forms against the
/// current time.
pub fn parse_relative(value: &str) -> Result<Timestamp> {
    parse_relative_at(value, now())
}

/// Parse an absolute or relative date, resolving relative forms against `now`.
pub fn parse_relative_at(value: &str, now: Timestamp) -> Result<Timestamp> {
    if let Ok(t) = parse_absolute(value) {
        return Ok(t);
    }
    match value {
        "now" => return Ok(now),
        "today" => return Ok(midnight(now)),
        "yesterday" => return Ok(midnight(now - Duration::days(1))),
        "tomorrow" => return Ok(midnight(now + Duration::days(1))),
        _ => {}
    }
    match parse_ago(value)? {
        Some(ago) => now
            .checked_sub_signed(ago)
            .ok_or_else(|| NoteoError::parse(value, "date out of range")),
        None => Err(NoteoError::UnsupportedDateFormat(value.to_string())),
    }
}

fn ago_regex() -> &'static Regex {
    static AGO: OnceLock<Regex> = OnceLock::new();
    AGO.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+)\s+([A-Za-z]+)\s+ago\s*$").expect("ago pattern compiles")
    })
}

/// `Ok(None)` when `value` is not an `<N> <unit> ago` expression at all.
fn parse_ago(value: &str) -> Result<Option<Duration>> {
    let Some(captures) = ago_regex().captures(value) else {
        return Ok(None);
    };
    let out_of_range = || NoteoError::parse(value, "duration out of range");
    let amount: i64 = captures[1].parse().map_err(|_| out_of_range())?;
    let unit = captures[2].to_lowercase();
    let duration = match unit.as_str() {
        "second" | "seconds" => Duration::try_seconds(amount),
        "minute" | "minutes" => Duration::try_minutes(amount),
        "hour" | "hours" => Duration::try_hours(amount),
        "day" | "days" => Duration::try_days(amount),
        "week" | "weeks" => Duration::try_weeks(amount),
        "month" | "months" => amount.checked_mul(30).and_then(Duration::try_days),
        "year" | "years" => amount.checked_mul(365).and_then(Duration::try_days),
        _ => return Ok(None),
    };
    duration.map(Some).ok_or_else(out_of_range)
}

fn midnight(t: Timestamp) -> Timestamp {
    let naive = t.date_naive().and_time(NaiveTime::MIN);
    t.offset().from_local_datetime(&naive).single().unwrap_or(t)
}

/// Render a timestamp the way absolute tag values are stored: a bare date when
/// the time is midnight, RFC 3339 with second precision otherwise.
pub fn format_absolute(t: Timestamp) -> String {
    if t.hour() == 0 && t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0 {
        t.format(BARE_DATE_LAYOUT).to_string()
    } else {
        t.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// ISO 8601-like format (same as in Git): `2020-10-15 16:30:10 +0200`
pub fn format_iso8601(t: Timestamp) -> String {
    t.format(ISO8601_LAYOUT).to_string()
}

/// RFC 2822 format, often found in email messages: `Thu, 15 Oct 2020 16:30:10 +0200`
pub fn format_rfc2822(t: Timestamp) -> String {
    t.format(RFC2822_LAYOUT).to_string()
}

/// Human friendly distance from now, e.g. `3 days ago`
pub fn format_relative(t: Timestamp) -> String {
    format_relative_at(t, now())
}

pub fn format_relative_at(t: Timestamp, now: Timestamp) -> String {
    let passed = now.signed_duration_since(t);
    let seconds = passed.num_seconds();
    let minutes = passed.num_minutes();
    // round to the nearest hour
    let hours = (passed.num_seconds() + 1800) / 3600;
    match () {
        _ if seconds < 1 => "Less than a second ago".to_string(),
        _ if seconds == 1 => "1 second ago".to_string(),
        _ if seconds < 60 => format!("{seconds} seconds ago"),
        _ if minutes == 1 => "About a minute ago".to_string(),
        _ if minutes < 60 => format!("{minutes} minutes ago"),
        _ if hours == 1 => "About an hour ago".to_string(),
        _ if hours < 48 => format!("{hours} hours ago"),
        _ if hours < 24 * 7 * 2 => format!("{} days ago", hours / 24),
        _ if hours < 24 * 30 * 2 => format!("{} weeks ago", hours / 24 / 7),
        _ if hours < 24 * 365 * 2 => format!("{} months ago", hours / 24 / 30),
        _ => format!("{} years ago", passed.num_hours() / 24 / 365),
    }
}

/// How dates are rendered in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    Relative,
    Iso8601,
    Rfc2822,
}

impl DateFormat {
    pub fn format(&self, t: Timestamp) -> String {
        match self {
            DateFormat::Relative => format_relative(t),
            DateFormat::Iso8601 => format_iso8601(t),
            DateFormat::Rfc2822 => format_rfc2822(t),
        }
    }
}

impl FromStr for DateFormat {
    type Err = NoteoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rfc" | "rfc2822" => Ok(DateFormat::Rfc2822),
            "iso" | "iso8601" => Ok(DateFormat::Iso8601),
            "relative" => Ok(DateFormat::Relative),
            other => bail_unsupported!(
                "date format",
                other,
                "rfc2822 (or rfc), iso8601 (or iso), relative"
            ),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateFormat::Relative => "relative",
            DateFormat::Iso8601 => "iso8601",
            DateFormat::Rfc2822 => "rfc2822",
        };
        f.write_str(name)
    }
}
