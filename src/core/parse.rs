//! Field parsers for the display-formatted strings in an earnings report.
//!
//! 報表欄位都是顯示用字串（"$24.50/hr"、"1h 3m 34s"、"-"），
//! 解析失敗一律當成 0，不中斷整體彙總。

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

static HR_SUFFIX_RE: OnceLock<Regex> = OnceLock::new();
static HOURS_RE: OnceLock<Regex> = OnceLock::new();
static MINUTES_RE: OnceLock<Regex> = OnceLock::new();
static SECONDS_RE: OnceLock<Regex> = OnceLock::new();

fn hr_suffix_re() -> &'static Regex {
    HR_SUFFIX_RE.get_or_init(|| Regex::new(r"(?i)/hr").unwrap())
}

fn hours_re() -> &'static Regex {
    HOURS_RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*h").unwrap())
}

fn minutes_re() -> &'static Regex {
    MINUTES_RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*m").unwrap())
}

fn seconds_re() -> &'static Regex {
    SECONDS_RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*s").unwrap())
}

/// Parses an hourly-rate string like `"$24.50/hr"` into `24.50`.
///
/// Empty strings and `"-"` are legitimate zeros and yield `Some(0.0)`.
/// `None` means the value was present but malformed.
pub fn try_parse_rate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Some(0.0);
    }

    let stripped = trimmed.replace(['$', ','], "");
    let cleaned = hr_suffix_re().replace_all(&stripped, "");
    cleaned.trim().parse::<f64>().ok()
}

/// Rate parser with the silent-zero fallback the report pass relies on.
pub fn parse_rate(raw: &str) -> f64 {
    try_parse_rate(raw).unwrap_or_else(|| {
        tracing::warn!("Malformed rate value '{}', treating as 0", raw.trim());
        0.0
    })
}

/// Parses a money string like `"$1,234.56"` into `1234.56`.
/// Same fallback contract as [`parse_rate`], without the `/hr` handling.
pub fn parse_payout(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }

    match trimmed.replace(['$', ','], "").trim().parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Malformed payout value '{}', treating as 0", trimmed);
            0.0
        }
    }
}

/// Converts duration strings like `"1h 3m 34s"` or `"47m 46s"` into
/// decimal hours. Components may appear in any combination; a string
/// with no recognizable component is 0.
pub fn parse_duration(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }

    let component = |re: &Regex| -> f64 {
        re.captures(trimmed)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let hours = component(hours_re());
    let minutes = component(minutes_re());
    let seconds = component(seconds_re());

    hours + minutes / 60.0 + seconds / 3600.0
}

/// Work dates show up as ISO dates, RFC3339 timestamps, or `M/D/YYYY`.
pub fn parse_work_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    None
}
