//! Form payloads submitted by the admin pages and the helpers that sanitize them.

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

pub mod admins;
pub mod banners;
pub mod bookings;
pub mod branches;
pub mod franchises;
pub mod offers;
pub mod orders;
pub mod payments;
pub mod product_categories;
pub mod products;
pub mod reviews;
pub mod uploads;
pub mod wash_services;
pub mod washers;

/// Currency applied when a form or CSV row leaves it blank.
pub const DEFAULT_CURRENCY: &str = "USD";

/// ISO 4217 currency codes are three ASCII alphabetic characters.
pub const CURRENCY_CODE_LEN: usize = 3;

lazy_static! {
    static ref TIME_OF_DAY_RE: Regex =
        Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time-of-day pattern is valid");
}

/// Whether `value` is a 24-hour `HH:MM` time.
pub fn is_valid_time_of_day(value: &str) -> bool {
    TIME_OF_DAY_RE.is_match(value)
}

/// Parses a decimal amount such as `12.50` or `12,5` into cents.
///
/// Returns `None` for negative numbers, more than two fractional digits,
/// or amounts that do not fit into an `i32`.
pub fn parse_money(input: &str) -> Option<i32> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    if !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
        || fraction.len() > 2
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    let cents = whole.checked_mul(100)?.checked_add(fraction)?;
    i32::try_from(cents).ok()
}

/// Formats cents as a decimal amount with two fractional digits.
pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
}

/// Accepts the `datetime-local` input format with or without seconds.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Parses an optional positive identifier; blank input is `Ok(None)` and
/// garbage is returned as the error value.
pub fn parse_optional_id(value: Option<&str>) -> Result<Option<i32>, String> {
    let Some(raw) = value else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<i32>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(trimmed.to_string()),
    }
}

pub fn sanitize_currency(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.len() != CURRENCY_CODE_LEN || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return None;
    }

    Some(trimmed.to_ascii_uppercase())
}

pub fn sanitize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Collapses whitespace runs and strips control characters.
pub fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitizes each line and keeps at most one blank line between paragraphs.
pub fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        let is_empty = line.is_empty();
        if is_empty {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}

/// Inline-sanitized value, or `None` when nothing is left.
pub fn optional_inline(value: Option<&str>) -> Option<String> {
    value
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
}

/// Multiline-sanitized value, or `None` when nothing is left.
pub fn optional_multiline(value: Option<&str>) -> Option<String> {
    value
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_accepts_decimal_text() {
        assert_eq!(parse_money("12.50"), Some(1250));
        assert_eq!(parse_money(" 12,5 "), Some(1250));
        assert_eq!(parse_money("7"), Some(700));
        assert_eq!(parse_money("0.05"), Some(5));
        assert_eq!(parse_money(".99"), Some(99));
    }

    #[test]
    fn parse_money_rejects_garbage() {
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("-1.00"), None);
        assert_eq!(parse_money("1.234"), None);
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money("."), None);
        assert_eq!(parse_money("99999999999"), None);
    }

    #[test]
    fn format_money_pads_cents() {
        assert_eq!(format_money(1250), "12.50");
        assert_eq!(format_money(5), "0.05");
        assert_eq!(format_money(-305), "-3.05");
    }

    #[test]
    fn time_of_day_requires_two_digit_hours_and_minutes() {
        assert!(is_valid_time_of_day("00:00"));
        assert!(is_valid_time_of_day("09:30"));
        assert!(is_valid_time_of_day("23:59"));
        assert!(!is_valid_time_of_day("24:00"));
        assert!(!is_valid_time_of_day("9:30"));
        assert!(!is_valid_time_of_day("12:60"));
        assert!(!is_valid_time_of_day("12:00 "));
        assert!(!is_valid_time_of_day("1\u{0669}:00"));
        assert!(!is_valid_time_of_day("\u{FF11}\u{FF12}:00"));
    }

    #[test]
    fn parse_datetime_accepts_browser_format() {
        let parsed = parse_datetime("2024-05-01T09:30").expect("datetime");
        assert_eq!(parsed.to_string(), "2024-05-01 09:30:00");
        assert!(parse_datetime("2024-05-01").is_none());
    }

    #[test]
    fn parse_optional_id_handles_blank_and_garbage() {
        assert_eq!(parse_optional_id(None), Ok(None));
        assert_eq!(parse_optional_id(Some("  ")), Ok(None));
        assert_eq!(parse_optional_id(Some(" 12 ")), Ok(Some(12)));
        assert_eq!(parse_optional_id(Some("abc")), Err("abc".to_string()));
        assert_eq!(parse_optional_id(Some("-3")), Err("-3".to_string()));
    }

    #[test]
    fn sanitizers_collapse_whitespace() {
        assert_eq!(sanitize_inline_text("  Foam \t wash  "), "Foam wash");
        assert_eq!(
            sanitize_multiline_text("\n First \n\n\n Second \n"),
            "First\n\nSecond"
        );
        assert_eq!(optional_inline(Some("   ")), None);
        assert_eq!(sanitize_currency("usd").as_deref(), Some("USD"));
        assert_eq!(sanitize_currency("US1"), None);
    }
}
