//! Last-mile parsing of literal text into typed scalars

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use resq_dsl::Scalar;

use super::classify::FieldClass;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Minute-precision times with an offset; RFC 3339 requires seconds
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Finite floating-point value; NaN and infinities have no JSON form
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// RFC 3339, an ISO 8601 time given to the minute, or an offset-less
/// date-time / bare date read as UTC
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let with_offset = match text.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+0000"),
        None => text.to_string(),
    };
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse `text` as a value of `class`
pub fn parse_scalar(class: FieldClass, text: &str) -> Option<Scalar> {
    match class {
        FieldClass::Integer => parse_integer(text).map(Scalar::Long),
        FieldClass::Float => parse_float(text).map(Scalar::Double),
        FieldClass::DateTime => parse_datetime(text).map(Scalar::Date),
        FieldClass::Text => Some(Scalar::Text(text.to_string())),
    }
}
