//! Scalar coercions for messy upload values.
//!
//! Every helper here is total: malformed values degrade to a documented
//! default instead of failing, so structurally valid rows always ingest.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Epoch values below this are seconds; at or above, milliseconds.
const EPOCH_MILLIS_CUTOFF: f64 = 1e12;

/// Coerce a metric value to a non-negative count.
///
/// Numbers truncate toward zero, numeric strings parse (integer first, then
/// float), everything else is 0. Explicit negative inputs clamp to 0 so the
/// non-negativity constraint holds by construction.
#[must_use]
pub fn coerce_count(value: Option<&Value>) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let n = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .unwrap_or_else(|_| trimmed.parse::<f64>().map_or(0, |f| f as i64))
        }
        _ => 0,
    };
    n.max(0)
}

/// Coerce a scalar to a display string. Nulls, objects, and arrays become
/// the empty string.
#[must_use]
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse a timestamp value to a UTC instant.
///
/// Strings try RFC 3339 and a handful of common export formats; numbers (and
/// numeric strings) are epochs — seconds when below `1e12`, milliseconds
/// otherwise. Anything unparseable yields `fallback` (the ingestion time).
#[must_use]
pub fn parse_timestamp(value: Option<&Value>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            parse_date_string(trimmed)
                .or_else(|| trimmed.parse::<f64>().ok().and_then(from_epoch))
                .unwrap_or(fallback)
        }
        Some(Value::Number(n)) => n.as_f64().and_then(from_epoch).unwrap_or(fallback),
        _ => fallback,
    }
}

fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

fn from_epoch(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let value = raw as i64;
    if raw.abs() < EPOCH_MILLIS_CUTOFF {
        DateTime::from_timestamp(value, 0)
    } else {
        DateTime::from_timestamp_millis(value)
    }
}

/// Split a comment-texts value into an ordered list of comment strings.
///
/// Arrays pass through with scalars stringified; strings split on `|` with
/// each piece trimmed and empties dropped; everything else is empty.
#[must_use]
pub fn split_comments(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| coerce_string(Some(item)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split('|')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}
