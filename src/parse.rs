//! Lenient field parsing for the scraped snapshots.
//!
//! The scraper serializes every number as a string (`"12"`), booleans as
//! `"True"`/`"False"` and clocks as `"M:SS"`. Nothing here fails: a value that
//! cannot be read resolves to its documented default.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Leading-integer parse with `parseInt` semantics: surrounding whitespace is
/// ignored, an optional sign is accepted and parsing stops at the first
/// non-digit. Returns `None` when no digit was read.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    Some(if negative { -value } else { value })
}

/// A counting stat. Missing, malformed and negative values count as 0.
pub fn parse_count(raw: &str) -> u32 {
    parse_int_prefix(raw)
        .filter(|v| *v >= 0)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

pub fn parse_float(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

pub fn parse_flag(raw: &str) -> bool {
    raw.trim() == "True"
}

/// Box-score minutes: `"M:SS"` becomes `M + SS/60`. Anything that is not
/// exactly two colon-delimited numeric parts is treated as absent.
pub fn parse_minutes(raw: &str) -> Option<f64> {
    let mut parts = raw.split(':');
    let (Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let m = parse_int_prefix(m)?;
    let s = parse_int_prefix(s)?;
    Some(m as f64 + s as f64 / 60.0)
}

/// Game clock remaining in seconds. `"M:SS"` combines the first two parts as
/// `M*60 + SS`; a value without a colon is read as bare seconds.
pub fn parse_clock_seconds(raw: &str) -> Option<u32> {
    let total = if raw.contains(':') {
        let mut parts = raw.split(':');
        let m = parse_int_prefix(parts.next().unwrap_or_default())?;
        let s = parse_int_prefix(parts.next().unwrap_or_default())?;
        m.saturating_mul(60).saturating_add(s)
    } else {
        parse_int_prefix(raw)?
    };
    u32::try_from(total).ok()
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        _ => None,
    }
}

pub(crate) fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(value_text(&v).unwrap_or_default())
}

pub(crate) fn de_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(value_text(&v).filter(|s| !s.is_empty()))
}

pub(crate) fn de_count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match &v {
        Value::Number(n) => n
            .as_u64()
            .map(|x| u32::try_from(x).unwrap_or(u32::MAX))
            .or_else(|| n.as_f64().filter(|x| *x >= 0.0).map(|x| x.trunc() as u32))
            .unwrap_or(0),
        Value::String(s) => parse_count(s),
        _ => 0,
    })
}

pub(crate) fn de_float<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match &v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float(s).unwrap_or(0.0),
        _ => 0.0,
    })
}

pub(crate) fn de_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match &v {
        Value::Bool(b) => *b,
        Value::String(s) => parse_flag(s),
        _ => false,
    })
}

pub(crate) fn de_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match &v {
        Value::String(s) => parse_minutes(s),
        Value::Number(n) => n.as_f64().filter(|x| *x >= 0.0),
        _ => None,
    })
}

pub(crate) fn de_clock<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match &v {
        Value::String(s) => parse_clock_seconds(s),
        Value::Number(n) => n.as_u64().and_then(|x| u32::try_from(x).ok()),
        _ => None,
    })
}
