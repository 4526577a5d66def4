use thiserror::Error;

use crate::domain::{Number, RefLabel};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid number value: {0:?}")]
pub struct InvalidNumber(pub String);

pub fn string_or_null(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn number_or_null(value: &str) -> Result<Option<Number>, InvalidNumber> {
    if value.is_empty() {
        return Ok(None);
    }
    number(value).map(Some)
}

pub fn number(value: &str) -> Result<Number, InvalidNumber> {
    let trimmed = value.trim();
    parse_literal(trimmed)
        .and_then(Number::new)
        .ok_or_else(|| InvalidNumber(trimmed.to_string()))
}

fn parse_literal(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = value.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
                return None;
            }
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }
    // f64::from_str also takes "inf" and "nan" spellings.
    if value
        .chars()
        .any(|ch| ch.is_ascii_alphabetic() && !matches!(ch, 'e' | 'E'))
    {
        return None;
    }
    value.parse::<f64>().ok()
}

pub fn list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

// `None` for empty input: the flag column must not be blank.
pub fn boolean_label(value: &str) -> Option<RefLabel> {
    let first = value.chars().next()?;
    if first.eq_ignore_ascii_case(&'t') {
        Some(RefLabel::Yes)
    } else {
        Some(RefLabel::No)
    }
}
