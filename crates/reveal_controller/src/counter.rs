//! Counter attributes
//!
//! A counter element carries its target in `data-target` and an optional
//! duration in `data-duration`. Both are read at trigger time with lenient
//! integer parsing: leading whitespace, an optional sign, then leading
//! digits, so `"250px"` reads as 250.

use reveal_core::{Document, NodeId};
use thiserror::Error;

/// Problems with a counter element's attributes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CounterError {
    #[error("counter has no data-target attribute")]
    MissingTarget,

    #[error("counter data-target {0:?} is not an integer")]
    InvalidTarget(String),
}

/// Parse the leading integer of `input`, ignoring any trailing text
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(rest.len(), |(i, _)| i);
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Target and duration of a counter animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSpec {
    pub target: i64,
    pub duration_ms: u32,
}

impl CounterSpec {
    /// Read the counter attributes of `node`
    ///
    /// A missing, unparsable or non-positive duration falls back to `default_duration_ms`.
    pub fn read(
        doc: &Document,
        node: NodeId,
        default_duration_ms: u32,
    ) -> Result<Self, CounterError> {
        let raw_target = doc.data(node, "target").ok_or(CounterError::MissingTarget)?;
        let target = parse_leading_int(raw_target)
            .ok_or_else(|| CounterError::InvalidTarget(raw_target.to_string()))?;

        let duration_ms = doc
            .data(node, "duration")
            .and_then(parse_leading_int)
            .filter(|ms| *ms > 0)
            .and_then(|ms| u32::try_from(ms).ok())
            .unwrap_or(default_duration_ms);

        Ok(Self {
            target,
            duration_ms,
        })
    }
}

/// Text shown for an in-flight counter value
pub fn counter_text(value: f32) -> String {
    (value.floor() as i64).to_string()
}
