//! Parser for free-text answers from the reasoning provider.
//!
//! ## Grammar
//!
//! The response is scanned line by line (leading whitespace ignored). Three
//! labels are recognised; everything else is ignored:
//!
//! - `RECOMMENDED_TIME: HH:MM`: the last line that parses wins. A value that
//!   does not parse is skipped.
//! - `REASONING: text`: the last non-empty occurrence wins.
//! - `WARNINGS: text`: each occurrence adds one warning, unless the text is
//!   empty or `none` (any case).
//!
//! ## Defaults
//!
//! - No valid time: the missed dose's current time, and the reasoning is
//!   prefixed with "Take as soon as possible."
//! - No reasoning line: the first 200 characters of the response.
//!
//! `ParsedAdvice::used_defaults` is set whenever either default applied.

use crate::duration::parse_time;
use crate::MissedDose;
use chrono::NaiveTime;

const TIME_LABEL: &str = "RECOMMENDED_TIME:";
const REASONING_LABEL: &str = "REASONING:";
const WARNINGS_LABEL: &str = "WARNINGS:";

/// Characters of raw response kept when no reasoning line is present
pub const REASONING_FALLBACK_CHARS: usize = 200;

/// Structured view of a provider response
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedAdvice {
    pub new_time: NaiveTime,
    pub reasoning: String,
    pub warnings: Vec<String>,
    /// True when the time or the reasoning had to be defaulted
    pub used_defaults: bool,
}

/// Parse a provider response for `missed`
pub fn parse_advice(response: &str, missed: &MissedDose) -> ParsedAdvice {
    let mut new_time = None;
    let mut reasoning = None;
    let mut warnings = Vec::new();

    for line in response.lines().map(str::trim_start) {
        if let Some(value) = line.strip_prefix(TIME_LABEL) {
            match parse_time(value) {
                Ok(time) => new_time = Some(time),
                Err(_) => tracing::debug!("Ignoring unparsable recommended time {:?}", value),
            }
        } else if let Some(value) = line.strip_prefix(REASONING_LABEL) {
            let value = value.trim();
            if !value.is_empty() {
                reasoning = Some(value.to_string());
            }
        } else if let Some(value) = line.strip_prefix(WARNINGS_LABEL) {
            let value = value.trim();
            if !value.is_empty() && !value.eq_ignore_ascii_case("none") {
                warnings.push(value.to_string());
            }
        }
    }

    let used_defaults = new_time.is_none() || reasoning.is_none();

    let reasoning = reasoning.unwrap_or_else(|| {
        response
            .trim()
            .chars()
            .take(REASONING_FALLBACK_CHARS)
            .collect()
    });

    let (new_time, reasoning) = match new_time {
        Some(time) => (time, reasoning),
        None => (
            missed.current_time,
            format!("Take as soon as possible. {}", reasoning)
                .trim_end()
                .to_string(),
        ),
    };

    if used_defaults {
        tracing::warn!(
            "Reasoning response for {} was incomplete; defaults applied",
            missed.medication_name
        );
    }

    ParsedAdvice {
        new_time,
        reasoning,
        warnings,
        used_defaults,
    }
}
