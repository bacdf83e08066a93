//! Parsing of proposed visit times.
//!
//! Proposals arrive as local ISO date-times (`YYYY-MM-DDTHH:MM`, optionally
//! with `:SS`) and carry no timezone.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::SchedulingError;

const PROPOSAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Display format shared by the ledger text and error messages.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M";

/// Parse a proposal exactly as written.
pub fn parse_local(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    PROPOSAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
}

/// Parse a proposal and truncate it to minute precision.
///
/// Years outside `0..=9999` are rejected: the ledger text only carries
/// four-digit years.
pub fn parse_proposal(date: &str) -> Result<NaiveDateTime, SchedulingError> {
    parse_local(date)
        .filter(|dt| (0..=9999).contains(&dt.year()))
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| SchedulingError::InvalidDate(date.to_string()))
}

/// Fixed-width `HH:MM:SS` time of day of a proposal.
pub fn time_of_day(date: &str) -> Option<String> {
    parse_local(date).map(|dt| dt.format("%H:%M:%S").to_string())
}
