//! Appointment ledger codec and transcript scanner.
//!
//! A confirmed visit is recorded only as an assistant message in the chat
//! transcript. [`AppointmentRecord`] is the structured form of that message:
//! its `Display` impl writes the ledger text and [`AppointmentRecord::parse`]
//! reads it back.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

use visita_core::{Sender, Session};

use crate::time::DISPLAY_FORMAT;

static LEDGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Visita confirmada com Técnico ([0-9]+) para ([0-9]{2})/([0-9]{2})/([0-9]{4}), ([0-9]{2}):([0-9]{2})\nCódigo da visita: AG-([0-9]{1,3})$",
    )
    .expect("Invalid ledger regex")
});

/// A confirmed technician visit reconstructed from ledger text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRecord {
    pub technician_id: u32,
    /// Local date-time at minute precision.
    pub scheduled_at: NaiveDateTime,
    pub confirmation_code: u16,
}

impl AppointmentRecord {
    pub fn new(technician_id: u32, scheduled_at: NaiveDateTime, confirmation_code: u16) -> Self {
        Self {
            technician_id,
            scheduled_at,
            confirmation_code,
        }
    }

    /// Display name used in the ledger text.
    pub fn technician_name(&self) -> String {
        technician_display_name(self.technician_id)
    }

    /// `DD/MM/YYYY, HH:MM` rendering of the visit time.
    pub fn formatted_date(&self) -> String {
        self.scheduled_at.format(DISPLAY_FORMAT).to_string()
    }

    /// Decode a ledger message. Returns `None` for anything that is not
    /// exactly the ledger shape, including impossible calendar dates.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = LEDGER_PATTERN.captures(text)?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str());

        let technician_id = field(1)?.parse().ok()?;
        let day = field(2)?.parse().ok()?;
        let month = field(3)?.parse().ok()?;
        let year = field(4)?.parse().ok()?;
        let hour = field(5)?.parse().ok()?;
        let minute = field(6)?.parse().ok()?;
        let confirmation_code = field(7)?.parse().ok()?;

        let scheduled_at = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
        Some(Self::new(technician_id, scheduled_at, confirmation_code))
    }

    /// Whether `other` books the same technician at the same minute.
    pub fn conflicts_with(&self, technician_id: u32, scheduled_at: NaiveDateTime) -> bool {
        self.technician_id == technician_id && self.scheduled_at == scheduled_at
    }
}

impl fmt::Display for AppointmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Visita confirmada com {} para {}\nCódigo da visita: AG-{}",
            self.technician_name(),
            self.formatted_date(),
            self.confirmation_code
        )
    }
}

/// Display name for a technician id. No directory lookup is involved.
pub fn technician_display_name(technician_id: u32) -> String {
    format!("Técnico {}", technician_id)
}

/// Scans transcripts for ledger entries.
pub struct LedgerScanner;

impl LedgerScanner {
    /// Lazily yield every appointment recorded in `sessions`.
    ///
    /// Sessions are visited in the given order and messages in insertion
    /// order; only assistant messages are considered. Duplicates are kept.
    /// The iterator is `Clone`, so a scan can be restarted from any point.
    pub fn scan<'a, I>(sessions: I) -> impl Iterator<Item = AppointmentRecord> + Clone + 'a
    where
        I: IntoIterator<Item = &'a Session>,
        I::IntoIter: Clone + 'a,
    {
        sessions
            .into_iter()
            .flat_map(|session| session.messages.iter())
            .filter(|message| message.sender == Sender::Assistant)
            .filter_map(|message| AppointmentRecord::parse(&message.text))
    }
}
