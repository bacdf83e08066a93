//! Validation and confirmation of visit proposals.
//!
//! A proposal is checked against the ledger that lives in the chat
//! transcript. On success the ledger text is written back into the active
//! session, which is what makes the appointment visible to later checks.

use chrono::{Local, NaiveDateTime};
use rand::Rng;
use tracing::{debug, info};

use visita_core::{Message, SessionStore};

use crate::error::SchedulingError;
use crate::ledger::{AppointmentRecord, LedgerScanner};
use crate::time::{parse_proposal, DISPLAY_FORMAT};

/// Upper bound (exclusive) of confirmation codes.
const CONFIRMATION_CODE_RANGE: u16 = 1000;

/// Validates proposals and records confirmed visits.
pub struct SchedulingValidator;

impl SchedulingValidator {
    /// Validate a proposal against the local wall clock.
    pub fn propose(
        store: &mut SessionStore,
        technician_id: Option<u32>,
        date: &str,
    ) -> Result<AppointmentRecord, SchedulingError> {
        Self::propose_at(store, technician_id, date, Local::now().naive_local())
    }

    /// Validate a proposal against `now`.
    ///
    /// Checks run in order and stop at the first failure: completeness,
    /// date parsing, past date, double booking. Nothing is appended to the
    /// store unless every check passes.
    pub fn propose_at(
        store: &mut SessionStore,
        technician_id: Option<u32>,
        date: &str,
        now: NaiveDateTime,
    ) -> Result<AppointmentRecord, SchedulingError> {
        let technician_id = match technician_id {
            Some(id) if id != 0 && !date.trim().is_empty() => id,
            _ => return Err(SchedulingError::IncompleteRequest),
        };

        let scheduled_at = parse_proposal(date)?;
        let display_date = scheduled_at.format(DISPLAY_FORMAT).to_string();

        if scheduled_at < now {
            debug!(technician_id, date = %display_date, "Rejected past date");
            return Err(SchedulingError::PastDate(display_date));
        }

        let conflict = LedgerScanner::scan(store.sessions())
            .any(|record| record.conflicts_with(technician_id, scheduled_at));
        if conflict {
            debug!(technician_id, date = %display_date, "Rejected double booking");
            return Err(SchedulingError::DoubleBooking {
                technician_id,
                scheduled_at: display_date,
            });
        }

        let code = rand::rng().random_range(0..CONFIRMATION_CODE_RANGE);
        let record = AppointmentRecord::new(technician_id, scheduled_at, code);

        let session_id = store.active().id.clone();
        store.append_message(&session_id, Message::assistant(record.to_string()));

        info!(
            technician_id,
            session_id = %session_id,
            date = %display_date,
            code,
            "Visit confirmed"
        );
        Ok(record)
    }
}
