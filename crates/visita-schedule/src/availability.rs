//! Working-hours filter for the technician list.
//!
//! Availability is advisory: it annotates listings and never gates the
//! validator.

use serde::Serialize;

use visita_core::Technician;

use crate::time::time_of_day;

/// A technician paired with its availability at the proposed time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicianAvailability {
    #[serde(flatten)]
    pub technician: Technician,
    pub available: bool,
}

/// Whether `proposed` falls inside the technician's working hours.
///
/// A blank proposal means no time has been picked yet, so every technician
/// counts as available. Hours are compared lexically as `HH:MM:SS`, bounds
/// inclusive. An unparseable proposal is never available.
pub fn is_available(technician: &Technician, proposed: &str) -> bool {
    if proposed.trim().is_empty() {
        return true;
    }
    match time_of_day(proposed) {
        Some(time) => {
            technician.work_start.as_str() <= time.as_str()
                && time.as_str() <= technician.work_end.as_str()
        }
        None => false,
    }
}

/// Annotate every technician with its availability at `proposed`.
pub fn annotate(technicians: Vec<Technician>, proposed: &str) -> Vec<TechnicianAvailability> {
    technicians
        .into_iter()
        .map(|technician| {
            let available = is_available(&technician, proposed);
            TechnicianAvailability {
                technician,
                available,
            }
        })
        .collect()
}
