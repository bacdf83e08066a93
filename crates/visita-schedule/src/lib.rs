//! Technician-visit scheduling for Visita.
//!
//! Confirmed visits are stored only as ledger text inside the chat
//! transcript. This crate encodes and scans that ledger, validates new
//! proposals against it, and lists technicians with their availability.

pub mod availability;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod time;
pub mod validator;

pub use availability::{annotate, is_available, TechnicianAvailability};
pub use directory::{HttpDirectory, StaticDirectory, TechnicianDirectory};
pub use error::SchedulingError;
pub use ledger::{AppointmentRecord, LedgerScanner};
pub use validator::SchedulingValidator;
