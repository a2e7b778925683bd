//! Patient Registry Domain
//!
//! Patients are independently owned records referenced by id from bills.
//! The registry is read-only from the billing side: bill creation and
//! display look patients up but never modify them.

pub mod error;
pub mod patient;
pub mod projection;

pub use error::PatientError;
pub use patient::{Patient, PatientDraft};
pub use projection::PatientExportRow;
