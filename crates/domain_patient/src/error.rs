//! Patient domain errors

use thiserror::Error;

/// Errors that can occur in the patient domain
#[derive(Debug, Error)]
pub enum PatientError {
    /// Patient not found
    #[error("Patient not found: {0}")]
    NotFound(String),

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for PatientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
                format!("{}: {}", field, codes.join(", "))
            })
            .collect();
        PatientError::Validation(details.join("; "))
    }
}
