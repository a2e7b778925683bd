//! Patient entity
//!
//! A patient is a flat record: name and contact details plus a date of
//! birth. Nothing else in the system embeds patient data; bills hold a
//! reference by id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::PatientId;

use crate::error::PatientError;

/// Validated input for creating or fully describing a patient
///
/// The same draft shape backs creation and the post-update re-check, so a
/// partial update can never leave a record that would have been rejected at
/// creation time.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct PatientDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    pub date_of_birth: NaiveDate,
}

/// A registered patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique identifier
    pub id: PatientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Registers a new patient from a validated draft
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` when a required field is missing
    /// or the email is malformed.
    pub fn new(draft: PatientDraft) -> Result<Self, PatientError> {
        draft.validate()?;
        let now = Utc::now();

        Ok(Self {
            id: PatientId::new_v7(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            date_of_birth: draft.date_of_birth,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies field updates; `None` leaves a field untouched.
    ///
    /// The resulting record is re-validated as a whole before any field is
    /// committed.
    pub fn apply_update(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        date_of_birth: Option<NaiveDate>,
    ) -> Result<(), PatientError> {
        let draft = PatientDraft {
            name: name.unwrap_or_else(|| self.name.clone()),
            email: email.unwrap_or_else(|| self.email.clone()),
            phone: phone.unwrap_or_else(|| self.phone.clone()),
            address: address.unwrap_or_else(|| self.address.clone()),
            date_of_birth: date_of_birth.unwrap_or(self.date_of_birth),
        };
        draft.validate()?;

        self.name = draft.name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.address = draft.address;
        self.date_of_birth = draft.date_of_birth;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PatientDraft {
        PatientDraft {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            address: "12 MG Road, Bengaluru".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        }
    }

    #[test]
    fn test_new_patient() {
        let patient = Patient::new(draft()).unwrap();
        assert_eq!(patient.name, "Asha Rao");
        assert_eq!(patient.created_at, patient.updated_at);
    }

    #[test]
    fn test_rejects_bad_email() {
        let mut bad = draft();
        bad.email = "not-an-email".into();
        assert!(matches!(Patient::new(bad), Err(PatientError::Validation(_))));
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut bad = draft();
        bad.name = String::new();
        assert!(Patient::new(bad).is_err());
    }

    #[test]
    fn test_partial_update() {
        let mut patient = Patient::new(draft()).unwrap();
        patient
            .apply_update(None, Some("rao.asha@example.com".into()), None, None, None)
            .unwrap();

        assert_eq!(patient.email, "rao.asha@example.com");
        assert_eq!(patient.name, "Asha Rao");
    }

    #[test]
    fn test_invalid_update_leaves_record_unchanged() {
        let mut patient = Patient::new(draft()).unwrap();
        let before = patient.clone();

        let result = patient.apply_update(None, Some("broken".into()), None, None, None);

        assert!(result.is_err());
        assert_eq!(patient, before);
    }
}
