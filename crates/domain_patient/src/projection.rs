//! Flat export projection for patients

use serde::{Deserialize, Serialize};

use core_kernel::PatientId;

use crate::patient::Patient;

/// One patient flattened for tabular export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientExportRow {
    pub id: PatientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// ISO date (`YYYY-MM-DD`)
    pub date_of_birth: String,
    /// ISO date (`YYYY-MM-DD`)
    pub registered_date: String,
}

impl PatientExportRow {
    /// Flattens a patient into an export row
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            phone: patient.phone.clone(),
            address: patient.address.clone(),
            date_of_birth: patient.date_of_birth.format("%Y-%m-%d").to_string(),
            registered_date: patient
                .created_at
                .date_naive()
                .format("%Y-%m-%d")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::PatientDraft;
    use chrono::NaiveDate;

    #[test]
    fn test_from_patient() {
        let patient = Patient::new(PatientDraft {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            address: "12 MG Road, Bengaluru".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        })
        .unwrap();

        let row = PatientExportRow::from_patient(&patient);

        assert_eq!(row.name, "Asha Rao");
        assert_eq!(row.date_of_birth, "1990-06-15");
        assert_eq!(
            row.registered_date,
            patient.created_at.date_naive().format("%Y-%m-%d").to_string()
        );
    }

    #[test]
    fn test_row_serializes_dates_as_plain_strings() {
        let patient = Patient::new(PatientDraft {
            name: "Ravi Menon".into(),
            email: "ravi@example.com".into(),
            phone: "9000000001".into(),
            address: "4 Marine Drive, Kochi".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 1, 2).unwrap(),
        })
        .unwrap();

        let json = serde_json::to_value(PatientExportRow::from_patient(&patient)).unwrap();
        assert_eq!(json["date_of_birth"], "1985-01-02");
    }
}
