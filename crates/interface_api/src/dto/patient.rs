//! Patient DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_patient::{Patient, PatientDraft, PatientExportRow};

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
}

impl From<CreatePatientRequest> for PatientDraft {
    fn from(request: CreatePatientRequest) -> Self {
        PatientDraft {
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            date_of_birth: request.date_of_birth,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PatientResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: *patient.id.as_uuid(),
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
            date_of_birth: patient.date_of_birth,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// Query parameters for the patient listing
#[derive(Debug, Deserialize)]
pub struct ListPatientsQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Pagination envelope returned with every listing page
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl Pagination {
    /// Builds the envelope for one page of `total` matching records
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i64 = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            total_pages: (total + limit_i64 - 1) / limit_i64,
            has_more: i64::from(page) * limit_i64 < total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatientListResponse {
    pub patients: Vec<PatientResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct DeletePatientQuery {
    /// Cascade onto the patient's bills
    #[serde(default)]
    pub delete_bills: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletePatientResponse {
    pub message: String,
    pub bills_deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeletePatientsRequest {
    pub ids: Vec<Uuid>,
    #[serde(default)]
    pub delete_bills: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkDeletePatientsResponse {
    pub message: String,
    pub patients_deleted: u64,
    pub bills_deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct ExportPatientsRequest {
    pub ids: Option<Vec<Uuid>>,
    pub format: crate::export::ExportFormat,
}

#[derive(Debug, Serialize)]
pub struct PatientsExportResponse {
    pub data: Vec<PatientExportRow>,
    pub columns: Vec<crate::export::ExportColumn>,
    pub format: crate::export::ExportFormat,
    pub count: usize,
    /// Rendered only when `format` is `csv`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_math() {
        let pagination = Pagination::new(1, 10, 25);
        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.has_more);

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_more);
    }

    #[test]
    fn test_pagination_exact_multiple() {
        let pagination = Pagination::new(2, 10, 20);
        assert_eq!(pagination.total_pages, 2);
        assert!(!pagination.has_more);
    }

    #[test]
    fn test_pagination_empty() {
        let pagination = Pagination::new(1, 10, 0);
        assert_eq!(pagination.total_pages, 0);
        assert!(!pagination.has_more);
    }
}
