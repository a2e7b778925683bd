//! Patient handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain_patient::{Patient, PatientExportRow};
use infra_db::PatientRepository;

use crate::dto::patient::*;
use crate::error::ApiError;
use crate::export::{self, ExportFormat};
use crate::AppState;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

fn repository(state: &AppState) -> PatientRepository {
    PatientRepository::new(state.pool.clone())
}

/// Lists patients with search and pagination
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<PatientListResponse>, ApiError> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);

    let result = repository(&state)
        .list(query.search.as_deref(), page, limit)
        .await?;

    Ok(Json(PatientListResponse {
        pagination: Pagination::new(page, limit, result.total),
        patients: result.patients.into_iter().map(Into::into).collect(),
    }))
}

/// Registers a new patient
pub async fn create_patient(
    State(state): State<AppState>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let patient = Patient::new(request.into())?;
    repository(&state).create(&patient).await?;

    info!(patient_id = %patient.id, "patient registered");
    Ok((StatusCode::CREATED, Json(patient.into())))
}

/// Gets a patient by id
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientResponse>, ApiError> {
    let patient = repository(&state).get(id).await?;
    Ok(Json(patient.into()))
}

/// Updates a patient
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, ApiError> {
    let repo = repository(&state);
    let mut patient = repo.get(id).await?;

    patient.apply_update(
        request.name,
        request.email,
        request.phone,
        request.address,
        request.date_of_birth,
    )?;
    repo.update(&patient).await?;

    Ok(Json(patient.into()))
}

/// Deletes a patient, optionally cascading onto their bills
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeletePatientQuery>,
) -> Result<Json<DeletePatientResponse>, ApiError> {
    let bills_deleted = repository(&state).delete(id, query.delete_bills).await?;

    Ok(Json(DeletePatientResponse {
        message: "Patient deleted successfully".to_string(),
        bills_deleted,
    }))
}

/// Deletes a set of patients in one transaction
pub async fn bulk_delete_patients(
    State(state): State<AppState>,
    Json(request): Json<BulkDeletePatientsRequest>,
) -> Result<Json<BulkDeletePatientsResponse>, ApiError> {
    if request.ids.is_empty() {
        return Err(ApiError::BadRequest("No patient IDs provided".to_string()));
    }

    let (patients_deleted, bills_deleted) = repository(&state)
        .bulk_delete(&request.ids, request.delete_bills)
        .await?;

    info!(patients_deleted, bills_deleted, "bulk patient delete");
    Ok(Json(BulkDeletePatientsResponse {
        message: "Patients deleted successfully".to_string(),
        patients_deleted,
        bills_deleted,
    }))
}

/// Exports patients as a flat projection, with CSV rendered on request
pub async fn export_patients(
    State(state): State<AppState>,
    Json(request): Json<ExportPatientsRequest>,
) -> Result<Json<PatientsExportResponse>, ApiError> {
    let patients = repository(&state)
        .find_for_export(request.ids.as_deref())
        .await?;

    if patients.is_empty() {
        return Err(ApiError::NotFound("No patients found to export".to_string()));
    }

    let data: Vec<PatientExportRow> = patients.iter().map(PatientExportRow::from_patient).collect();
    let columns = export::patient_columns();
    let csv = matches!(request.format, ExportFormat::Csv)
        .then(|| export::to_csv(&columns, &data));

    Ok(Json(PatientsExportResponse {
        count: data.len(),
        data,
        columns,
        format: request.format,
        csv,
    }))
}
