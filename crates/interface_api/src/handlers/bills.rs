//! Bill handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use core_kernel::Money;
use domain_billing::stats::MonthWindows;
use domain_billing::{Bill, BillExportRow, BillNumber, BillingStats, LineItem, PatientSummary};
use infra_db::{BillFilter, BillRepository, PatientRepository};

use crate::dto::bill::*;
use crate::error::ApiError;
use crate::export::{self, ExportFormat};
use crate::receipt::{self, ReceiptLayout};
use crate::AppState;

fn bills(state: &AppState) -> BillRepository {
    BillRepository::new(state.pool.clone())
}

fn patients(state: &AppState) -> PatientRepository {
    PatientRepository::new(state.pool.clone())
}

/// Lists bills newest first, with optional status, patient and date filters
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<ListBillsQuery>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let filter = BillFilter {
        status: query.status.filter(|s| s != "all"),
        patient_id: query.patient_id,
        start_date: query.start_date,
        end_date: query.end_date,
        ..Default::default()
    };

    let rows = bills(&state).list(&filter).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(bill, patient)| BillResponse::from_bill(bill, patient))
            .collect(),
    ))
}

/// Creates a bill: totals are computed and the bill number is reserved from
/// the database sequence before the record is inserted
pub async fn create_bill(
    State(state): State<AppState>,
    Json(request): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    let bill_repo = bills(&state);

    // The patient must exist up front; the response embeds their summary
    let patient = patients(&state).get(request.patient_id).await?;

    let sequence = bill_repo.next_bill_sequence().await?;
    let bill_number = BillNumber::assign(sequence, Utc::now().date_naive());

    let items: Vec<LineItem> = request.items.into_iter().map(Into::into).collect();
    let bill = Bill::new(
        request.patient_id.into(),
        bill_number,
        items,
        request.tax.map(Money::new).unwrap_or_else(Money::zero),
        request.discount.map(Money::new).unwrap_or_else(Money::zero),
        request.due_date,
        request.notes,
    )?;

    bill_repo.create(&bill).await?;
    info!(bill_number = %bill.bill_number, total = %bill.total_amount, "bill created");

    let summary = PatientSummary {
        id: patient.id,
        name: patient.name,
        email: patient.email,
        phone: patient.phone,
    };
    Ok((
        StatusCode::CREATED,
        Json(BillResponse::from_bill(bill, Some(summary))),
    ))
}

/// Gets a bill with its patient summary
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BillResponse>, ApiError> {
    let (bill, patient) = bills(&state).get_with_patient(id).await?;
    Ok(Json(BillResponse::from_bill(bill, patient)))
}

/// Edits a bill; totals and status are re-derived from the new values
pub async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBillRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    let repo = bills(&state);
    let (mut bill, patient) = repo.get_with_patient(id).await?;

    if let Some(items) = request.items {
        bill.set_items(items.into_iter().map(Into::into).collect())?;
    }
    if let Some(tax) = request.tax {
        bill.set_tax(Money::new(tax))?;
    }
    if let Some(discount) = request.discount {
        bill.set_discount(Money::new(discount))?;
    }
    if let Some(due_date) = request.due_date {
        bill.due_date = due_date;
    }
    if let Some(notes) = request.notes {
        bill.notes = Some(notes);
    }
    if let Some(status) = request.status {
        bill.set_status(status);
    }
    bill.updated_at = Utc::now();

    repo.update(&bill).await?;
    Ok(Json(BillResponse::from_bill(bill, patient)))
}

/// Deletes a bill unconditionally
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    bills(&state).delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Bill deleted successfully".to_string(),
    }))
}

/// Records a payment and returns the updated bill
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    let repo = bills(&state);
    let (mut bill, patient) = repo.get_with_patient(id).await?;

    bill.record_payment(Money::new(request.amount), request.method, request.reference)?;
    repo.update(&bill).await?;

    Ok(Json(BillResponse::from_bill(bill, patient)))
}

/// Dashboard statistics
pub async fn billing_stats(
    State(state): State<AppState>,
) -> Result<Json<BillingStats>, ApiError> {
    let total_patients = patients(&state).count().await?;
    let windows = MonthWindows::containing(Utc::now());
    let stats = bills(&state).stats(&windows, total_patients).await?;
    Ok(Json(stats))
}

/// Exports bills as the flat projection, with CSV rendered on request
pub async fn export_bills(
    State(state): State<AppState>,
    Json(request): Json<ExportBillsRequest>,
) -> Result<Json<BillsExportResponse>, ApiError> {
    let filter = BillFilter {
        ids: request.ids.filter(|ids| !ids.is_empty()),
        status: request.status,
        start_date: request.date_range.as_ref().and_then(|r| r.start),
        end_date: request.date_range.as_ref().and_then(|r| r.end),
        ..Default::default()
    };

    let rows = bills(&state).list(&filter).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound("No bills found to export".to_string()));
    }

    let data: Vec<BillExportRow> = rows
        .iter()
        .map(|(bill, patient)| BillExportRow::from_bill(bill, patient.as_ref()))
        .collect();
    let columns = export::bill_columns();
    let csv = matches!(request.format, ExportFormat::Csv)
        .then(|| export::to_csv(&columns, &data));

    Ok(Json(BillsExportResponse {
        count: data.len(),
        data,
        columns,
        format: request.format,
        csv,
    }))
}

/// Deletes a set of bills
pub async fn bulk_delete_bills(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteBillsRequest>,
) -> Result<Json<BulkDeleteBillsResponse>, ApiError> {
    if request.ids.is_empty() {
        return Err(ApiError::BadRequest("No bill IDs provided".to_string()));
    }

    let deleted_count = bills(&state).bulk_delete(&request.ids).await?;
    info!(deleted_count, "bulk bill delete");

    Ok(Json(BulkDeleteBillsResponse {
        message: "Bills deleted successfully".to_string(),
        deleted_count,
    }))
}

/// Applies a bulk edit to a set of bills
pub async fn bulk_update_bills(
    State(state): State<AppState>,
    Json(request): Json<BulkUpdateBillsRequest>,
) -> Result<Json<BulkUpdateBillsResponse>, ApiError> {
    if request.ids.is_empty() {
        return Err(ApiError::BadRequest("No bill IDs provided".to_string()));
    }
    if request.updates.is_empty() {
        return Err(ApiError::BadRequest("No updates provided".to_string()));
    }

    let modified_count = bills(&state)
        .bulk_update(
            &request.ids,
            request.updates.status,
            request.updates.notes,
            request.updates.due_date,
        )
        .await?;

    Ok(Json(BulkUpdateBillsResponse {
        message: "Bills updated successfully".to_string(),
        modified_count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReceiptQuery {
    #[serde(default)]
    pub layout: ReceiptLayout,
}

/// Renders a printable receipt as plain text
pub async fn bill_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReceiptQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (bill, patient) = bills(&state).get_with_patient(id).await?;
    let rendered = receipt::render(
        &bill,
        patient.as_ref(),
        &state.config.clinic_info(),
        query.layout,
    );

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        rendered,
    ))
}
