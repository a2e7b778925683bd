//! Bill DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::Money;
use domain_billing::{Bill, BillExportRow, BillStatus, LineItem, Payment, PatientSummary};

use crate::export::{ExportColumn, ExportFormat};

#[derive(Debug, Deserialize)]
pub struct LineItemDto {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl From<LineItemDto> for LineItem {
    fn from(dto: LineItemDto) -> Self {
        LineItem::new(dto.description, dto.quantity, Money::new(dto.unit_price))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub patient_id: Uuid,
    pub items: Vec<LineItemDto>,
    pub tax: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBillRequest {
    pub items: Option<Vec<LineItemDto>>,
    pub tax: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Manual status edit; `cancelled` sticks, anything else is re-derived
    pub status: Option<BillStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    pub method: domain_billing::PaymentMethod,
    pub reference: Option<String>,
}

/// One line item with its derived amount
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub amount: Money,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            amount: item.amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatientSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<PatientSummary> for PatientSummaryResponse {
    fn from(summary: PatientSummary) -> Self {
        Self {
            id: *summary.id.as_uuid(),
            name: summary.name,
            email: summary.email,
            phone: summary.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillResponse {
    pub id: Uuid,
    pub bill_number: String,
    pub patient_id: Uuid,
    /// Present when the patient link resolves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummaryResponse>,
    pub items: Vec<LineItemResponse>,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub balance: Money,
    pub status: BillStatus,
    pub payments: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillResponse {
    /// Builds the response shape from the aggregate and its patient summary
    pub fn from_bill(bill: Bill, patient: Option<PatientSummary>) -> Self {
        Self {
            id: *bill.id.as_uuid(),
            bill_number: bill.bill_number.to_string(),
            patient_id: *bill.patient_id.as_uuid(),
            patient: patient.map(Into::into),
            items: bill.items.iter().map(Into::into).collect(),
            subtotal: bill.subtotal,
            tax: bill.tax,
            discount: bill.discount,
            total_amount: bill.total_amount,
            paid_amount: bill.paid_amount,
            balance: bill.balance_due(),
            status: bill.status,
            payments: bill.payments,
            notes: bill.notes,
            due_date: bill.due_date,
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}

/// Query parameters for the bill listing
#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    /// Status filter; omitted or `"all"` matches everything
    pub status: Option<String>,
    pub patient_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ExportBillsRequest {
    pub ids: Option<Vec<Uuid>>,
    pub status: Option<String>,
    pub date_range: Option<DateRange>,
    pub format: ExportFormat,
}

#[derive(Debug, Serialize)]
pub struct BillsExportResponse {
    pub data: Vec<BillExportRow>,
    pub columns: Vec<ExportColumn>,
    pub format: ExportFormat,
    pub count: usize,
    /// Rendered only when `format` is `csv`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteBillsRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteBillsResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Typed subset of fields a bulk edit may touch
#[derive(Debug, Deserialize)]
pub struct BillBulkUpdates {
    pub status: Option<BillStatus>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl BillBulkUpdates {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none() && self.due_date.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateBillsRequest {
    pub ids: Vec<Uuid>,
    pub updates: BillBulkUpdates,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateBillsResponse {
    pub message: String,
    pub modified_count: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PatientId;
    use domain_billing::BillNumber;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bill_response_balance() {
        let mut bill = Bill::new(
            PatientId::new(),
            BillNumber::assign(1, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            vec![LineItem::new("Consultation", 1, Money::new(dec!(500)))],
            Money::zero(),
            Money::zero(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            None,
        )
        .unwrap();
        bill.record_payment(Money::new(dec!(200)), domain_billing::PaymentMethod::Cash, None)
            .unwrap();

        let response = BillResponse::from_bill(bill, None);

        assert_eq!(response.balance.amount(), dec!(300));
        assert_eq!(response.items[0].amount.amount(), dec!(500));
        assert_eq!(response.status, BillStatus::Partial);
    }

    #[test]
    fn test_bulk_updates_emptiness() {
        let empty = BillBulkUpdates {
            status: None,
            notes: None,
            due_date: None,
        };
        assert!(empty.is_empty());

        let some = BillBulkUpdates {
            status: Some(BillStatus::Cancelled),
            notes: None,
            due_date: None,
        };
        assert!(!some.is_empty());
    }
}
