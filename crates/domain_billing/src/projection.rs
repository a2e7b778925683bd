//! Flat export projection
//!
//! Spreadsheet, CSV and PDF consumers all take the same row-oriented
//! projection of a bill joined with its patient. The projection is the
//! billing domain's only obligation to the export pipeline: amounts are
//! carried as exact decimals (`balance` always equals the live
//! `balance_due()`), dates as ISO date strings.

use serde::{Deserialize, Serialize};

use core_kernel::{BillId, Money, PatientId};

use crate::bill::{Bill, LineItem};

/// Fallback used when a bill's patient link does not resolve
const MISSING_PATIENT: &str = "N/A";

/// The patient fields a bill carries alongside its own data when listed,
/// exported, or printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: PatientId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// One bill flattened for tabular export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillExportRow {
    pub id: BillId,
    pub bill_number: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    /// Item summary, e.g. `"Consultation (1x); Lab Test (2x)"`
    pub items: String,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total_amount: Money,
    pub paid_amount: Money,
    /// `total_amount - paid_amount`
    pub balance: Money,
    pub status: String,
    /// ISO date (`YYYY-MM-DD`)
    pub due_date: String,
    /// ISO date (`YYYY-MM-DD`)
    pub created_at: String,
}

impl BillExportRow {
    /// Flattens a bill and its (optional) patient into an export row
    pub fn from_bill(bill: &Bill, patient: Option<&PatientSummary>) -> Self {
        Self {
            id: bill.id,
            bill_number: bill.bill_number.to_string(),
            patient_name: patient
                .map(|p| p.name.clone())
                .unwrap_or_else(|| MISSING_PATIENT.to_string()),
            patient_email: patient
                .map(|p| p.email.clone())
                .unwrap_or_else(|| MISSING_PATIENT.to_string()),
            patient_phone: patient
                .map(|p| p.phone.clone())
                .unwrap_or_else(|| MISSING_PATIENT.to_string()),
            items: items_summary(&bill.items),
            subtotal: bill.subtotal,
            tax: bill.tax,
            discount: bill.discount,
            total_amount: bill.total_amount,
            paid_amount: bill.paid_amount,
            balance: bill.balance_due(),
            status: bill.status.to_string(),
            due_date: bill.due_date.format("%Y-%m-%d").to_string(),
            created_at: bill.created_at.date_naive().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Renders the one-line item summary used in exports:
/// `"<description> (<quantity>x)"` entries joined with `"; "`
pub fn items_summary(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|item| format!("{} ({}x)", item.description, item.quantity))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::BillStatus;
    use crate::bill_number::BillNumber;
    use crate::payment::PaymentMethod;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_bill() -> Bill {
        Bill::new(
            PatientId::new(),
            BillNumber::assign(5, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()),
            vec![
                LineItem::new("Consultation", 1, Money::new(dec!(500))),
                LineItem::new("Lab Test", 2, Money::new(dec!(150))),
            ],
            Money::new(dec!(50)),
            Money::zero(),
            NaiveDate::from_ymd_opt(2025, 4, 9).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_items_summary_format() {
        let bill = sample_bill();
        assert_eq!(items_summary(&bill.items), "Consultation (1x); Lab Test (2x)");
    }

    #[test]
    fn test_balance_matches_live_value() {
        let mut bill = sample_bill();
        bill.record_payment(Money::new(dec!(400)), PaymentMethod::Cash, None)
            .unwrap();

        let row = BillExportRow::from_bill(&bill, None);

        assert_eq!(row.balance, bill.balance_due());
        assert_eq!(row.balance.amount(), dec!(450));
        assert_eq!(row.status, BillStatus::Partial.to_string());
    }

    #[test]
    fn test_missing_patient_falls_back() {
        let row = BillExportRow::from_bill(&sample_bill(), None);
        assert_eq!(row.patient_name, "N/A");
        assert_eq!(row.patient_email, "N/A");
        assert_eq!(row.patient_phone, "N/A");
    }

    #[test]
    fn test_dates_are_iso() {
        let row = BillExportRow::from_bill(&sample_bill(), None);
        assert_eq!(row.due_date, "2025-04-09");
    }

    #[test]
    fn test_round_trip_preserves_balance() {
        let mut bill = sample_bill();
        bill.record_payment(Money::new(dec!(123.45)), PaymentMethod::Upi, None)
            .unwrap();

        let row = BillExportRow::from_bill(&bill, None);
        let json = serde_json::to_string(&row).unwrap();
        let back: BillExportRow = serde_json::from_str(&json).unwrap();

        assert_eq!(back.balance, bill.balance_due());
        assert_eq!(back.total_amount - back.paid_amount, back.balance);
    }
}
