//! Thermal receipt layout
//!
//! Sized for 80mm thermal printers: 32 monospace columns, dashed rules
//! between sections, per-item unit price lines, and a trailing barcode
//! placeholder line. Settled bills print as payment receipts, everything
//! else as an invoice.

use domain_billing::{Bill, BillStatus, PatientSummary};

use super::{center, right_align, truncate, two_col, ClinicInfo};

/// Printable width in columns
pub const WIDTH: usize = 32;

const ITEM_DESC_WIDTH: usize = 16;
const ITEM_QTY_WIDTH: usize = 4;
const ITEM_AMOUNT_WIDTH: usize = 12;

/// Renders the 80mm thermal layout
pub fn render_thermal(
    bill: &Bill,
    patient: Option<&PatientSummary>,
    clinic: &ClinicInfo,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    let rule = "-".repeat(WIDTH);

    // Header
    lines.push(center(&clinic.name, WIDTH));
    lines.push(center(&clinic.address, WIDTH));
    lines.push(center(&format!("Tel: {}", clinic.phone), WIDTH));
    lines.push(rule.clone());

    // Receipt type
    let title = if bill.status == BillStatus::Paid {
        "*** PAYMENT RECEIPT ***"
    } else {
        "*** INVOICE ***"
    };
    lines.push(center(title, WIDTH));
    lines.push(rule.clone());

    // Bill info
    lines.push(two_col("Bill #:", bill.bill_number.as_str(), WIDTH));
    lines.push(two_col(
        "Date:",
        &bill.created_at.format("%d/%m/%Y %H:%M").to_string(),
        WIDTH,
    ));
    lines.push(two_col(
        "Due:",
        &bill.due_date.format("%d/%m/%Y").to_string(),
        WIDTH,
    ));
    lines.push(rule.clone());

    // Patient info
    lines.push("Patient:".to_string());
    match patient {
        Some(p) => {
            lines.push(truncate(&p.name, WIDTH));
            lines.push(truncate(&p.phone, WIDTH));
        }
        None => lines.push("N/A".to_string()),
    }
    lines.push(rule.clone());

    // Items
    lines.push(format!(
        "{}{}{}",
        two_col("Item", "", ITEM_DESC_WIDTH),
        right_align("Qty", ITEM_QTY_WIDTH),
        right_align("Amount", ITEM_AMOUNT_WIDTH),
    ));
    for item in &bill.items {
        lines.push(format!(
            "{}{}{}",
            two_col(&item.description, "", ITEM_DESC_WIDTH),
            right_align(&item.quantity.to_string(), ITEM_QTY_WIDTH),
            right_align(&item.amount().to_string(), ITEM_AMOUNT_WIDTH),
        ));
        lines.push(truncate(
            &format!("  @ {} each", item.unit_price),
            WIDTH,
        ));
    }
    lines.push(rule.clone());

    // Totals
    lines.push(two_col("Subtotal:", &bill.subtotal.to_string(), WIDTH));
    if bill.tax.is_positive() {
        lines.push(two_col("Tax:", &bill.tax.to_string(), WIDTH));
    }
    if bill.discount.is_positive() {
        lines.push(two_col("Discount:", &format!("-{}", bill.discount), WIDTH));
    }
    lines.push(two_col("TOTAL:", &bill.total_amount.to_string(), WIDTH));
    lines.push(rule.clone());

    // Payment info
    lines.push(two_col("Paid:", &bill.paid_amount.to_string(), WIDTH));
    if bill.balance_due().is_positive() {
        lines.push(two_col("Balance Due:", &bill.balance_due().to_string(), WIDTH));
    }
    lines.push(two_col(
        "Status:",
        &bill.status.as_str().to_uppercase(),
        WIDTH,
    ));
    lines.push(rule.clone());

    // Payment history
    if !bill.payments.is_empty() {
        lines.push("Payment History:".to_string());
        for payment in &bill.payments {
            lines.push(format!(
                "{}{}{}",
                two_col(&payment.date.format("%d/%m/%y").to_string(), "", 10),
                two_col(payment.method.as_str(), "", 10),
                right_align(&payment.amount.to_string(), WIDTH - 20),
            ));
        }
        lines.push(rule.clone());
    }

    // Footer
    lines.push(center("Thank you for your visit!", WIDTH));
    lines.push(center(&format!("Questions? Call {}", clinic.phone), WIDTH));
    lines.push(rule);
    lines.push(center("*** END OF RECEIPT ***", WIDTH));
    lines.push(center(
        &truncate(&format!("||| {} |||", bill.bill_number), WIDTH),
        WIDTH,
    ));

    let mut receipt = lines.join("\n");
    receipt.push('\n');
    receipt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::{Money, PatientId};
    use domain_billing::{BillNumber, LineItem, PaymentMethod};
    use rust_decimal_macros::dec;

    fn sample_bill() -> Bill {
        Bill::new(
            PatientId::new(),
            BillNumber::assign(5, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            vec![
                LineItem::new("Consultation", 1, Money::new(dec!(500))),
                LineItem::new("Complete Blood Count Panel", 2, Money::new(dec!(150))),
            ],
            Money::new(dec!(50)),
            Money::zero(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            None,
        )
        .unwrap()
    }

    fn sample_patient() -> PatientSummary {
        PatientSummary {
            id: PatientId::new(),
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
        }
    }

    #[test]
    fn test_every_line_fits_the_printer() {
        let receipt = render_thermal(&sample_bill(), Some(&sample_patient()), &ClinicInfo::default());

        for line in receipt.lines() {
            assert!(
                line.chars().count() <= WIDTH,
                "line exceeds {WIDTH} cols: {line:?}"
            );
        }
    }

    #[test]
    fn test_unpaid_bill_is_an_invoice() {
        let receipt = render_thermal(&sample_bill(), None, &ClinicInfo::default());
        assert!(receipt.contains("*** INVOICE ***"));
        assert!(receipt.contains("Balance Due:"));
        assert!(receipt.contains("PENDING"));
    }

    #[test]
    fn test_settled_bill_is_a_payment_receipt() {
        let mut bill = sample_bill();
        bill.record_payment(Money::new(dec!(850)), PaymentMethod::Cash, None)
            .unwrap();

        let receipt = render_thermal(&bill, Some(&sample_patient()), &ClinicInfo::default());

        assert!(receipt.contains("*** PAYMENT RECEIPT ***"));
        // Settled: no balance line
        assert!(!receipt.contains("Balance Due:"));
        assert!(receipt.contains("Payment History:"));
        assert!(receipt.contains("cash"));
    }

    #[test]
    fn test_missing_patient_prints_na() {
        let receipt = render_thermal(&sample_bill(), None, &ClinicInfo::default());
        assert!(receipt.contains("Patient:\nN/A"));
    }

    #[test]
    fn test_barcode_line_carries_bill_number() {
        let receipt = render_thermal(&sample_bill(), None, &ClinicInfo::default());
        assert!(receipt.contains("BILL-2503-0005"));
    }
}
