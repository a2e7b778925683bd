//! Standard receipt layout
//!
//! Full-page 72-column layout: clinic header, bill and patient blocks, an
//! itemized table, the totals column, and the payment history.

use domain_billing::{Bill, BillStatus, PatientSummary};

use super::{center, right_align, truncate, two_col, ClinicInfo};

/// Printable width in columns
pub const WIDTH: usize = 72;

const DESC_WIDTH: usize = 38;
const QTY_WIDTH: usize = 6;
const PRICE_WIDTH: usize = 14;
const AMOUNT_WIDTH: usize = 14;

/// Renders the standard full-page layout
pub fn render_standard(
    bill: &Bill,
    patient: Option<&PatientSummary>,
    clinic: &ClinicInfo,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    let heavy_rule = "=".repeat(WIDTH);
    let rule = "-".repeat(WIDTH);

    // Header
    lines.push(heavy_rule.clone());
    lines.push(center(&clinic.name, WIDTH));
    lines.push(center(&clinic.address, WIDTH));
    lines.push(center(&format!("Tel: {}", clinic.phone), WIDTH));
    lines.push(heavy_rule.clone());
    lines.push(String::new());

    let title = if bill.status == BillStatus::Paid {
        "PAYMENT RECEIPT"
    } else {
        "INVOICE"
    };
    lines.push(title.to_string());
    lines.push(String::new());

    // Bill meta
    lines.push(two_col(
        &format!("Bill Number: {}", bill.bill_number),
        &format!("Date: {}", bill.created_at.format("%d/%m/%Y")),
        WIDTH,
    ));
    lines.push(two_col(
        &format!("Due Date: {}", bill.due_date.format("%d/%m/%Y")),
        &format!("Status: {}", bill.status.as_str().to_uppercase()),
        WIDTH,
    ));
    lines.push(String::new());

    // Patient block
    lines.push("Billed To:".to_string());
    match patient {
        Some(p) => {
            lines.push(format!("  {}", truncate(&p.name, WIDTH - 2)));
            lines.push(format!("  {}", truncate(&p.email, WIDTH - 2)));
            lines.push(format!("  {}", truncate(&p.phone, WIDTH - 2)));
        }
        None => lines.push("  N/A".to_string()),
    }
    lines.push(String::new());

    // Item table
    lines.push(rule.clone());
    lines.push(format!(
        "{}{}{}{}",
        two_col("Description", "", DESC_WIDTH),
        right_align("Qty", QTY_WIDTH),
        right_align("Unit Price", PRICE_WIDTH),
        right_align("Amount", AMOUNT_WIDTH),
    ));
    lines.push(rule.clone());
    for item in &bill.items {
        lines.push(format!(
            "{}{}{}{}",
            two_col(&item.description, "", DESC_WIDTH),
            right_align(&item.quantity.to_string(), QTY_WIDTH),
            right_align(&item.unit_price.to_string(), PRICE_WIDTH),
            right_align(&item.amount().to_string(), AMOUNT_WIDTH),
        ));
    }
    lines.push(rule.clone());

    // Totals column
    lines.push(totals_line("Subtotal:", &bill.subtotal.to_string()));
    if bill.tax.is_positive() {
        lines.push(totals_line("Tax:", &bill.tax.to_string()));
    }
    if bill.discount.is_positive() {
        lines.push(totals_line("Discount:", &format!("-{}", bill.discount)));
    }
    lines.push(totals_line("TOTAL:", &bill.total_amount.to_string()));
    lines.push(totals_line("Paid:", &bill.paid_amount.to_string()));
    if bill.balance_due().is_positive() {
        lines.push(totals_line("Balance Due:", &bill.balance_due().to_string()));
    }

    // Payment history
    if !bill.payments.is_empty() {
        lines.push(rule.clone());
        lines.push("Payment History:".to_string());
        for payment in &bill.payments {
            let reference = payment
                .reference
                .as_deref()
                .map(|r| format!("  ({})", r))
                .unwrap_or_default();
            lines.push(truncate(
                &format!(
                    "  {}  {:<10}{}{}",
                    payment.date.format("%d/%m/%Y"),
                    payment.method.as_str(),
                    right_align(&payment.amount.to_string(), 14),
                    reference,
                ),
                WIDTH,
            ));
        }
    }

    lines.push(rule);
    lines.push(center("Thank you for your visit!", WIDTH));

    let mut receipt = lines.join("\n");
    receipt.push('\n');
    receipt
}

fn totals_line(label: &str, value: &str) -> String {
    // Labels sit in the amount columns on the right-hand side of the page
    let left_pad = WIDTH - PRICE_WIDTH - AMOUNT_WIDTH;
    format!(
        "{}{}{}",
        " ".repeat(left_pad),
        two_col(label, "", PRICE_WIDTH),
        right_align(value, AMOUNT_WIDTH),
    )
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
                LineItem::new("Lab Test", 2, Money::new(dec!(150))),
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
    fn test_lines_fit_the_page() {
        let mut bill = sample_bill();
        bill.record_payment(Money::new(dec!(400)), PaymentMethod::Upi, Some("UPI-9".into()))
            .unwrap();
        let receipt = render_standard(&bill, Some(&sample_patient()), &ClinicInfo::default());

        for line in receipt.lines() {
            assert!(
                line.chars().count() <= WIDTH,
                "line exceeds {WIDTH} cols: {line:?}"
            );
        }
    }

    #[test]
    fn test_invoice_title_and_patient_block() {
        let receipt = render_standard(&sample_bill(), Some(&sample_patient()), &ClinicInfo::default());

        assert!(receipt.contains("INVOICE"));
        assert!(receipt.contains("Billed To:"));
        assert!(receipt.contains("  Asha Rao"));
        assert!(receipt.contains("asha@example.com"));
        assert!(receipt.contains("Bill Number: BILL-2503-0005"));
    }

    #[test]
    fn test_totals_and_balance() {
        let mut bill = sample_bill();
        bill.record_payment(Money::new(dec!(400)), PaymentMethod::Cash, None)
            .unwrap();

        let receipt = render_standard(&bill, None, &ClinicInfo::default());

        assert!(receipt.contains("Rs.800.00"));
        assert!(receipt.contains("Rs.850.00"));
        assert!(receipt.contains("Balance Due:"));
        assert!(receipt.contains("Rs.450.00"));
    }

    #[test]
    fn test_settled_bill_hides_balance() {
        let mut bill = sample_bill();
        bill.record_payment(Money::new(dec!(850)), PaymentMethod::Card, None)
            .unwrap();

        let receipt = render_standard(&bill, None, &ClinicInfo::default());

        assert!(receipt.contains("PAYMENT RECEIPT"));
        assert!(!receipt.contains("Balance Due:"));
        assert!(receipt.contains("Payment History:"));
    }
}
