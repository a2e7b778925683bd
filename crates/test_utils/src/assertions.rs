//! Domain-specific test assertions

use core_kernel::Money;
use domain_billing::{Bill, BillStatus};

/// Asserts the derived totals of a bill are internally consistent:
/// subtotal matches the items, the total matches the arithmetic rule, and
/// the paid amount matches the ledger.
///
/// # Panics
///
/// Panics with a descriptive message when any invariant does not hold.
pub fn assert_bill_consistent(bill: &Bill) {
    let item_sum: Money = bill.items.iter().map(|i| i.amount()).sum();
    assert_eq!(
        bill.subtotal, item_sum,
        "subtotal {} != item sum {}",
        bill.subtotal, item_sum
    );

    let expected_total = bill.subtotal + bill.tax - bill.discount;
    assert_eq!(
        bill.total_amount, expected_total,
        "total {} != subtotal + tax - discount {}",
        bill.total_amount, expected_total
    );

    let ledger_sum: Money = bill.payments.iter().map(|p| p.amount).sum();
    assert_eq!(
        bill.paid_amount, ledger_sum,
        "paid {} != ledger sum {}",
        bill.paid_amount, ledger_sum
    );

    if bill.status != BillStatus::Cancelled {
        assert_eq!(
            bill.status,
            BillStatus::derive(bill.paid_amount, bill.total_amount),
            "status does not match the derivation rule"
        );
    }
}

/// Asserts a bill's balance due
///
/// # Panics
///
/// Panics when the balance differs.
pub fn assert_balance(bill: &Bill, expected: Money) {
    assert_eq!(
        bill.balance_due(),
        expected,
        "balance {} != expected {}",
        bill.balance_due(),
        expected
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::TestBillBuilder;
    use domain_billing::PaymentMethod;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fresh_bill_is_consistent() {
        let bill = TestBillBuilder::new().build();
        assert_bill_consistent(&bill);
        assert_balance(&bill, Money::new(dec!(850)));
    }

    #[test]
    fn test_paid_bill_is_consistent() {
        let mut bill = TestBillBuilder::new().build();
        bill.record_payment(Money::new(dec!(850)), PaymentMethod::Cash, None)
            .unwrap();
        assert_bill_consistent(&bill);
        assert_balance(&bill, Money::zero());
    }
}
