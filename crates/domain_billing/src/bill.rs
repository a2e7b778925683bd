//! The bill aggregate
//!
//! A `Bill` owns one invoice's financial state: its line items, tax and
//! discount, the derived totals, the append-only payment ledger, and the
//! derived payment status. Everything else in the system is a consumer or
//! producer of this data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{BillId, Money, PatientId};

use crate::bill_number::BillNumber;
use crate::error::BillingError;
use crate::payment::{Payment, PaymentMethod};

/// Payment status of a bill
///
/// `Pending`, `Partial` and `Paid` are derived purely from
/// `(paid_amount, total_amount)`. `Cancelled` is a manual state: no
/// derivation reaches it, and once set neither edits nor payment appends
/// leave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Nothing paid yet
    Pending,
    /// Partially paid
    Partial,
    /// Fully settled
    Paid,
    /// Voided by an operator
    Cancelled,
}

impl BillStatus {
    /// Returns the wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Partial => "partial",
            BillStatus::Paid => "paid",
            BillStatus::Cancelled => "cancelled",
        }
    }

    /// Derives the status from what has been paid against what is owed.
    ///
    /// `cancelled` is never produced here; it is an out-of-band state.
    pub fn derive(paid_amount: Money, total_amount: Money) -> Self {
        if paid_amount >= total_amount {
            BillStatus::Paid
        } else if paid_amount.is_positive() {
            BillStatus::Partial
        } else {
            BillStatus::Pending
        }
    }

    /// Whether the bill still counts toward outstanding receivables
    pub fn is_outstanding(&self) -> bool {
        matches!(self, BillStatus::Pending | BillStatus::Partial)
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "partial" => Ok(BillStatus::Partial),
            "paid" => Ok(BillStatus::Paid),
            "cancelled" => Ok(BillStatus::Cancelled),
            other => Err(BillingError::InvalidStatus(other.to_string())),
        }
    }
}

/// One billable service or product entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// What was billed
    pub description: String,
    /// Units billed, at least 1
    pub quantity: u32,
    /// Price per unit, non-negative
    pub unit_price: Money,
}

impl LineItem {
    /// Creates a line item
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: Money) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// The line amount: `quantity x unit_price`. Derived, never stored on
    /// the item itself.
    pub fn amount(&self) -> Money {
        self.unit_price * self.quantity
    }

    fn validate(&self) -> Result<(), BillingError> {
        if self.description.trim().is_empty() {
            return Err(BillingError::validation("item description is required"));
        }
        if self.quantity < 1 {
            return Err(BillingError::validation("item quantity must be at least 1"));
        }
        if self.unit_price.is_negative() {
            return Err(BillingError::validation("item unit price cannot be negative"));
        }
        Ok(())
    }
}

/// A single invoice for one patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: BillId,
    /// Human-readable number, assigned once at creation
    pub bill_number: BillNumber,
    /// The billed patient
    pub patient_id: PatientId,
    /// Line items
    pub items: Vec<LineItem>,
    /// Sum of item amounts
    pub subtotal: Money,
    /// Flat tax amount (not derived from items)
    pub tax: Money,
    /// Flat discount amount
    pub discount: Money,
    /// `subtotal + tax - discount`; may go negative when the discount
    /// exceeds the rest
    pub total_amount: Money,
    /// Sum of the payment ledger
    pub paid_amount: Money,
    /// Derived payment status
    pub status: BillStatus,
    /// Append-only payment ledger
    pub payments: Vec<Payment>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Creates a new bill with all derived fields computed up front.
    ///
    /// The bill number must already be reserved from the storage sequence.
    /// A new bill always starts `pending` with an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Validation` when an item is malformed or tax
    /// or discount are negative.
    pub fn new(
        patient_id: PatientId,
        bill_number: BillNumber,
        items: Vec<LineItem>,
        tax: Money,
        discount: Money,
        due_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self, BillingError> {
        for item in &items {
            item.validate()?;
        }
        if tax.is_negative() {
            return Err(BillingError::validation("tax cannot be negative"));
        }
        if discount.is_negative() {
            return Err(BillingError::validation("discount cannot be negative"));
        }

        let now = Utc::now();
        let subtotal: Money = items.iter().map(LineItem::amount).sum();
        let total_amount = subtotal + tax - discount;

        Ok(Self {
            id: BillId::new_v7(),
            bill_number,
            patient_id,
            items,
            subtotal,
            tax,
            discount,
            total_amount,
            paid_amount: Money::zero(),
            status: BillStatus::Pending,
            payments: Vec::new(),
            notes,
            due_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Appends a line item and recomputes the totals
    pub fn add_item(&mut self, item: LineItem) -> Result<(), BillingError> {
        item.validate()?;
        self.items.push(item);
        self.recalculate_totals();
        Ok(())
    }

    /// Replaces the item list and recomputes the totals
    pub fn set_items(&mut self, items: Vec<LineItem>) -> Result<(), BillingError> {
        for item in &items {
            item.validate()?;
        }
        self.items = items;
        self.recalculate_totals();
        Ok(())
    }

    /// Sets the flat tax amount
    pub fn set_tax(&mut self, tax: Money) -> Result<(), BillingError> {
        if tax.is_negative() {
            return Err(BillingError::validation("tax cannot be negative"));
        }
        self.tax = tax;
        self.recalculate_totals();
        Ok(())
    }

    /// Sets the flat discount amount
    pub fn set_discount(&mut self, discount: Money) -> Result<(), BillingError> {
        if discount.is_negative() {
            return Err(BillingError::validation("discount cannot be negative"));
        }
        self.discount = discount;
        self.recalculate_totals();
        Ok(())
    }

    /// Records a payment against the bill.
    ///
    /// Appends to the ledger, recomputes `paid_amount`, and re-derives the
    /// status. Amounts above the balance due are accepted; the ledger is an
    /// audit trail, not a gatekeeper. Existing entries are never touched.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidPaymentAmount` unless `amount > 0`.
    pub fn record_payment(
        &mut self,
        amount: Money,
        method: PaymentMethod,
        reference: Option<String>,
    ) -> Result<&Payment, BillingError> {
        if !amount.is_positive() {
            return Err(BillingError::InvalidPaymentAmount(amount.amount()));
        }

        let mut payment = Payment::new(amount, method);
        if let Some(reference) = reference {
            payment = payment.with_reference(reference);
        }
        self.payments.push(payment);

        self.paid_amount = self.payments.iter().map(|p| p.amount).sum();
        self.refresh_status();
        self.updated_at = Utc::now();

        tracing::debug!(
            bill_number = %self.bill_number,
            %amount,
            method = %method,
            status = %self.status,
            "payment recorded"
        );

        Ok(self.payments.last().expect("payment was just appended"))
    }

    /// Voids the bill. Manual transition, reachable from any state.
    pub fn cancel(&mut self) {
        self.status = BillStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    /// Applies an operator-chosen status.
    ///
    /// `cancelled` sticks; any other value is immediately overridden by the
    /// derivation rule, so setting `pending` on a paid bill is a no-op.
    pub fn set_status(&mut self, status: BillStatus) {
        self.status = status;
        self.refresh_status();
        self.updated_at = Utc::now();
    }

    /// The balance due: `total_amount - paid_amount`
    pub fn balance_due(&self) -> Money {
        self.total_amount - self.paid_amount
    }

    /// Recomputes `subtotal` and `total_amount` from items, tax and
    /// discount, then re-derives the status
    fn recalculate_totals(&mut self) {
        self.subtotal = self.items.iter().map(LineItem::amount).sum();
        self.total_amount = self.subtotal + self.tax - self.discount;
        self.refresh_status();
        self.updated_at = Utc::now();
    }

    fn refresh_status(&mut self) {
        if self.status != BillStatus::Cancelled {
            self.status = BillStatus::derive(self.paid_amount, self.total_amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn consultation_bill() -> Bill {
        Bill::new(
            PatientId::new(),
            BillNumber::assign(1, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
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

    #[test]
    fn test_new_bill_totals() {
        let bill = consultation_bill();

        assert_eq!(bill.subtotal.amount(), dec!(800));
        assert_eq!(bill.total_amount.amount(), dec!(850));
        assert_eq!(bill.paid_amount, Money::zero());
        assert_eq!(bill.status, BillStatus::Pending);
        assert!(bill.payments.is_empty());
    }

    #[test]
    fn test_item_amount_is_derived() {
        let item = LineItem::new("Lab Test", 2, Money::new(dec!(150)));
        assert_eq!(item.amount().amount(), dec!(300));
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let result = Bill::new(
            PatientId::new(),
            BillNumber::assign(1, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            vec![LineItem::new("Consultation", 0, Money::new(dec!(500)))],
            Money::zero(),
            Money::zero(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            None,
        );
        assert!(matches!(result, Err(BillingError::Validation(_))));
    }

    #[test]
    fn test_full_payment_marks_paid() {
        let mut bill = consultation_bill();
        bill.record_payment(Money::new(dec!(850)), PaymentMethod::Cash, None)
            .unwrap();

        assert_eq!(bill.paid_amount.amount(), dec!(850));
        assert_eq!(bill.status, BillStatus::Paid);
    }

    #[test]
    fn test_partial_then_settling_payment() {
        let mut bill = consultation_bill();

        bill.record_payment(Money::new(dec!(400)), PaymentMethod::Cash, None)
            .unwrap();
        assert_eq!(bill.paid_amount.amount(), dec!(400));
        assert_eq!(bill.status, BillStatus::Partial);

        bill.record_payment(Money::new(dec!(450)), PaymentMethod::Card, None)
            .unwrap();
        assert_eq!(bill.paid_amount.amount(), dec!(850));
        assert_eq!(bill.status, BillStatus::Paid);
        assert_eq!(bill.payments.len(), 2);
        // Append order is preserved
        assert_eq!(bill.payments[0].amount.amount(), dec!(400));
        assert_eq!(bill.payments[1].amount.amount(), dec!(450));
    }

    #[test]
    fn test_payment_append_never_alters_history() {
        let mut bill = consultation_bill();
        bill.record_payment(Money::new(dec!(100)), PaymentMethod::Upi, Some("UPI-1".into()))
            .unwrap();
        let first = bill.payments[0].clone();

        bill.record_payment(Money::new(dec!(200)), PaymentMethod::Cash, None)
            .unwrap();

        assert_eq!(bill.payments[0], first);
    }

    #[test]
    fn test_rejects_non_positive_payment() {
        let mut bill = consultation_bill();

        assert!(matches!(
            bill.record_payment(Money::zero(), PaymentMethod::Cash, None),
            Err(BillingError::InvalidPaymentAmount(_))
        ));
        assert!(matches!(
            bill.record_payment(Money::new(dec!(-10)), PaymentMethod::Cash, None),
            Err(BillingError::InvalidPaymentAmount(_))
        ));
        assert!(bill.payments.is_empty());
    }

    #[test]
    fn test_overpayment_is_accepted() {
        let mut bill = consultation_bill();
        bill.record_payment(Money::new(dec!(1000)), PaymentMethod::Insurance, None)
            .unwrap();

        assert_eq!(bill.status, BillStatus::Paid);
        assert_eq!(bill.balance_due().amount(), dec!(-150));
    }

    #[test]
    fn test_discount_can_push_total_negative() {
        let mut bill = consultation_bill();
        bill.set_discount(Money::new(dec!(900))).unwrap();

        // 800 + 50 - 900: accepted as-is, no clamping
        assert_eq!(bill.total_amount.amount(), dec!(-50));
    }

    #[test]
    fn test_edit_rederives_status() {
        let mut bill = consultation_bill();
        bill.record_payment(Money::new(dec!(400)), PaymentMethod::Cash, None)
            .unwrap();
        assert_eq!(bill.status, BillStatus::Partial);

        // Lowering the total below what was already paid settles the bill
        bill.set_items(vec![LineItem::new("Consultation", 1, Money::new(dec!(300)))])
            .unwrap();
        assert_eq!(bill.total_amount.amount(), dec!(350));
        assert_eq!(bill.status, BillStatus::Paid);

        // And raising it back reopens the balance
        bill.set_tax(Money::new(dec!(200))).unwrap();
        assert_eq!(bill.status, BillStatus::Partial);
    }

    #[test]
    fn test_cancelled_is_sticky() {
        let mut bill = consultation_bill();
        bill.cancel();
        assert_eq!(bill.status, BillStatus::Cancelled);

        bill.record_payment(Money::new(dec!(850)), PaymentMethod::Cash, None)
            .unwrap();
        assert_eq!(bill.status, BillStatus::Cancelled);
        assert_eq!(bill.paid_amount.amount(), dec!(850));

        bill.set_tax(Money::new(dec!(10))).unwrap();
        assert_eq!(bill.status, BillStatus::Cancelled);
    }

    #[test]
    fn test_set_status_derives_unless_cancelled() {
        let mut bill = consultation_bill();
        bill.record_payment(Money::new(dec!(850)), PaymentMethod::Cash, None)
            .unwrap();

        // An operator cannot force a settled bill back to pending
        bill.set_status(BillStatus::Pending);
        assert_eq!(bill.status, BillStatus::Paid);

        bill.set_status(BillStatus::Cancelled);
        assert_eq!(bill.status, BillStatus::Cancelled);
    }

    #[test]
    fn test_empty_items_subtotal_zero() {
        let bill = Bill::new(
            PatientId::new(),
            BillNumber::assign(1, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            Vec::new(),
            Money::zero(),
            Money::zero(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            None,
        )
        .unwrap();

        assert_eq!(bill.subtotal, Money::zero());
        assert_eq!(bill.status, BillStatus::Pending);
    }
}
