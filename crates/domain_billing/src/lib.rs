//! Billing Domain - Bill Accounts and Payment Ledger
//!
//! This crate implements the financial state of a single clinic bill:
//! line items, tax and discount, the derived totals, the append-only
//! payment ledger, and the derived payment status.
//!
//! # Derivation Rules
//!
//! All derived fields are pure functions of the data they summarize:
//! - each line item's `amount` is `quantity x unit_price`
//! - `subtotal` is the sum of item amounts
//! - `total_amount` is `subtotal + tax - discount` (never clamped)
//! - `paid_amount` is the sum of the payment ledger
//! - `status` is `paid` when `paid_amount >= total_amount`, `partial` when
//!   anything has been paid, `pending` otherwise; `cancelled` is a manual,
//!   sticky state no derivation reaches or leaves
//!
//! Derived fields are computed when the record is constructed and after
//! every mutation - there are no persistence-layer lifecycle hooks.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{Bill, LineItem, PaymentMethod};
//!
//! let mut bill = Bill::new(patient_id, bill_number, items, tax, discount, due_date, None)?;
//! bill.record_payment(Money::new(dec!(850)), PaymentMethod::Cash, None)?;
//! assert_eq!(bill.status, BillStatus::Paid);
//! ```

pub mod bill;
pub mod bill_number;
pub mod error;
pub mod payment;
pub mod projection;
pub mod stats;

pub use bill::{Bill, BillStatus, LineItem};
pub use bill_number::BillNumber;
pub use error::BillingError;
pub use payment::{Payment, PaymentMethod};
pub use projection::{BillExportRow, PatientSummary};
pub use stats::BillingStats;
