//! Payment ledger entries
//!
//! A payment is one recorded money receipt against a bill's balance. The
//! ledger is append-only: entries are never edited or removed once recorded,
//! and corrections are out-of-band (refund entries are not supported).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Money, PaymentId};

use crate::error::BillingError;

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the front desk
    Cash,
    /// Credit or debit card
    Card,
    /// UPI transfer
    Upi,
    /// Settled by an insurer
    Insurance,
}

impl PaymentMethod {
    /// Returns the wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Insurance => "insurance",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "insurance" => Ok(PaymentMethod::Insurance),
            other => Err(BillingError::InvalidPaymentMethod(other.to_string())),
        }
    }
}

/// One entry in a bill's payment ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Amount received (strictly positive)
    pub amount: Money,
    /// Payment method
    pub method: PaymentMethod,
    /// When the payment was recorded
    pub date: DateTime<Utc>,
    /// External reference (card slip, UPI txn id, insurer claim ref)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Payment {
    /// Creates a new ledger entry dated now
    pub fn new(amount: Money, method: PaymentMethod) -> Self {
        Self {
            id: PaymentId::new_v7(),
            amount,
            method,
            date: Utc::now(),
            reference: None,
        }
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
