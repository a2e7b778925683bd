//! Billing domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Bill not found
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Payment amount must be strictly positive
    #[error("Invalid payment amount: {0}")]
    InvalidPaymentAmount(Decimal),

    /// Bill number does not match the BILL-YYMM-NNNN shape
    #[error("Invalid bill number: {0}")]
    InvalidBillNumber(String),

    /// Unknown status value
    #[error("Invalid bill status: {0}")]
    InvalidStatus(String),

    /// Unknown payment method
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    /// Arithmetic failure
    #[error("Calculation error: {0}")]
    Calculation(#[from] MoneyError),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }
}
