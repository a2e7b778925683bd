//! Human-readable bill numbers
//!
//! Bill numbers have the shape `BILL-YYMM-NNNN`: the creation year and month
//! followed by a zero-padded sequence number. The sequence is scoped to the
//! whole collection and never resets per month, so the suffix grows
//! monotonically across months. Assignment must come from an atomic
//! storage-layer sequence; two concurrent creations must never observe the
//! same value.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BillingError;

/// A validated `BILL-YYMM-NNNN` bill number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillNumber(String);

impl BillNumber {
    /// Prefix shared by every bill number
    pub const PREFIX: &'static str = "BILL";

    /// Formats a bill number from an already-reserved sequence value and the
    /// creation date.
    ///
    /// The sequence value comes from the storage layer's atomic counter; this
    /// function only renders it. Sequences above 9999 widen the suffix rather
    /// than wrapping.
    pub fn assign(sequence: i64, created_on: NaiveDate) -> Self {
        Self(format!(
            "{}-{:02}{:02}-{:04}",
            Self::PREFIX,
            created_on.year() % 100,
            created_on.month(),
            sequence
        ))
    }

    /// Returns the bill number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the sequence component
    pub fn sequence(&self) -> i64 {
        // Validated at construction; the last segment is always numeric.
        self.0
            .rsplit('-')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BillNumber {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let prefix = parts.next();
        let stamp = parts.next();
        let sequence = parts.next();

        let valid = prefix == Some(Self::PREFIX)
            && stamp.is_some_and(|p| p.len() == 4 && p.chars().all(|c| c.is_ascii_digit()))
            && sequence.is_some_and(|p| p.len() >= 4 && p.chars().all(|c| c.is_ascii_digit()))
            && parts.next().is_none();

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(BillingError::InvalidBillNumber(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_pads_sequence() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(BillNumber::assign(5, date).as_str(), "BILL-2503-0005");
    }

    #[test]
    fn test_assign_does_not_reset_across_months() {
        let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let may = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        assert_eq!(BillNumber::assign(8734, march).as_str(), "BILL-2503-8734");
        assert_eq!(BillNumber::assign(8735, may).as_str(), "BILL-2505-8735");
    }

    #[test]
    fn test_wide_sequences_keep_all_digits() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(BillNumber::assign(12345, date).as_str(), "BILL-2601-12345");
    }

    #[test]
    fn test_parse_round_trip() {
        let number: BillNumber = "BILL-2503-0005".parse().unwrap();
        assert_eq!(number.sequence(), 5);
        assert_eq!(number.to_string(), "BILL-2503-0005");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["INV-2503-0005", "BILL-253-0005", "BILL-2503-12", "BILL-2503", "BILL-2503-0005-X"] {
            assert!(bad.parse::<BillNumber>().is_err(), "accepted {bad}");
        }
    }
}
