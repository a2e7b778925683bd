//! Common test fixtures

use chrono::NaiveDate;
use core_kernel::Money;
use rust_decimal_macros::dec;

/// Frequently used monetary amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard consultation fee
    pub fn consultation_fee() -> Money {
        Money::new(dec!(500))
    }

    /// Per-test lab charge
    pub fn lab_test_fee() -> Money {
        Money::new(dec!(150))
    }

    /// Typical flat tax on a visit
    pub fn visit_tax() -> Money {
        Money::new(dec!(50))
    }
}

/// Frequently used dates
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed billing day used across tests
    pub fn billing_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    /// Due date 30 days after the billing day
    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 13).expect("valid date")
    }

    /// A date of birth for an adult patient
    pub fn adult_dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 6, 15).expect("valid date")
    }
}

/// Frequently used strings
pub struct StringFixtures;

impl StringFixtures {
    pub fn patient_name() -> &'static str {
        "Asha Rao"
    }

    pub fn patient_email() -> &'static str {
        "asha@example.com"
    }

    pub fn patient_phone() -> &'static str {
        "9876543210"
    }

    pub fn patient_address() -> &'static str {
        "12 MG Road, Bengaluru"
    }
}
