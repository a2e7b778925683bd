//! Randomized test data generators
//!
//! Built on `fake` for tests that want plausible but non-fixed data, e.g.
//! seeding a scratch database or fuzzing list endpoints.

use chrono::NaiveDate;
use fake::faker::address::en::StreetName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use core_kernel::Money;
use domain_billing::LineItem;
use domain_patient::PatientDraft;

/// Billable services the clinic realistically offers
static SERVICES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Consultation",
        "Follow-up Visit",
        "Lab Test",
        "X-Ray",
        "ECG",
        "Blood Panel",
        "Vaccination",
        "Physiotherapy Session",
        "Dressing",
    ]
});

/// Generates a valid random patient draft
pub fn patient_draft() -> PatientDraft {
    PatientDraft {
        name: Name().fake(),
        email: SafeEmail().fake(),
        phone: PhoneNumber().fake(),
        address: format!("{} {}", (1..200).fake::<u32>(), StreetName().fake::<String>()),
        date_of_birth: random_dob(),
    }
}

/// Generates a random line item from the service catalog
pub fn line_item() -> LineItem {
    let service = SERVICES[(0..SERVICES.len()).fake::<usize>()];
    LineItem::new(
        service,
        (1..5u32).fake(),
        Money::new(Decimal::from((50..2000i64).fake::<i64>())),
    )
}

/// Generates between one and five random line items
pub fn line_items() -> Vec<LineItem> {
    (0..(1..6usize).fake::<usize>()).map(|_| line_item()).collect()
}

fn random_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(
        (1940..2015).fake::<i32>(),
        (1..13u32).fake::<u32>(),
        (1..29u32).fake::<u32>(),
    )
    .expect("generated date is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_patient::Patient;

    #[test]
    fn test_generated_patients_pass_validation() {
        for _ in 0..20 {
            let draft = patient_draft();
            assert!(Patient::new(draft).is_ok());
        }
    }

    #[test]
    fn test_generated_items_are_billable() {
        for _ in 0..20 {
            let item = line_item();
            assert!(item.quantity >= 1);
            assert!(!item.unit_price.is_negative());
            assert!(!item.description.is_empty());
        }
    }
}
