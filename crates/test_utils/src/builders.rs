//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use chrono::NaiveDate;

use core_kernel::{Money, PatientId};
use domain_billing::{Bill, BillNumber, LineItem};
use domain_patient::{Patient, PatientDraft};

use crate::fixtures::{MoneyFixtures, StringFixtures, TemporalFixtures};

/// Builder for constructing test patients
pub struct TestPatientBuilder {
    name: String,
    email: String,
    phone: String,
    address: String,
    date_of_birth: NaiveDate,
}

impl Default for TestPatientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPatientBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            name: StringFixtures::patient_name().to_string(),
            email: StringFixtures::patient_email().to_string(),
            phone: StringFixtures::patient_phone().to_string(),
            address: StringFixtures::patient_address().to_string(),
            date_of_birth: TemporalFixtures::adult_dob(),
        }
    }

    /// Sets the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the date of birth
    pub fn with_date_of_birth(mut self, dob: NaiveDate) -> Self {
        self.date_of_birth = dob;
        self
    }

    /// Builds the patient
    ///
    /// # Panics
    ///
    /// Panics when the configured fields fail validation; builders are for
    /// tests that want a valid record.
    pub fn build(self) -> Patient {
        Patient::new(PatientDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            date_of_birth: self.date_of_birth,
        })
        .expect("test patient should be valid")
    }
}

/// Builder for constructing test bills
pub struct TestBillBuilder {
    patient_id: PatientId,
    sequence: i64,
    created_on: NaiveDate,
    items: Vec<LineItem>,
    tax: Money,
    discount: Money,
    due_date: NaiveDate,
    notes: Option<String>,
}

impl Default for TestBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBillBuilder {
    /// Creates a new builder with a consultation and a pair of lab tests
    pub fn new() -> Self {
        Self {
            patient_id: PatientId::new(),
            sequence: 1,
            created_on: TemporalFixtures::billing_day(),
            items: vec![
                LineItem::new("Consultation", 1, MoneyFixtures::consultation_fee()),
                LineItem::new("Lab Test", 2, MoneyFixtures::lab_test_fee()),
            ],
            tax: MoneyFixtures::visit_tax(),
            discount: Money::zero(),
            due_date: TemporalFixtures::due_date(),
            notes: None,
        }
    }

    /// Sets the patient
    pub fn with_patient_id(mut self, id: PatientId) -> Self {
        self.patient_id = id;
        self
    }

    /// Sets the bill-number sequence value
    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sets the creation date used for the bill number
    pub fn with_created_on(mut self, date: NaiveDate) -> Self {
        self.created_on = date;
        self
    }

    /// Replaces the item list
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// Adds one item
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sets the tax
    pub fn with_tax(mut self, tax: Money) -> Self {
        self.tax = tax;
        self
    }

    /// Sets the discount
    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builds the bill
    ///
    /// # Panics
    ///
    /// Panics when the configured fields fail validation.
    pub fn build(self) -> Bill {
        Bill::new(
            self.patient_id,
            BillNumber::assign(self.sequence, self.created_on),
            self.items,
            self.tax,
            self.discount,
            self.due_date,
            self.notes,
        )
        .expect("test bill should be valid")
    }
}
