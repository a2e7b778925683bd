//! Export column configurations
//!
//! Column keys match the serialized field names of the flat export rows;
//! widths are character hints for spreadsheet and PDF consumers.

use serde::Serialize;

/// One column of a tabular export
#[derive(Debug, Clone, Serialize)]
pub struct ExportColumn {
    pub header: &'static str,
    pub key: &'static str,
    pub width: u32,
}

impl ExportColumn {
    const fn new(header: &'static str, key: &'static str, width: u32) -> Self {
        Self { header, key, width }
    }
}

/// Patient columns configuration
pub fn patient_columns() -> Vec<ExportColumn> {
    vec![
        ExportColumn::new("Name", "name", 25),
        ExportColumn::new("Email", "email", 30),
        ExportColumn::new("Phone", "phone", 15),
        ExportColumn::new("Address", "address", 35),
        ExportColumn::new("Date of Birth", "date_of_birth", 15),
        ExportColumn::new("Registered Date", "registered_date", 15),
    ]
}

/// Bill columns configuration
pub fn bill_columns() -> Vec<ExportColumn> {
    vec![
        ExportColumn::new("Bill Number", "bill_number", 18),
        ExportColumn::new("Patient Name", "patient_name", 25),
        ExportColumn::new("Patient Email", "patient_email", 30),
        ExportColumn::new("Patient Phone", "patient_phone", 15),
        ExportColumn::new("Items", "items", 40),
        ExportColumn::new("Subtotal", "subtotal", 12),
        ExportColumn::new("Tax", "tax", 10),
        ExportColumn::new("Discount", "discount", 10),
        ExportColumn::new("Total Amount", "total_amount", 12),
        ExportColumn::new("Paid Amount", "paid_amount", 12),
        ExportColumn::new("Balance", "balance", 12),
        ExportColumn::new("Status", "status", 10),
        ExportColumn::new("Due Date", "due_date", 12),
        ExportColumn::new("Created Date", "created_at", 12),
    ]
}
