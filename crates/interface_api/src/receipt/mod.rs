//! Printable receipt rendering
//!
//! Receipts are pure text formatting over a bill, its patient, and the
//! clinic header block. Two layouts exist: the standard full-page layout
//! and a narrow thermal layout sized for 80mm receipt printers. Rendering
//! is read-only and side-effect-free.

pub mod standard;
pub mod thermal;

use serde::Deserialize;

use domain_billing::{Bill, PatientSummary};

pub use standard::render_standard;
pub use thermal::render_thermal;

/// Clinic header printed at the top of every receipt
#[derive(Debug, Clone)]
pub struct ClinicInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Default for ClinicInfo {
    fn default() -> Self {
        Self {
            name: "ClinicBill Pro".to_string(),
            address: "123 Medical Center Drive".to_string(),
            phone: "(555) 123-4567".to_string(),
        }
    }
}

/// Receipt layout selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptLayout {
    #[default]
    Standard,
    Thermal,
}

/// Renders a receipt in the requested layout
pub fn render(
    bill: &Bill,
    patient: Option<&PatientSummary>,
    clinic: &ClinicInfo,
    layout: ReceiptLayout,
) -> String {
    match layout {
        ReceiptLayout::Standard => render_standard(bill, patient, clinic),
        ReceiptLayout::Thermal => render_thermal(bill, patient, clinic),
    }
}

/// Centers `text` within `width` columns
pub(crate) fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Left and right text justified to opposite edges of `width` columns.
/// The left side is truncated when both cannot fit.
pub(crate) fn two_col(left: &str, right: &str, width: usize) -> String {
    let right_len = right.chars().count();
    let max_left = width.saturating_sub(right_len + 1);
    let left = truncate(left, max_left);
    let gap = width.saturating_sub(left.chars().count() + right_len);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

/// Right-aligns `text` within `width` columns
pub(crate) fn right_align(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat(width - len), text)
}

/// Truncates to `max` columns, marking the cut with `..`
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    if max <= 2 {
        return text.chars().take(max).collect();
    }
    let kept: String = text.chars().take(max - 2).collect();
    format!("{}..", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pads_left() {
        assert_eq!(center("abcd", 8), "  abcd");
    }

    #[test]
    fn test_two_col_justifies() {
        let line = two_col("Paid:", "Rs.850.00", 32);
        assert_eq!(line.chars().count(), 32);
        assert!(line.starts_with("Paid:"));
        assert!(line.ends_with("Rs.850.00"));
    }

    #[test]
    fn test_two_col_truncates_long_left() {
        let line = two_col(
            "a very long label that cannot possibly fit",
            "Rs.1.00",
            32,
        );
        assert!(line.chars().count() <= 32);
        assert!(line.ends_with("Rs.1.00"));
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate("Consultation", 8), "Consul..");
        assert_eq!(truncate("short", 8), "short");
    }
}
