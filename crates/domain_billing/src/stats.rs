//! Dashboard statistics
//!
//! The aggregates themselves (counts and sums) come from the storage layer;
//! this module owns the time-window boundaries and the month-over-month
//! percentage arithmetic so that both are testable without a database.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// Billing dashboard aggregates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingStats {
    pub total_bills: i64,
    /// Bills still owed money (`pending` + `partial`)
    pub pending_bills: i64,
    pub paid_bills: i64,
    /// All-time revenue: sum of paid amounts across every bill
    pub total_revenue: Money,
    pub monthly_revenue: Money,
    pub last_month_revenue: Money,
    pub today_bills: i64,
    /// Outstanding receivables: sum of `total - paid` over outstanding bills
    pub pending_amount: Money,
    pub total_paid_amount: Money,
    pub total_patients: i64,
    pub monthly_bills: i64,
    pub last_month_bills: i64,
    /// Revenue change vs. last month, percent with one decimal
    pub revenue_change: Decimal,
    /// Bill count change vs. last month, percent with one decimal
    pub bills_change: Decimal,
}

impl BillingStats {
    /// Computes the two month-over-month percentages from the raw
    /// aggregates already filled in
    pub fn finalize(mut self) -> Self {
        self.revenue_change = percentage_change(
            self.monthly_revenue.amount(),
            self.last_month_revenue.amount(),
        );
        self.bills_change = percentage_change(
            Decimal::from(self.monthly_bills),
            Decimal::from(self.last_month_bills),
        );
        self
    }
}

/// Percentage change versus a previous period, rounded to one decimal.
///
/// A previous period of zero yields 100 when anything happened this period
/// and 0 otherwise, rather than dividing by zero.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        ((current - previous) / previous * dec!(100)).round_dp(1)
    } else if current > Decimal::ZERO {
        dec!(100)
    } else {
        Decimal::ZERO
    }
}

/// The reporting windows the dashboard aggregates over, all in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindows {
    /// Midnight today
    pub today_start: DateTime<Utc>,
    /// First instant of the current month
    pub month_start: DateTime<Utc>,
    /// First instant of the previous month
    pub last_month_start: DateTime<Utc>,
}

impl MonthWindows {
    /// Computes the windows containing `now`
    pub fn containing(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let month_first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .expect("first of month is always valid");
        let last_month_first = if today.month() == 1 {
            NaiveDate::from_ymd_opt(today.year() - 1, 12, 1)
        } else {
            NaiveDate::from_ymd_opt(today.year(), today.month() - 1, 1)
        }
        .expect("first of month is always valid");

        Self {
            today_start: start_of_day(today),
            month_start: start_of_day(month_first),
            last_month_start: start_of_day(last_month_first),
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_change_normal() {
        assert_eq!(percentage_change(dec!(150), dec!(100)), dec!(50.0));
        assert_eq!(percentage_change(dec!(75), dec!(100)), dec!(-25.0));
    }

    #[test]
    fn test_percentage_change_rounds_to_one_decimal() {
        assert_eq!(percentage_change(dec!(1), dec!(3)), dec!(-66.7));
    }

    #[test]
    fn test_percentage_change_zero_previous() {
        assert_eq!(percentage_change(dec!(500), Decimal::ZERO), dec!(100));
        assert_eq!(percentage_change(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_finalize_fills_changes() {
        let stats = BillingStats {
            monthly_revenue: Money::new(dec!(2000)),
            last_month_revenue: Money::new(dec!(1000)),
            monthly_bills: 6,
            last_month_bills: 4,
            ..Default::default()
        }
        .finalize();

        assert_eq!(stats.revenue_change, dec!(100.0));
        assert_eq!(stats.bills_change, dec!(50.0));
    }

    #[test]
    fn test_month_windows_mid_year() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 15, 30, 0).unwrap();
        let windows = MonthWindows::containing(now);

        assert_eq!(
            windows.today_start,
            Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap()
        );
        assert_eq!(
            windows.month_start,
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            windows.last_month_start,
            Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_month_windows_january_rolls_year() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap();
        let windows = MonthWindows::containing(now);

        assert_eq!(
            windows.last_month_start,
            Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()
        );
    }
}
