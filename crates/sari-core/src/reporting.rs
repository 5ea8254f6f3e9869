//! # Reporting Windows & Series
//!
//! Pure calendar math for the read-side dashboards: fixed time windows over
//! the sales ledger, dense (gap-filled) chart series, and the small DTOs the
//! report queries return.
//!
//! ## Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Reporting Windows                                   │
//! │                                                                         │
//! │  Today       [ midnight, midnight+1d )                                 │
//! │  ThisWeek    [ Monday 00:00, now's-week Monday +7d )                   │
//! │  ThisMonth   [ 1st 00:00, 1st of next month )                          │
//! │  ThisYear    [ Jan 1 00:00, Jan 1 of next year )                       │
//! │  On(date)    [ date 00:00, date+1d )                                   │
//! │                                                                         │
//! │  All windows are half-open [start, end) in UTC, so adjacent windows    │
//! │  never double-count a sale on the boundary.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Chart series are dense: every month of the year / every day of the month
//! appears, zero-filled, using the calendar's actual day count (leap-aware).

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Report Window
// =============================================================================

/// A fixed reporting window over the sales ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportWindow {
    /// The current calendar day.
    Today,
    /// The current week, starting Monday.
    ThisWeek,
    /// The current calendar month.
    ThisMonth,
    /// The current calendar year.
    ThisYear,
    /// An arbitrary single day.
    On(NaiveDate),
}

impl ReportWindow {
    /// Resolves the window to half-open `[start, end)` UTC bounds, relative
    /// to `now` (passed in so the math stays pure and testable).
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        match self {
            ReportWindow::Today => day_bounds(today),
            ReportWindow::On(date) => day_bounds(*date),
            ReportWindow::ThisWeek => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                let start = start_of_day(monday);
                (start, start + Duration::days(7))
            }
            ReportWindow::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                let start = start_of_day(first);
                let end = start_of_day(first_of_next_month(first));
                (start, end)
            }
            ReportWindow::ThisYear => {
                let jan1 = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let next_jan1 = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                    .unwrap_or(jan1 + Duration::days(366));
                (start_of_day(jan1), start_of_day(next_jan1))
            }
        }
    }
}

#[inline]
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(date);
    (start, start + Duration::days(1))
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap_or(date)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap_or(date)
    }
}

// =============================================================================
// Calendar Helpers
// =============================================================================

/// Number of days in the given calendar month, leap-year aware.
///
/// ## Example
/// ```rust
/// use sari_core::reporting::days_in_month;
///
/// assert_eq!(days_in_month(2024, 2).unwrap(), 29); // leap year
/// assert_eq!(days_in_month(2026, 2).unwrap(), 28);
/// assert_eq!(days_in_month(2026, 8).unwrap(), 31);
/// ```
pub fn days_in_month(year: i32, month: u32) -> CoreResult<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::OutOfRange {
        field: "month".to_string(),
        min: 1,
        max: 12,
    })?;
    let next = first_of_next_month(first);
    Ok((next - first).num_days() as u32)
}

// =============================================================================
// Dense Series
// =============================================================================

/// Buckets ledger rows into a dense 12-month series for the given year.
///
/// Rows outside the year are ignored; months with no sales read zero. The
/// result is indexed January = 0.
pub fn monthly_series(year: i32, rows: &[(DateTime<Utc>, i64)]) -> [Money; 12] {
    let mut series = [Money::zero(); 12];
    for (ts, total_cents) in rows {
        if ts.year() == year {
            series[ts.month0() as usize] += Money::from_cents(*total_cents);
        }
    }
    series
}

/// Buckets ledger rows into a dense per-day series for the given month.
///
/// The vector has exactly `days_in_month(year, month)` entries (leap-aware),
/// indexed day 1 = 0, zero-filled where no sales occurred.
pub fn daily_series(
    year: i32,
    month: u32,
    rows: &[(DateTime<Utc>, i64)],
) -> CoreResult<Vec<Money>> {
    let days = days_in_month(year, month)? as usize;
    let mut series = vec![Money::zero(); days];
    for (ts, total_cents) in rows {
        if ts.year() == year && ts.month() == month {
            series[ts.day0() as usize] += Money::from_cents(*total_cents);
        }
    }
    Ok(series)
}

// =============================================================================
// Report DTOs
// =============================================================================

/// The cashier with the highest summed grand total for a day.
///
/// Queries return `Option<TopCashier>`; `None` is the no-data sentinel when
/// the day has no sales at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCashier {
    pub cashier: String,
    pub total_cents: i64,
}

impl TopCashier {
    /// The cashier's summed sales as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Cash vs card totals for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub cash_cents: i64,
    pub card_cents: i64,
}

impl PaymentSplit {
    /// Combined total across both methods.
    #[inline]
    pub fn total_cents(&self) -> i64 {
        self.cash_cents + self.card_cents
    }

    /// Cash share of the day's sales, in percent.
    ///
    /// Returns `None` when the day has no sales (the no-data sentinel that
    /// guards the division).
    pub fn cash_share_percent(&self) -> Option<f64> {
        let total = self.total_cents();
        if total == 0 {
            None
        } else {
            Some(self.cash_cents as f64 * 100.0 / total as f64)
        }
    }

    /// Card share of the day's sales, in percent.
    pub fn card_share_percent(&self) -> Option<f64> {
        self.cash_share_percent().map(|cash| 100.0 - cash)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_today_bounds_are_half_open_day() {
        let now = utc(2026, 8, 29, 15);
        let (start, end) = ReportWindow::Today.bounds(now);
        assert_eq!(start, utc(2026, 8, 29, 0));
        assert_eq!(end, utc(2026, 8, 30, 0));
    }

    #[test]
    fn test_week_starts_monday() {
        // 2026-08-29 is a Saturday; the week began Monday 2026-08-24
        let now = utc(2026, 8, 29, 15);
        let (start, end) = ReportWindow::ThisWeek.bounds(now);
        assert_eq!(start, utc(2026, 8, 24, 0));
        assert_eq!(end, utc(2026, 8, 31, 0));

        // A Monday is its own week start
        let monday = utc(2026, 8, 24, 8);
        let (start, _) = ReportWindow::ThisWeek.bounds(monday);
        assert_eq!(start, utc(2026, 8, 24, 0));
    }

    #[test]
    fn test_month_bounds_cross_year() {
        let now = utc(2026, 12, 15, 12);
        let (start, end) = ReportWindow::ThisMonth.bounds(now);
        assert_eq!(start, utc(2026, 12, 1, 0));
        assert_eq!(end, utc(2027, 1, 1, 0));
    }

    #[test]
    fn test_year_bounds() {
        let now = utc(2026, 8, 29, 15);
        let (start, end) = ReportWindow::ThisYear.bounds(now);
        assert_eq!(start, utc(2026, 1, 1, 0));
        assert_eq!(end, utc(2027, 1, 1, 0));
    }

    #[test]
    fn test_days_in_month_leap_aware() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2026, 2).unwrap(), 28);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29); // divisible by 400
        assert_eq!(days_in_month(1900, 2).unwrap(), 28); // divisible by 100 only
        assert_eq!(days_in_month(2026, 4).unwrap(), 30);
        assert_eq!(days_in_month(2026, 12).unwrap(), 31);
        assert!(days_in_month(2026, 13).is_err());
        assert!(days_in_month(2026, 0).is_err());
    }

    #[test]
    fn test_monthly_series_dense_and_zero_filled() {
        let rows = vec![
            (utc(2026, 1, 10, 9), 5000),
            (utc(2026, 1, 20, 14), 2500),
            (utc(2026, 8, 29, 10), 13000),
            (utc(2025, 8, 1, 10), 99999), // wrong year, ignored
        ];

        let series = monthly_series(2026, &rows);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].cents(), 7500); // January summed
        assert_eq!(series[7].cents(), 13000); // August
        assert!(series[1].is_zero()); // February gap-filled
    }

    #[test]
    fn test_daily_series_leap_february() {
        let rows = vec![
            (utc(2024, 2, 1, 9), 1000),
            (utc(2024, 2, 29, 9), 2000), // leap day sale
        ];

        let series = daily_series(2024, 2, &rows).unwrap();
        assert_eq!(series.len(), 29);
        assert_eq!(series[0].cents(), 1000);
        assert_eq!(series[28].cents(), 2000);
        assert!(series[14].is_zero());
    }

    #[test]
    fn test_payment_split_zero_guard() {
        let empty = PaymentSplit::default();
        assert_eq!(empty.cash_share_percent(), None);
        assert_eq!(empty.card_share_percent(), None);

        let split = PaymentSplit {
            cash_cents: 7500,
            card_cents: 2500,
        };
        assert_eq!(split.cash_share_percent(), Some(75.0));
        assert_eq!(split.card_share_percent(), Some(25.0));
    }
}
