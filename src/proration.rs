use crate::calendar::days_in_month;
use chrono::{Datelike, NaiveDate};

/// How much of the requested month the asset was actually owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proration {
    /// Depreciable days in this period.
    pub days: u32,
    /// True when the requested period is the asset's acquisition month.
    pub is_first_period: bool,
    pub total_days_in_month: u32,
}

/// Computes the depreciable day count for `(year, month)`. In the acquisition
/// month the acquisition day itself counts as depreciable, so an asset bought
/// on the 16th of a 31-day month owns 16 days. Any later month is a full
/// period.
///
/// Callers must have already established eligibility; an acquisition date
/// after the period would underflow here.
pub fn depreciable_days(acquisition_date: NaiveDate, year: i32, month: u32) -> Proration {
    let total_days_in_month = days_in_month(year, month);

    if acquisition_date.year() == year && acquisition_date.month() == month {
        Proration {
            days: total_days_in_month - acquisition_date.day() + 1,
            is_first_period: true,
            total_days_in_month,
        }
    } else {
        Proration {
            days: total_days_in_month,
            is_first_period: false,
            total_days_in_month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_period() {
        let p = depreciable_days(date(2023, 6, 15), 2024, 1);
        assert_eq!(
            p,
            Proration {
                days: 31,
                is_first_period: false,
                total_days_in_month: 31
            }
        );
    }

    #[test]
    fn test_first_period_mid_month() {
        let p = depreciable_days(date(2024, 1, 16), 2024, 1);
        assert_eq!(p.days, 16);
        assert!(p.is_first_period);
        assert_eq!(p.total_days_in_month, 31);
    }

    #[test]
    fn test_first_period_first_day_is_full_month() {
        let p = depreciable_days(date(2024, 1, 1), 2024, 1);
        assert_eq!(p.days, 31);
        assert!(p.is_first_period);
    }

    #[test]
    fn test_first_period_last_day_single_day() {
        let p = depreciable_days(date(2024, 1, 31), 2024, 1);
        assert_eq!(p.days, 1);
        assert!(p.is_first_period);
    }

    #[test]
    fn test_leap_february() {
        let p = depreciable_days(date(2024, 2, 29), 2024, 2);
        assert_eq!(p.days, 1);
        assert_eq!(p.total_days_in_month, 29);
    }
}
