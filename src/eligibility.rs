use crate::calendar::last_day_of_month;
use chrono::NaiveDate;

/// True iff the asset was acquired on or before the last calendar day of the
/// requested period. A `false` here is a skip, not an error: an asset bought
/// in March has simply nothing to depreciate in February.
pub fn should_depreciate(acquisition_date: NaiveDate, year: i32, month: u32) -> bool {
    acquisition_date <= last_day_of_month(year, month)
}
