use crate::proration::Proration;
use crate::schema::CalculationMethod;
use rust_decimal::{Decimal, RoundingStrategy};

/// Ledger rounding: two decimal places, midpoint away from zero. Applied at
/// every step that produces a stored or compared value, not only at the end;
/// historical records were produced this way and must stay reproducible.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodDepreciation {
    /// Amount actually recognized this period, after capping.
    pub amount: Decimal,
    /// Amount the convention produced before the cap.
    pub uncapped_amount: Decimal,
    /// True when the cap reduced the amount (asset close to fully
    /// depreciated).
    pub was_capped: bool,
}

/// Applies the daily or monthly convention to one period.
///
/// Daily spreads the annual amount over the year's exact calendar days and is
/// applied uniformly; its granularity already absorbs a partial first month.
/// Monthly takes one twelfth of the annual amount, prorated by owned days in
/// the acquisition month so the convention stays internally consistent
/// (twelve full periods sum to the annual amount).
///
/// The cap clamps the amount so accumulated depreciation can never exceed the
/// depreciable base, even under rounding drift near full depreciation.
pub fn period_depreciation(
    acquisition_cost: Decimal,
    salvage_value: Decimal,
    annual_rate_percent: Decimal,
    method: CalculationMethod,
    proration: Proration,
    days_in_year: u32,
    previous_accumulated: Decimal,
) -> PeriodDepreciation {
    let depreciable_base = acquisition_cost - salvage_value;
    let annual = depreciable_base * annual_rate_percent / Decimal::from(100);

    let uncapped = match method {
        CalculationMethod::Daily => round2(
            annual / Decimal::from(days_in_year) * Decimal::from(proration.days),
        ),
        CalculationMethod::Monthly => {
            let monthly = annual / Decimal::from(12);
            if proration.is_first_period {
                round2(
                    monthly * Decimal::from(proration.days)
                        / Decimal::from(proration.total_days_in_month),
                )
            } else {
                round2(monthly)
            }
        }
    };

    // Clamped on both sides: the cap keeps accumulated depreciation inside
    // the base, the zero floor keeps it monotonic even if a malformed
    // negative rate slips past registration.
    let max_allowed = (depreciable_base - previous_accumulated).max(Decimal::ZERO);
    let amount = uncapped.min(max_allowed).max(Decimal::ZERO);

    PeriodDepreciation {
        amount,
        uncapped_amount: uncapped,
        was_capped: amount < uncapped,
    }
}
