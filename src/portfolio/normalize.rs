//! Conversions between accounting periods.
//!
//! Everything is normalized to a monthly figure first; weekly and annual
//! projections are always derived from that monthly figure. Scaling up
//! saturates at `Decimal::MAX` rather than overflowing.

use rust_decimal::Decimal;

use crate::models::RentFrequency;

const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const MONTHS_PER_QUARTER: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

pub fn monthly_from_weekly(amount: Decimal) -> Decimal {
    amount.saturating_mul(WEEKS_PER_YEAR) / MONTHS_PER_YEAR
}

pub fn monthly_from_annual(amount: Decimal) -> Decimal {
    amount / MONTHS_PER_YEAR
}

pub fn monthly_from_quarterly(amount: Decimal) -> Decimal {
    amount / MONTHS_PER_QUARTER
}

pub fn normalize_rent_to_monthly(amount: Decimal, frequency: RentFrequency) -> Decimal {
    match frequency {
        RentFrequency::Weekly => monthly_from_weekly(amount),
        RentFrequency::Monthly => amount,
    }
}

pub fn weekly_from_monthly(monthly: Decimal) -> Decimal {
    monthly.saturating_mul(MONTHS_PER_YEAR) / WEEKS_PER_YEAR
}

pub fn annual_from_monthly(monthly: Decimal) -> Decimal {
    monthly.saturating_mul(MONTHS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn weekly_rent_is_scaled_by_52_over_12() {
        let monthly = normalize_rent_to_monthly(dec!(1000), RentFrequency::Weekly);
        assert_eq!(monthly.round_dp(2), dec!(4333.33));
    }

    #[test]
    fn monthly_rent_is_unchanged() {
        assert_eq!(
            normalize_rent_to_monthly(dec!(1000), RentFrequency::Monthly),
            dec!(1000)
        );
    }

    #[test]
    fn annual_and_quarterly_divide() {
        assert_eq!(monthly_from_annual(dec!(1800)), dec!(150));
        assert_eq!(monthly_from_quarterly(dec!(600)), dec!(200));
    }

    #[test]
    fn negative_amounts_pass_through() {
        assert_eq!(monthly_from_quarterly(dec!(-300)), dec!(-100));
    }

    #[test]
    fn projections_come_from_the_monthly_figure() {
        assert_eq!(annual_from_monthly(dec!(2000)), dec!(24000));
        assert_eq!(weekly_from_monthly(dec!(1300)), dec!(300));
        let weekly = dec!(500);
        let round_trip = weekly_from_monthly(monthly_from_weekly(weekly));
        assert_eq!(round_trip.round_dp(10), weekly);
    }

    #[test]
    fn scaling_saturates_at_decimal_max() {
        let monthly = monthly_from_weekly(Decimal::MAX / dec!(10));
        assert_eq!(monthly, Decimal::MAX / MONTHS_PER_YEAR);
        assert_eq!(annual_from_monthly(Decimal::MAX), Decimal::MAX);
        assert!(weekly_from_monthly(Decimal::MAX) > Decimal::ZERO);
    }
}
