use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::MicrocreditError;
use crate::types::{Money, Rate};
use crate::MicrocreditResult;

/// Signed day count from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Simple interest accrued over `days` at a periodic nominal rate,
/// under a fixed days-in-year convention.
///
/// `days` may be negative — late-settlement walks can move the payment
/// cursor past an installment's due date, and the negative accrual is
/// intentional there.
pub fn accrued_interest(
    olb: Money,
    rate: Rate,
    days: i64,
    days_in_year: u32,
) -> MicrocreditResult<Money> {
    if days_in_year == 0 {
        return Err(MicrocreditError::DivisionByZero {
            context: "interest accrual days-in-year".into(),
        });
    }
    Ok(olb * rate * Decimal::from(days) / Decimal::from(days_in_year))
}

/// Round to `decimal_places` using half-away-from-zero. The rounding mode is
/// fixed for every monetary figure in this crate and never varies per call.
pub fn round_half_away(amount: Money, decimal_places: u32) -> Money {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_days_between_signed() {
        assert_eq!(days_between(d(2024, 1, 1), d(2024, 1, 31)), 30);
        assert_eq!(days_between(d(2024, 1, 31), d(2024, 1, 1)), -30);
        assert_eq!(days_between(d(2024, 1, 1), d(2024, 1, 1)), 0);
    }

    #[test]
    fn test_accrued_interest_360() {
        // 1000 * 0.12 * 30 / 360 = 10
        let interest = accrued_interest(dec!(1000), dec!(0.12), 30, 360).unwrap();
        assert_eq!(interest, dec!(10));
    }

    #[test]
    fn test_accrued_interest_negative_days() {
        let interest = accrued_interest(dec!(1000), dec!(0.12), -30, 360).unwrap();
        assert_eq!(interest, dec!(-10));
    }

    #[test]
    fn test_accrued_interest_zero_year_is_error() {
        assert!(accrued_interest(dec!(1000), dec!(0.12), 30, 0).is_err());
    }

    #[test]
    fn test_round_half_away_at_zero_and_two_places() {
        assert_eq!(round_half_away(dec!(10.0), 0), dec!(10));
        assert_eq!(round_half_away(dec!(10.0), 2), dec!(10.00));
        // midpoint goes away from zero, not to even
        assert_eq!(round_half_away(dec!(10.005), 2), dec!(10.01));
        assert_eq!(round_half_away(dec!(-10.005), 2), dec!(-10.01));
        assert_eq!(round_half_away(dec!(0.5), 0), dec!(1));
        assert_eq!(round_half_away(dec!(-0.5), 0), dec!(-1));
    }
}
