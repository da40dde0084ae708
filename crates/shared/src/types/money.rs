//! Monetary rounding and comparison helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end: displayed at 2 decimal
//! places, carried at 4 decimal places for amortization intermediates, and
//! compared for balance equality with a fixed tolerance instead of `==`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance for debit/credit balance equality checks.
pub const BALANCE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

/// Decimal places for displayed/persisted monetary amounts.
pub const DISPLAY_SCALE: u32 = 2;

/// Decimal places carried by intermediate computations (depreciation).
pub const INTERMEDIATE_SCALE: u32 = 4;

/// Rounds an amount to display scale (2 dp) using banker's rounding.
///
/// Banker's rounding (round half to even) minimizes cumulative drift over
/// long amortization schedules.
#[must_use]
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Rounds an amount to intermediate scale (4 dp) using banker's rounding.
#[must_use]
pub fn round_intermediate(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(INTERMEDIATE_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if two amounts are equal within [`BALANCE_EPSILON`].
#[must_use]
pub fn approx_equal(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= BALANCE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_epsilon_value() {
        assert_eq!(BALANCE_EPSILON, dec!(0.01));
    }

    // Round half to even: 2.5 cents -> 2 cents, 3.5 cents -> 4 cents
    #[rstest]
    #[case(dec!(1.025), dec!(1.02))]
    #[case(dec!(1.035), dec!(1.04))]
    #[case(dec!(333.3333), dec!(333.33))]
    #[case(dec!(0.005), dec!(0.00))]
    fn test_round_display_bankers(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_display(input), expected);
    }

    #[test]
    fn test_round_intermediate() {
        assert_eq!(round_intermediate(dec!(333.33333333)), dec!(333.3333));
        assert_eq!(round_intermediate(dec!(0.00005)), dec!(0.0000));
        assert_eq!(round_intermediate(dec!(0.00015)), dec!(0.0002));
    }

    #[test]
    fn test_approx_equal_within_tolerance() {
        assert!(approx_equal(dec!(100.00), dec!(100.00)));
        assert!(approx_equal(dec!(100.00), dec!(100.01)));
        assert!(approx_equal(dec!(100.01), dec!(100.00)));
        assert!(!approx_equal(dec!(100.00), dec!(100.02)));
    }

    #[test]
    fn test_approx_equal_is_symmetric() {
        assert_eq!(
            approx_equal(dec!(5.00), dec!(5.009)),
            approx_equal(dec!(5.009), dec!(5.00))
        );
    }
}
