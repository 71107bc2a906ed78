//! Property-based tests for quantization.
//!
//! - Truncation never moves a value away from zero
//! - The error of truncation is below one cent
//! - Quantizing is idempotent

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::quantize;

/// Strategy for decimals with up to six fractional digits, either sign.
fn any_figure() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64, 0u32..=6)
        .prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The quantized value always has exactly two decimal places.
    #[test]
    fn prop_scale_is_two(value in any_figure()) {
        prop_assert_eq!(quantize(value).value().scale(), 2);
    }

    /// Truncation toward zero never increases the magnitude.
    #[test]
    fn prop_never_rounds_away_from_zero(value in any_figure()) {
        let quantized = quantize(value).value();
        prop_assert!(quantized.abs() <= value.abs());
    }

    /// The discarded part is strictly less than one cent.
    #[test]
    fn prop_error_below_one_cent(value in any_figure()) {
        let quantized = quantize(value).value();
        prop_assert!((value - quantized).abs() < Decimal::new(1, 2));
    }

    /// Quantizing an already quantized value changes nothing.
    #[test]
    fn prop_idempotent(value in any_figure()) {
        let once = quantize(value);
        prop_assert_eq!(quantize(once.value()), once);
    }
}
