//! Two-decimal currency figures in the shape the vendor accepts.
//!
//! CRITICAL: the vendor rejects figures whose precision does not match the
//! totals it recomputes. Every amount placed in a payload is truncated
//! toward zero to exactly two decimal places, never rounded half-up or
//! half-even.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Truncates `value` toward zero at two decimal places.
///
/// The result always carries a scale of two, so `0` renders as `0.00`.
#[must_use]
pub fn quantize(value: Decimal) -> Amount {
    let mut truncated = value.round_dp_with_strategy(2, RoundingStrategy::ToZero);
    if truncated.is_zero() {
        // Drop a negative sign left over from values like -0.004.
        truncated = Decimal::ZERO;
    }
    truncated.rescale(2);
    Amount(truncated)
}

/// A currency figure quantized to two decimal places.
///
/// Serializes as a decimal string (`"12.34"`) so the scale survives JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount, `0.00`.
    #[must_use]
    pub fn zero() -> Self {
        quantize(Decimal::ZERO)
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        quantize(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(quantize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantize_truncates() {
        assert_eq!(quantize(dec!(12.346)).to_string(), "12.34");
        assert_eq!(quantize(dec!(12.349999)).to_string(), "12.34");
    }

    #[test]
    fn test_quantize_pads_scale() {
        assert_eq!(quantize(dec!(0)).to_string(), "0.00");
        assert_eq!(quantize(dec!(7)).to_string(), "7.00");
        assert_eq!(quantize(dec!(7.5)).to_string(), "7.50");
    }

    #[test]
    fn test_quantize_negative_toward_zero() {
        assert_eq!(quantize(dec!(-1)).to_string(), "-1.00");
        assert_eq!(quantize(dec!(-1.999)).to_string(), "-1.99");
        assert_eq!(quantize(dec!(-0.004)).to_string(), "0.00");
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let json = serde_json::to_string(&quantize(dec!(16.005))).unwrap();
        assert_eq!(json, "\"16.00\"");

        let parsed: Amount = serde_json::from_str("\"3.141\"").unwrap();
        assert_eq!(parsed.to_string(), "3.14");
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Amount = "100.129".parse().unwrap();
        assert_eq!(amount.value(), dec!(100.12));
        assert!("abc".parse::<Amount>().is_err());
    }

    #[test]
    fn test_amount_default_is_zero() {
        assert!(Amount::default().is_zero());
        assert_eq!(Amount::zero().to_string(), "0.00");
    }
}

#[cfg(test)]
#[path = "amount_props.rs"]
mod props;
