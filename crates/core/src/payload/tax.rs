//! Tax bucket aggregation.
//!
//! Every line carries one of five taxation types. Per bucket the taxable
//! and tax amounts are summed across lines; the rate comes from the
//! taxation-type reference table and is reported only for buckets that
//! appear on the document.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use etims_shared::quantize;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::TaxSummary;

/// Taxation type letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum TaxBucket {
    /// Exempt.
    A,
    /// Standard rate.
    #[default]
    B,
    /// Zero rated.
    C,
    /// Non-VAT.
    D,
    /// Reduced rate.
    E,
}

impl TaxBucket {
    /// All buckets in payload order.
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Returns the bucket letter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl fmt::Display for TaxBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            _ => Err(format!("Unknown taxation type: {s}")),
        }
    }
}

/// Rate per bucket, read from the taxation-type reference table.
pub type TaxRates = HashMap<TaxBucket, Decimal>;

/// One line's contribution to the buckets.
#[derive(Debug, Clone, Copy)]
pub struct TaxLine {
    /// Line taxation type.
    pub bucket: TaxBucket,
    /// Net (taxable) amount of the line.
    pub taxable: Decimal,
    /// Tax charged on the line.
    pub tax: Decimal,
}

/// Unquantized bucket totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketTotal {
    /// Rate from the reference table.
    pub rate: Decimal,
    /// Sum of taxable amounts.
    pub taxable: Decimal,
    /// Sum of tax amounts.
    pub tax: Decimal,
}

/// Totals for the buckets present on a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxBreakdown {
    buckets: BTreeMap<TaxBucket, BucketTotal>,
}

impl TaxBreakdown {
    /// Sums `lines` per bucket.
    pub fn aggregate(lines: impl IntoIterator<Item = TaxLine>, rates: &TaxRates) -> Self {
        let mut buckets: BTreeMap<TaxBucket, BucketTotal> = BTreeMap::new();
        for line in lines {
            let total = buckets.entry(line.bucket).or_insert_with(|| BucketTotal {
                rate: rates.get(&line.bucket).copied().unwrap_or_default(),
                ..BucketTotal::default()
            });
            total.taxable += line.taxable;
            total.tax += line.tax;
        }
        Self { buckets }
    }

    /// Totals of one bucket; zero when the bucket is absent.
    #[must_use]
    pub fn bucket(&self, bucket: TaxBucket) -> BucketTotal {
        self.buckets.get(&bucket).copied().unwrap_or_default()
    }

    /// Quantized payload fields.
    #[must_use]
    pub fn summary(&self) -> TaxSummary {
        let [a, b, c, d, e] = TaxBucket::ALL.map(|bucket| self.bucket(bucket));
        TaxSummary {
            taxbl_amt_a: quantize(a.taxable),
            taxbl_amt_b: quantize(b.taxable),
            taxbl_amt_c: quantize(c.taxable),
            taxbl_amt_d: quantize(d.taxable),
            taxbl_amt_e: quantize(e.taxable),
            tax_rt_a: a.rate,
            tax_rt_b: b.rate,
            tax_rt_c: c.rate,
            tax_rt_d: d.rate,
            tax_rt_e: e.rate,
            tax_amt_a: quantize(a.tax),
            tax_amt_b: quantize(b.tax),
            tax_amt_c: quantize(c.tax),
            tax_amt_d: quantize(d.tax),
            tax_amt_e: quantize(e.tax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn kenyan_rates() -> TaxRates {
        HashMap::from([
            (TaxBucket::A, dec!(0)),
            (TaxBucket::B, dec!(16)),
            (TaxBucket::C, dec!(0)),
            (TaxBucket::D, dec!(0)),
            (TaxBucket::E, dec!(8)),
        ])
    }

    #[test]
    fn test_lines_are_summed_per_bucket() {
        let lines = [
            TaxLine { bucket: TaxBucket::A, taxable: dec!(100), tax: dec!(16) },
            TaxLine { bucket: TaxBucket::B, taxable: dec!(50), tax: dec!(8) },
            TaxLine { bucket: TaxBucket::B, taxable: dec!(50), tax: dec!(8) },
        ];
        let breakdown = TaxBreakdown::aggregate(lines, &kenyan_rates());

        assert_eq!(breakdown.bucket(TaxBucket::A).taxable, dec!(100));
        assert_eq!(breakdown.bucket(TaxBucket::A).tax, dec!(16));
        assert_eq!(breakdown.bucket(TaxBucket::B).taxable, dec!(100));
        assert_eq!(breakdown.bucket(TaxBucket::B).tax, dec!(16));
        for absent in [TaxBucket::C, TaxBucket::D, TaxBucket::E] {
            assert_eq!(breakdown.bucket(absent), BucketTotal::default());
        }
    }

    #[test]
    fn test_rate_reported_only_for_present_buckets() {
        let lines = [TaxLine { bucket: TaxBucket::B, taxable: dec!(10), tax: dec!(1.6) }];
        let summary = TaxBreakdown::aggregate(lines, &kenyan_rates()).summary();

        assert_eq!(summary.tax_rt_b, dec!(16));
        assert_eq!(summary.tax_rt_e, dec!(0));
        assert_eq!(summary.taxbl_amt_b.to_string(), "10.00");
        assert_eq!(summary.tax_amt_b.to_string(), "1.60");
        assert_eq!(summary.tax_amt_a.to_string(), "0.00");
    }

    #[test]
    fn test_summary_truncates() {
        let lines = [
            TaxLine { bucket: TaxBucket::E, taxable: dec!(33.333), tax: dec!(2.6666) },
        ];
        let summary = TaxBreakdown::aggregate(lines, &kenyan_rates()).summary();
        assert_eq!(summary.taxbl_amt_e.to_string(), "33.33");
        assert_eq!(summary.tax_amt_e.to_string(), "2.66");
    }

    #[test]
    fn test_parse_bucket() {
        assert_eq!("b".parse::<TaxBucket>().unwrap(), TaxBucket::B);
        assert!("Z".parse::<TaxBucket>().is_err());
        assert_eq!(TaxBucket::default(), TaxBucket::B);
    }
}

#[cfg(test)]
#[path = "tax_props.rs"]
mod props;
