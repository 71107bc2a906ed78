//! Property-based tests for bucket aggregation.
//!
//! - Bucket sums equal line sums
//! - Aggregation does not depend on line order

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{TaxBreakdown, TaxBucket, TaxLine, TaxRates};

fn bucket() -> impl Strategy<Value = TaxBucket> {
    prop::sample::select(TaxBucket::ALL.to_vec())
}

fn line() -> impl Strategy<Value = TaxLine> {
    (bucket(), 0i64..10_000_000, 0i64..1_600_000).prop_map(|(bucket, taxable, tax)| TaxLine {
        bucket,
        taxable: Decimal::new(taxable, 3),
        tax: Decimal::new(tax, 3),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The buckets partition the lines: nothing is lost or counted twice.
    #[test]
    fn prop_bucket_sums_equal_line_sums(lines in prop::collection::vec(line(), 0..30)) {
        let breakdown = TaxBreakdown::aggregate(lines.iter().copied(), &TaxRates::new());

        let bucket_taxable: Decimal = TaxBucket::ALL.iter().map(|b| breakdown.bucket(*b).taxable).sum();
        let bucket_tax: Decimal = TaxBucket::ALL.iter().map(|b| breakdown.bucket(*b).tax).sum();
        let line_taxable: Decimal = lines.iter().map(|l| l.taxable).sum();
        let line_tax: Decimal = lines.iter().map(|l| l.tax).sum();

        prop_assert_eq!(bucket_taxable, line_taxable);
        prop_assert_eq!(bucket_tax, line_tax);
    }

    /// Reversing the lines gives the same breakdown.
    #[test]
    fn prop_order_independent(lines in prop::collection::vec(line(), 0..30)) {
        let forward = TaxBreakdown::aggregate(lines.iter().copied(), &TaxRates::new());
        let backward = TaxBreakdown::aggregate(lines.iter().rev().copied(), &TaxRates::new());
        prop_assert_eq!(forward, backward);
    }
}
