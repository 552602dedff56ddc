//! Performance Scorer
//!
//! Deterministic 0-100 scoring and categorization of a supplier record,
//! used as the local fallback whenever the AI analyzer fails or omits a
//! supplier from its response.

use procura_models::{Category, SupplierRecord};

const QUALITY_WEIGHT: f64 = 0.4;
const DELIVERY_WEIGHT: f64 = 0.3;
const PRICE_WEIGHT: f64 = 0.3;

/// A delay at or beyond this many days scores zero for delivery.
const MAX_DELAY_DAYS: f64 = 30.0;

/// A price at or beyond this ceiling scores zero.
///
/// Known simplification carried from the observed behavior: lower price
/// always scores better, linearly against a fixed 1000 ceiling, with no
/// value-for-money adjustment. Flagged for product-owner confirmation
/// rather than reweighted here.
const PRICE_CEILING: f64 = 1000.0;

/// Weighted performance score in [0, 100].
pub fn score(record: &SupplierRecord) -> i32 {
    let quality_score = (record.quality / 10.0).clamp(0.0, 1.0);
    let delivery_score = (1.0 - record.delivery_delay as f64 / MAX_DELAY_DAYS).clamp(0.0, 1.0);
    let price_score = (1.0 - record.price / PRICE_CEILING).clamp(0.0, 1.0);

    let weighted = quality_score * QUALITY_WEIGHT
        + delivery_score * DELIVERY_WEIGHT
        + price_score * PRICE_WEIGHT;

    ((weighted * 100.0).round() as i32).clamp(0, 100)
}

/// Performance tier for a score. Thresholds are inclusive lower bounds.
pub fn categorize(score: i32) -> Category {
    match score {
        s if s >= 85 => Category::Excellent,
        s if s >= 70 => Category::Good,
        s if s >= 50 => Category::Average,
        s if s >= 30 => Category::Poor,
        _ => Category::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn record(quality: f64, delivery_delay: i32, price: f64) -> SupplierRecord {
        SupplierRecord {
            id: Uuid::new_v4(),
            analysis_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            product: "Widget".to_string(),
            quantity: 100,
            quality,
            delivery_delay,
            price,
            delivery_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            performance: None,
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_reference_score() {
        // quality 8.5, delay 5 days, price 150.50:
        // 0.85*0.4 + 0.8333*0.3 + 0.8495*0.3 = 0.84485 -> 84
        let score = score(&record(8.5, 5, 150.50));
        assert_eq!(score, 84);
        assert_eq!(categorize(score), Category::Good);
    }

    #[test]
    fn test_perfect_and_worst_suppliers() {
        assert_eq!(score(&record(10.0, 0, 0.0)), 100);
        assert_eq!(score(&record(0.0, 30, 1000.0)), 0);
    }

    #[test]
    fn test_components_clamp() {
        // Past-the-ceiling values do not push the score negative
        assert_eq!(score(&record(0.0, 400, 99_999.0)), 0);
        // Delay over 30 days contributes exactly zero, not less
        assert_eq!(
            score(&record(10.0, 31, 0.0)),
            score(&record(10.0, 300, 0.0))
        );
    }

    #[test]
    fn test_categorize_boundaries() {
        let cases = [
            (100, Category::Excellent),
            (85, Category::Excellent),
            (84, Category::Good),
            (70, Category::Good),
            (69, Category::Average),
            (50, Category::Average),
            (49, Category::Poor),
            (30, Category::Poor),
            (29, Category::Critical),
            (0, Category::Critical),
        ];

        for (score, expected) in cases {
            assert_eq!(categorize(score), expected, "score {}", score);
        }
    }

    proptest! {
        /// Deterministic and always in [0, 100] over the full input domain.
        #[test]
        fn prop_score_is_deterministic_and_bounded(
            quality in 0.0f64..=10.0,
            delay in 0i32..1000,
            price in 0.0f64..100_000.0,
        ) {
            let supplier = record(quality, delay, price);
            let first = score(&supplier);
            let second = score(&supplier);

            prop_assert_eq!(first, second);
            prop_assert!((0..=100).contains(&first));
        }

        /// Every score maps to exactly one tier.
        #[test]
        fn prop_categorize_total(s in 0i32..=100) {
            let _ = categorize(s);
        }
    }
}
