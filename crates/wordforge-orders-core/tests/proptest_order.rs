//! Property-based tests for order input validation
//!
//! These cover the creation-time invariants:
//! - the computed total always equals the sum of item prices
//! - any negative price is rejected, wherever it sits in the list
//! - delivery dates in the past are rejected, future ones accepted

use chrono::{Duration, Utc};
use proptest::prelude::*;

use wordforge_orders_core::{order_total_cents, validate_order_input, OrderItemSpec};
use wordforge_types::FileKind;

fn spec_with_price(price: i64) -> OrderItemSpec {
    OrderItemSpec {
        topic: "topic".to_string(),
        length_words: 300,
        content_type: "article".to_string(),
        language: "en".to_string(),
        unit_price_cents: price,
        guidelines: None,
    }
}

/// Generate non-negative item prices within a realistic range
fn arb_prices() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..1_000_000, 1..20)
}

proptest! {
    /// Property: the validated total is exactly the sum of item prices
    #[test]
    fn prop_total_equals_item_sum(prices in arb_prices()) {
        let items: Vec<_> = prices.iter().copied().map(spec_with_price).collect();
        let now = Utc::now();
        let total = validate_order_input(&items, now + Duration::days(1), now, 50).unwrap();

        prop_assert_eq!(total, prices.iter().sum::<i64>());
        prop_assert_eq!(total, order_total_cents(&items));
    }

    /// Property: one negative price anywhere fails the whole order
    #[test]
    fn prop_any_negative_price_rejected(
        prices in arb_prices(),
        position in 0usize..20,
        negative in -1_000_000i64..0,
    ) {
        let mut items: Vec<_> = prices.iter().copied().map(spec_with_price).collect();
        let position = position % items.len();
        items[position] = spec_with_price(negative);

        let now = Utc::now();
        let result = validate_order_input(&items, now + Duration::days(1), now, 50);
        prop_assert!(result.is_err());
    }

    /// Property: declared delivery dates strictly before "now" are rejected,
    /// dates from "now" onward pass
    #[test]
    fn prop_delivery_date_must_not_precede_now(offset_secs in -86_400i64..86_400) {
        let items = vec![spec_with_price(100)];
        let now = Utc::now();
        let declared = now + Duration::seconds(offset_secs);

        let result = validate_order_input(&items, declared, now, 50);
        if offset_secs < 0 {
            prop_assert!(result.is_err());
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Property: extension classification is case-insensitive and every
    /// unknown extension falls back to `Other`
    #[test]
    fn prop_file_kind_classification(stem in "[a-z]{1,12}", upper in proptest::bool::ANY) {
        let ext = if upper { "PDF" } else { "pdf" };
        prop_assert_eq!(FileKind::from_filename(&format!("{stem}.{ext}")), FileKind::Pdf);
        prop_assert_eq!(
            FileKind::from_filename(&format!("{stem}.weird")),
            FileKind::Other
        );
    }
}
