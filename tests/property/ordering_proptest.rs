//! Property-based tests for order assignment

use hearthlist::shared::Item;
use hearthlist::sync::ordering;
use hearthlist::sync::ReconciliationEngine;
use proptest::prelude::*;

use crate::common::item;

/// Items with arbitrary (possibly colliding) positions
fn arb_items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((0i64..6, 0i64..4), 0..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (position, seq))| item(&format!("i{:02}", index), position, seq))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_sort_is_independent_of_input_order(items in arb_items(), rotate in 0usize..12) {
        let mut a = items.clone();
        let mut b = items;
        if !b.is_empty() {
            let k = rotate % b.len();
            b.rotate_left(k);
        }
        ordering::sort_items(&mut a);
        ordering::sort_items(&mut b);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_normalize_yields_contiguous_positions(items in arb_items()) {
        let writes = ordering::normalize(&items);
        let mut fixed = items.clone();
        for (id, position) in &writes {
            if let Some(item) = fixed.iter_mut().find(|item| &item.id == id) {
                item.position = *position;
            }
        }
        ordering::sort_items(&mut fixed);
        let positions: Vec<i64> = fixed.iter().map(|item| item.position).collect();
        prop_assert_eq!(positions, (0..items.len() as i64).collect::<Vec<_>>());
        prop_assert!(ordering::normalize(&fixed).is_empty());
    }

    #[test]
    fn test_next_position_appends_after_contiguous_list(len in 0usize..20) {
        let items: Vec<Item> = (0..len).map(|i| item(&format!("i{}", i), i as i64, 0)).collect();
        let next = ordering::next_position(&items);
        prop_assert!(items.iter().all(|item| item.position < next));
    }

    #[test]
    fn test_snapshot_view_is_sorted(items in arb_items()) {
        let engine = ReconciliationEngine::new("shopping");
        engine.apply(items.clone());
        let view = engine.view();
        prop_assert_eq!(view.len(), items.len());
        prop_assert!(view.items.windows(2).all(|pair| ordering::compare(&pair[0], &pair[1]).is_lt()));
    }
}
