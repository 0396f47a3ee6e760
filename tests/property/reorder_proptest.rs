//! Property-based tests for reorder planning

use hearthlist::shared::{Item, ItemId};
use hearthlist::sync::{DragGesture, ReorderBatchBuilder};
use proptest::prelude::*;

use crate::common::item;

fn contiguous(len: usize) -> Vec<Item> {
    (0..len).map(|i| item(&format!("i{:02}", i), i as i64, i as i64)).collect()
}

proptest! {
    #[test]
    fn test_plan_keeps_positions_contiguous(len in 1usize..10, from in 0usize..10, to in 0usize..12) {
        let mut full = contiguous(len);
        let displayed: Vec<ItemId> = full.iter().map(|item| item.id.clone()).collect();
        let gesture = DragGesture::new(displayed[from % len].clone(), to);

        let plan = ReorderBatchBuilder::new("position").plan(&full, &displayed, &gesture).unwrap();
        plan.apply_to(&mut full);

        let positions: Vec<i64> = full.iter().map(|item| item.position).collect();
        prop_assert_eq!(positions, (0..len as i64).collect::<Vec<_>>());
        let landed = full.iter().position(|item| item.id == gesture.item).unwrap();
        prop_assert_eq!(landed, to.min(len - 1));
    }

    #[test]
    fn test_replaying_gesture_is_noop(len in 1usize..10, from in 0usize..10, to in 0usize..10) {
        let builder = ReorderBatchBuilder::new("position");
        let mut full = contiguous(len);
        let displayed: Vec<ItemId> = full.iter().map(|item| item.id.clone()).collect();
        let gesture = DragGesture::new(displayed[from % len].clone(), to);

        let plan = builder.plan(&full, &displayed, &gesture).unwrap();
        plan.apply_to(&mut full);
        let again = builder.plan(&full, &plan.order, &gesture).unwrap();
        prop_assert!(again.is_noop());
    }

    #[test]
    fn test_filtered_plan_only_moves_dragged_item_relative_to_others(
        len in 2usize..10,
        mask in prop::collection::vec(any::<bool>(), 10),
        pick in 0usize..10,
        to in 0usize..10,
    ) {
        let full = contiguous(len);
        let displayed: Vec<ItemId> = full
            .iter()
            .zip(mask.iter())
            .filter(|(_, shown)| **shown)
            .map(|(item, _)| item.id.clone())
            .collect();
        prop_assume!(!displayed.is_empty());
        let dragged = displayed[pick % displayed.len()].clone();

        let plan = ReorderBatchBuilder::new("position")
            .plan(&full, &displayed, &DragGesture::new(dragged.clone(), to))
            .unwrap();

        let before: Vec<&ItemId> = full.iter().map(|item| &item.id).filter(|id| **id != dragged).collect();
        let after: Vec<&ItemId> = plan.order.iter().filter(|id| **id != dragged).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(plan.order.len(), len);
    }
}
