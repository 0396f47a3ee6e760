//! # Order Assignment
//!
//! Positions define a total order over a collection. Ties are broken by
//! creation time, then by id, so every client derives the same order from
//! the same snapshot.
//!
//! Positions are contiguous integers (`0..n`). A reorder recomputes the
//! whole order instead of inserting fractional keys.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::shared::item::{Item, ItemId};

/// Deterministic list order: position, then creation time, then id
pub fn compare(a: &Item, b: &Item) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort items into list order
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(compare);
}

/// Position for a newly appended item (append-at-end policy)
pub fn next_position(items: &[Item]) -> i64 {
    items.len() as i64
}

/// Positions held by more than one item, with the ids holding them
pub fn find_collisions(items: &[Item]) -> BTreeMap<i64, Vec<ItemId>> {
    let mut by_position: BTreeMap<i64, Vec<ItemId>> = BTreeMap::new();
    for item in items {
        by_position.entry(item.position).or_default().push(item.id.clone());
    }
    by_position.retain(|_, ids| ids.len() > 1);
    by_position
}

/// Contiguous positions for `order`, returning only the items whose
/// position changes
pub fn assign_positions<'a>(order: impl IntoIterator<Item = &'a Item>) -> Vec<(ItemId, i64)> {
    order
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let position = index as i64;
            (item.position != position).then(|| (item.id.clone(), position))
        })
        .collect()
}

/// Changes needed to bring `items` to contiguous positions in their
/// deterministic order
pub fn normalize(items: &[Item]) -> Vec<(ItemId, i64)> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    assign_positions(sorted)
}

/// Whether `items` is sorted and collision-free
pub fn is_totally_ordered(items: &[Item]) -> bool {
    items.windows(2).all(|pair| pair[0].position < pair[1].position)
}
