//! # Reorder Batch Builder
//!
//! Translates a drag gesture on the displayed (possibly filtered) list into
//! position writes for the full collection, committed as one atomic batch.
//!
//! The moved item is taken out of the full order and reinserted next to
//! the displayed item currently at the destination: before it when moving
//! up, after it when moving down. Every item then gets its index as its
//! position, and every item whose position changed is written.

use std::sync::Arc;

use crate::shared::error::{ListError, ListResult};
use crate::shared::item::{FieldChanges, Item, ItemId};
use crate::sync::ordering;
use crate::sync::remote::RemoteStore;

/// Move `item` to `destination` within the displayed list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    pub item: ItemId,
    pub destination: usize,
}

impl DragGesture {
    pub fn new(item: impl Into<ItemId>, destination: usize) -> Self {
        Self {
            item: item.into(),
            destination,
        }
    }
}

/// New full order plus the position writes needed to reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    /// Every item id in its new list order
    pub order: Vec<ItemId>,
    /// `(id, new position)` for items whose position changes
    pub writes: Vec<(ItemId, i64)>,
}

impl ReorderPlan {
    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }

    /// Rearrange `items` into the planned order with contiguous positions
    pub fn apply_to(&self, items: &mut Vec<Item>) {
        let mut remaining = std::mem::take(items);
        for id in &self.order {
            if let Some(index) = remaining.iter().position(|item| &item.id == id) {
                items.push(remaining.remove(index));
            }
        }
        // Anything the plan did not know about keeps its relative order at the end
        items.append(&mut remaining);
        for (index, item) in items.iter_mut().enumerate() {
            item.position = index as i64;
        }
    }
}

/// Plans and commits reorder batches for one order field
#[derive(Debug, Clone)]
pub struct ReorderBatchBuilder {
    order_field: String,
}

impl ReorderBatchBuilder {
    pub fn new(order_field: impl Into<String>) -> Self {
        Self {
            order_field: order_field.into(),
        }
    }

    /// Plan a drag on `displayed`, a subsequence of `full`
    ///
    /// Displayed ids missing from `full` (removed remotely mid-drag) are
    /// ignored. The destination is clamped to the displayed length.
    ///
    /// Items still waiting for their create to land (provisional ids) move
    /// locally but are never written; the store does not know them yet.
    /// Dragging such an item is refused as `UnknownItem`.
    pub fn plan(&self, full: &[Item], displayed: &[ItemId], gesture: &DragGesture) -> ListResult<ReorderPlan> {
        if gesture.item.is_provisional() {
            return Err(ListError::unknown_item(&gesture.item));
        }
        let mut order: Vec<&Item> = full.iter().collect();
        order.sort_by(|a, b| ordering::compare(a, b));

        let visible: Vec<&ItemId> = displayed
            .iter()
            .filter(|id| order.iter().any(|item| &item.id == *id))
            .collect();

        let from = visible
            .iter()
            .position(|id| **id == gesture.item)
            .ok_or_else(|| ListError::unknown_item(&gesture.item))?;
        let to = gesture.destination.min(visible.len() - 1);

        if from == to {
            tracing::debug!("[Reorder] {} dropped onto itself", gesture.item);
            return Ok(ReorderPlan {
                order: order.iter().map(|item| item.id.clone()).collect(),
                writes: Vec::new(),
            });
        }

        let target = visible[to];
        let moved_at = order
            .iter()
            .position(|item| item.id == gesture.item)
            .ok_or_else(|| ListError::unknown_item(&gesture.item))?;
        let moved = order.remove(moved_at);
        let target_at = order
            .iter()
            .position(|item| &item.id == target)
            .ok_or_else(|| ListError::unknown_item(target))?;
        let insert_at = if from > to { target_at } else { target_at + 1 };
        order.insert(insert_at, moved);

        let writes = confirmed_only(ordering::assign_positions(order.iter().copied()));
        tracing::debug!(
            "[Reorder] Moving {} from {} to {} touches {} items",
            gesture.item,
            from,
            to,
            writes.len()
        );

        Ok(ReorderPlan {
            order: order.into_iter().map(|item| item.id.clone()).collect(),
            writes,
        })
    }

    /// Plan that restores contiguous, collision-free positions
    pub fn normalize(&self, full: &[Item]) -> ReorderPlan {
        let mut sorted = full.to_vec();
        ordering::sort_items(&mut sorted);
        ReorderPlan {
            order: sorted.iter().map(|item| item.id.clone()).collect(),
            writes: confirmed_only(ordering::normalize(full)),
        }
    }

    /// Field changes for the batch, one entry per write
    pub fn batch(&self, plan: &ReorderPlan) -> Vec<(ItemId, FieldChanges)> {
        plan.writes
            .iter()
            .map(|(id, position)| (id.clone(), FieldChanges::new().set(&self.order_field, *position)))
            .collect()
    }

    /// Commit the plan as a single atomic batch; a no-op plan writes nothing
    pub async fn commit(&self, store: &Arc<dyn RemoteStore>, collection: &str, plan: &ReorderPlan) -> ListResult<()> {
        if plan.is_noop() {
            return Ok(());
        }
        let updates = self.batch(plan);
        let count = updates.len();
        store.batch_update(collection, updates).await.map_err(|e| {
            tracing::warn!(
                "[Reorder] Batch of {} position updates in '{}' failed, keeping local order until next snapshot: {}",
                count,
                collection,
                e
            );
            ListError::batch_commit(count, &e)
        })
    }
}

fn confirmed_only(writes: Vec<(ItemId, i64)>) -> Vec<(ItemId, i64)> {
    writes.into_iter().filter(|(id, _)| !id.is_provisional()).collect()
}
