//! # Reconciliation Engine
//!
//! Merges the remote snapshot stream with local optimistic mutations into
//! the authoritative [`LocalView`] of one collection.
//!
//! ## Policy: remote overwrites local
//!
//! Snapshots are full listings, so every snapshot replaces the whole view.
//! Optimistic changes live in the view only until the next snapshot
//! arrives. If that snapshot predates the client's own write, the change
//! visibly reverts until the confirming snapshot follows. No per-operation
//! ledger is kept.
//!
//! ## Notification
//!
//! The view is published through a `tokio::sync::watch` channel. Every
//! change (snapshot or optimistic) bumps `revision` and wakes receivers,
//! which is how the view projector learns it must recompute.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::shared::error::StoreError;
use crate::shared::item::{Item, ItemId};
use crate::sync::ordering;
use crate::sync::remote::Snapshot;
use crate::sync::sync_state::Connectivity;

/// Client-side projection of one collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalView {
    /// Items in list order
    pub items: Vec<Item>,
    /// Incremented on every change
    pub revision: u64,
    /// When the last remote snapshot was applied
    pub last_snapshot_at: Option<DateTime<Utc>>,
    /// Whether unconfirmed local changes are currently visible
    pub optimistic: bool,
}

impl LocalView {
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Index of `id` in list order
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of applying one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// View revision after the snapshot
    pub revision: u64,
    /// Whether the snapshot discarded visible optimistic changes
    pub discarded_optimistic: bool,
    /// Positions shared by more than one item in the snapshot
    pub collisions: BTreeMap<i64, Vec<ItemId>>,
}

/// Owns the local view and connectivity state of one collection
#[derive(Debug)]
pub struct ReconciliationEngine {
    collection: String,
    view: watch::Sender<LocalView>,
    connectivity: watch::Sender<Connectivity>,
}

impl ReconciliationEngine {
    /// Create an engine with an empty view, waiting for the first snapshot
    pub fn new(collection: impl Into<String>) -> Self {
        let (view, _) = watch::channel(LocalView::default());
        let (connectivity, _) = watch::channel(Connectivity::Connecting);
        Self {
            collection: collection.into(),
            view,
            connectivity,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Replace the view with a remote snapshot
    pub fn apply(&self, mut snapshot: Snapshot) -> ReconcileOutcome {
        ordering::sort_items(&mut snapshot);
        let collisions = ordering::find_collisions(&snapshot);
        if !collisions.is_empty() {
            tracing::warn!(
                "[Sync] Snapshot of '{}' has {} colliding positions",
                self.collection,
                collisions.len()
            );
        }

        let count = snapshot.len();
        let mut revision = 0;
        let mut discarded_optimistic = false;
        self.view.send_modify(|view| {
            discarded_optimistic = view.optimistic;
            view.items = snapshot;
            view.revision += 1;
            view.last_snapshot_at = Some(Utc::now());
            view.optimistic = false;
            revision = view.revision;
        });

        self.connectivity.send_if_modified(|state| {
            if matches!(state, Connectivity::Live) {
                false
            } else {
                if state.is_degraded() {
                    tracing::info!("[Sync] Subscription to '{}' restored", self.collection);
                }
                *state = Connectivity::Live;
                true
            }
        });

        tracing::debug!(
            "[Sync] Applied snapshot of '{}' ({} items, revision {}, discarded optimistic: {})",
            self.collection,
            count,
            revision,
            discarded_optimistic
        );

        ReconcileOutcome {
            revision,
            discarded_optimistic,
            collisions,
        }
    }

    /// Record a broken subscription; the view is kept as-is
    pub fn stream_failed(&self, error: &StoreError) {
        tracing::warn!(
            "[Sync] Subscription to '{}' failed, keeping last snapshot: {}",
            self.collection,
            error
        );
        self.connectivity.send_replace(Connectivity::degraded(error.to_string()));
    }

    /// Record that the subscription stream ended without being cancelled
    pub fn stream_ended(&self) {
        tracing::warn!("[Sync] Subscription to '{}' ended", self.collection);
        self.connectivity
            .send_replace(Connectivity::degraded("subscription closed by store"));
    }

    /// Mark the engine closed; the view stays readable
    pub fn close(&self) {
        self.connectivity.send_replace(Connectivity::Closed);
    }

    /// Apply a local change ahead of remote confirmation
    pub fn optimistic<R>(&self, change: impl FnOnce(&mut Vec<Item>) -> R) -> R {
        let mut result = None;
        self.view.send_modify(|view| {
            result = Some(change(&mut view.items));
            view.revision += 1;
            view.optimistic = true;
        });
        match result {
            Some(result) => result,
            // send_modify always runs the closure exactly once
            None => unreachable!("optimistic change closure did not run"),
        }
    }

    /// Current view (cloned)
    pub fn view(&self) -> LocalView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change
    pub fn watch_view(&self) -> watch::Receiver<LocalView> {
        self.view.subscribe()
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity.borrow().clone()
    }

    /// Receiver notified on connectivity changes
    pub fn watch_connectivity(&self) -> watch::Receiver<Connectivity> {
        self.connectivity.subscribe()
    }
}
