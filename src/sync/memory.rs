//! # In-Process Document Store
//!
//! [`MemoryStore`] is a [`RemoteStore`] that keeps documents in memory and
//! behaves like a push-based document database:
//!
//! - documents are JSON maps; ids are uuid v4 strings
//! - `createdAt` is assigned by the store on create and is read-only
//! - every committed write pushes a full snapshot to every subscriber of the
//!   collection over a `tokio::sync::broadcast` channel
//! - a new subscriber receives the current snapshot immediately
//! - `batch_update` checks every target before changing anything
//!
//! It also carries fault hooks (`fail_next_writes`, `hold_writes`,
//! `break_stream`) so the engine's degraded paths can be exercised.

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::sync::broadcast::error::RecvError;

use crate::shared::error::StoreError;
use crate::shared::item::{fields, Document, FieldChanges, Item, ItemId};
use crate::sync::remote::{Delivery, RemoteStore, Snapshot, Subscription};

/// Broadcast buffer per collection; lagging subscribers skip to newer
/// snapshots
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

type RawSnapshot = Arc<Vec<(ItemId, Document)>>;
type RawDelivery = Result<RawSnapshot, StoreError>;

struct CollectionState {
    documents: BTreeMap<ItemId, Document>,
    tx: broadcast::Sender<RawDelivery>,
    /// Order field of the most recent subscription
    order_field: String,
}

impl CollectionState {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            documents: BTreeMap::new(),
            tx,
            order_field: fields::POSITION.to_string(),
        }
    }

    fn raw_snapshot(&self) -> RawSnapshot {
        Arc::new(
            self.documents
                .iter()
                .map(|(id, document)| (id.clone(), document.clone()))
                .collect(),
        )
    }

    fn publish(&self, collection: &str) {
        match self.tx.send(Ok(self.raw_snapshot())) {
            Ok(subscribers) => {
                tracing::debug!(
                    "[Store] Pushed snapshot of '{}' to {} subscribers",
                    collection,
                    subscribers
                );
            }
            Err(_) => {
                tracing::debug!("[Store] No subscribers for '{}'", collection);
            }
        }
    }
}

/// Push-based in-memory document store
pub struct MemoryStore {
    collections: RwLock<HashMap<String, CollectionState>>,
    fail_next: AtomicUsize,
    gate: watch::Sender<bool>,
    batches: Mutex<Vec<Vec<(ItemId, FieldChanges)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            collections: RwLock::new(HashMap::new()),
            fail_next: AtomicUsize::new(0),
            gate,
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Insert items as-is (ids and creation times preserved) and push a
    /// snapshot
    pub async fn seed(&self, collection: &str, items: &[Item]) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let state = collections
            .entry(collection.to_string())
            .or_insert_with(CollectionState::new);
        for item in items {
            let document = item
                .to_document()
                .map_err(|e| StoreError::Codec(e.to_string()))?;
            state.documents.insert(item.id.clone(), document);
        }
        state.publish(collection);
        Ok(())
    }

    /// Make the next `count` writes fail with `Unavailable`
    pub fn fail_next_writes(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// Park every write until [`MemoryStore::release_writes`]
    pub fn hold_writes(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_writes(&self) {
        self.gate.send_replace(true);
    }

    /// Push a stream error to every subscriber of `collection`
    pub async fn break_stream(&self, collection: &str, reason: &str) {
        let collections = self.collections.read().await;
        if let Some(state) = collections.get(collection) {
            let _ = state.tx.send(Err(StoreError::Unavailable(reason.to_string())));
        }
    }

    /// Raw stored document
    pub async fn document(&self, collection: &str, id: &ItemId) -> Option<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|state| state.documents.get(id).cloned())
    }

    /// Current decoded contents of `collection`, ordered like its
    /// subscriptions (by `position` until someone subscribes)
    pub async fn items(&self, collection: &str) -> Snapshot {
        let collections = self.collections.read().await;
        match collections.get(collection) {
            Some(state) => decode_snapshot(collection, &state.raw_snapshot(), &state.order_field),
            None => Vec::new(),
        }
    }

    /// Every committed batch, in commit order
    pub fn committed_batches(&self) -> Vec<Vec<(ItemId, FieldChanges)>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }

    async fn admit_write(&self, op: &str) -> Result<(), StoreError> {
        let mut gate = self.gate.subscribe();
        loop {
            let open = *gate.borrow_and_update();
            if open || gate.changed().await.is_err() {
                break;
            }
        }

        let injected = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            tracing::debug!("[Store] Injected failure for {}", op);
            return Err(StoreError::Unavailable(format!("{} failed", op)));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn reject_read_only(changes: &FieldChanges) -> Result<(), StoreError> {
    if changes.get(fields::CREATED_AT).is_some() {
        return Err(StoreError::Rejected(format!("{} is read-only", fields::CREATED_AT)));
    }
    Ok(())
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        // Documents missing the field sort last
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        _ => CmpOrdering::Equal,
    }
}

/// Order raw documents by `order_field` (then creation time, then id) and
/// decode them, skipping documents that are not valid items
fn decode_snapshot(collection: &str, raw: &[(ItemId, Document)], order_field: &str) -> Snapshot {
    let mut ordered: Vec<&(ItemId, Document)> = raw.iter().collect();
    ordered.sort_by(|(a_id, a), (b_id, b)| {
        compare_values(a.get(order_field), b.get(order_field))
            .then_with(|| compare_values(a.get(fields::CREATED_AT), b.get(fields::CREATED_AT)))
            .then_with(|| a_id.cmp(b_id))
    });

    ordered
        .into_iter()
        .filter_map(|(id, document)| match Item::from_document(id.clone(), document) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("[Store] Skipping malformed document {} in '{}': {}", id, collection, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn subscribe(
        &self,
        collection: &str,
        order_field: &str,
    ) -> Result<Subscription, StoreError> {
        let (initial, rx) = {
            let mut collections = self.collections.write().await;
            let state = collections
                .entry(collection.to_string())
                .or_insert_with(CollectionState::new);
            state.order_field = order_field.to_string();
            (state.raw_snapshot(), state.tx.subscribe())
        };

        let name = collection.to_string();
        let field = order_field.to_string();
        let first: Delivery = Ok(decode_snapshot(&name, &initial, &field));

        let updates = stream::unfold((rx, name.clone(), field), |(mut rx, name, field)| async move {
            loop {
                match rx.recv().await {
                    Ok(Ok(raw)) => {
                        let snapshot = decode_snapshot(&name, &raw, &field);
                        return Some((Ok(snapshot), (rx, name, field)));
                    }
                    Ok(Err(error)) => return Some((Err(error), (rx, name, field))),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("[Store] Subscriber of '{}' lagged, skipped {} snapshots", name, skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });

        tracing::debug!("[Store] Subscribed to '{}' ordered by '{}'", name, order_field);
        Ok(Subscription::new(name, stream::once(async move { first }).chain(updates).boxed()))
    }

    async fn create(&self, collection: &str, mut document: Document) -> Result<ItemId, StoreError> {
        self.admit_write("create").await?;

        let id = ItemId::new(uuid::Uuid::new_v4().to_string());
        document.insert(fields::CREATED_AT.to_string(), serde_json::to_value(Utc::now())?);

        let mut collections = self.collections.write().await;
        let state = collections
            .entry(collection.to_string())
            .or_insert_with(CollectionState::new);
        state.documents.insert(id.clone(), document);
        state.publish(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &ItemId,
        changes: FieldChanges,
    ) -> Result<(), StoreError> {
        self.admit_write("update").await?;
        reject_read_only(&changes)?;

        let mut collections = self.collections.write().await;
        let state = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let document = state
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        changes.apply_to(document);
        state.publish(collection);
        Ok(())
    }

    async fn batch_update(
        &self,
        collection: &str,
        updates: Vec<(ItemId, FieldChanges)>,
    ) -> Result<(), StoreError> {
        self.admit_write("batch update").await?;

        let mut collections = self.collections.write().await;
        let state = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, "*"))?;

        for (id, changes) in &updates {
            reject_read_only(changes)?;
            if !state.documents.contains_key(id) {
                return Err(StoreError::not_found(collection, id));
            }
        }
        for (id, changes) in &updates {
            if let Some(document) = state.documents.get_mut(id) {
                changes.apply_to(document);
            }
        }
        state.publish(collection);

        if let Ok(mut batches) = self.batches.lock() {
            batches.push(updates);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &ItemId) -> Result<(), StoreError> {
        self.admit_write("delete").await?;

        let mut collections = self.collections.write().await;
        if let Some(state) = collections.get_mut(collection) {
            // Deleting a missing document is not an error
            if state.documents.remove(id).is_some() {
                state.publish(collection);
            }
        }
        Ok(())
    }
}
