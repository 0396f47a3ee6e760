//! # Mutation Dispatcher
//!
//! Turns user intents into remote writes. Every operation validates first,
//! applies its effect to the local view immediately, then talks to the
//! store. Nothing is retried or rolled back: if a write fails, the next
//! snapshot restores the remote truth.
//!
//! | Operation | Optimistic effect        | Remote write                |
//! |-----------|--------------------------|-----------------------------|
//! | `add`     | provisional item at end  | create, awaited             |
//! | `edit`    | field changes applied    | update, awaited             |
//! | `toggle`  | `completed` flipped      | update, fire-and-forget     |
//! | `remove`  | item dropped             | delete, awaited             |

use std::sync::Arc;

use crate::shared::error::{ListError, ListResult};
use crate::shared::item::{fields, FieldChanges, ItemId};
use crate::sync::forms::{EditForm, NewItemForm};
use crate::sync::ordering;
use crate::sync::reconciliation::ReconciliationEngine;
use crate::sync::remote::RemoteStore;

/// Issues optimistic mutations for one collection
#[derive(Clone)]
pub struct MutationDispatcher {
    collection: String,
    store: Arc<dyn RemoteStore>,
    engine: Arc<ReconciliationEngine>,
}

impl MutationDispatcher {
    pub fn new(store: Arc<dyn RemoteStore>, engine: Arc<ReconciliationEngine>) -> Self {
        Self {
            collection: engine.collection().to_string(),
            store,
            engine,
        }
    }

    /// Append a new item; returns the id assigned by the store
    pub async fn add(&self, form: &NewItemForm) -> ListResult<ItemId> {
        let valid = form.validate()?;
        let position = ordering::next_position(&self.engine.view().items);
        let document = valid.to_document(position)?;

        let provisional = valid.provisional_item(position);
        tracing::debug!(
            "[Dispatch] Adding '{}' to '{}' at position {} (provisional id {})",
            valid.title,
            self.collection,
            position,
            provisional.id
        );
        self.engine.optimistic(|items| items.push(provisional));

        match self.store.create(&self.collection, document).await {
            Ok(id) => {
                tracing::debug!("[Dispatch] Created {} in '{}'", id, self.collection);
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("[Dispatch] Create in '{}' failed: {}", self.collection, e);
                Err(ListError::remote_write("create", &e))
            }
        }
    }

    /// Apply a partial edit; cleared optional fields are removed remotely
    pub async fn edit(&self, id: &ItemId, form: &EditForm) -> ListResult<()> {
        let changes = form.to_changes()?;
        if changes.is_empty() {
            return Ok(());
        }
        if !self.engine.view().contains(id) {
            return Err(ListError::unknown_item(id));
        }

        self.engine.optimistic(|items| {
            match items.iter_mut().find(|item| &item.id == id) {
                Some(item) => changes.apply_to_item(item),
                None => Ok(()),
            }
        })?;

        self.update(id, changes).await
    }

    /// Flip `completed`; the remote write runs in the background and
    /// failures are only logged. Returns the new value.
    pub fn toggle(&self, id: &ItemId) -> ListResult<bool> {
        if !self.engine.view().contains(id) {
            return Err(ListError::unknown_item(id));
        }
        let completed = self.engine.optimistic(|items| {
            items.iter_mut().find(|item| &item.id == id).map(|item| {
                item.completed = !item.completed;
                item.completed
            })
        });
        let completed = completed.ok_or_else(|| ListError::unknown_item(id))?;

        let store = Arc::clone(&self.store);
        let collection = self.collection.clone();
        let id = id.clone();
        tokio::spawn(async move {
            let changes = FieldChanges::new().set(fields::COMPLETED, completed);
            if let Err(e) = store.update(&collection, &id, changes).await {
                tracing::warn!(
                    "[Dispatch] Toggle of {} in '{}' failed, next snapshot will correct it: {}",
                    id,
                    collection,
                    e
                );
            }
        });

        Ok(completed)
    }

    /// Remove an item; on failure it reappears with the next snapshot
    pub async fn remove(&self, id: &ItemId) -> ListResult<()> {
        if !self.engine.view().contains(id) {
            return Err(ListError::unknown_item(id));
        }
        let removed = self.engine.optimistic(|items| {
            let before = items.len();
            items.retain(|item| &item.id != id);
            items.len() != before
        });
        if !removed {
            return Err(ListError::unknown_item(id));
        }

        if id.is_provisional() {
            // Never reached the store; the pending create's snapshot decides
            return Ok(());
        }

        self.store.delete(&self.collection, id).await.map_err(|e| {
            tracing::warn!("[Dispatch] Delete of {} in '{}' failed: {}", id, self.collection, e);
            ListError::remote_write("delete", &e)
        })
    }

    async fn update(&self, id: &ItemId, changes: FieldChanges) -> ListResult<()> {
        self.store
            .update(&self.collection, id, changes)
            .await
            .map_err(|e| {
                tracing::warn!("[Dispatch] Update of {} in '{}' failed: {}", id, self.collection, e);
                ListError::remote_write("update", &e)
            })
    }
}
