//! # List Session
//!
//! A [`ListSession`] owns everything tied to one selected collection: the
//! live subscription, the reconciliation engine holding the local view, and
//! the writers that mutate it. There is no process-wide state; selecting
//! another collection closes the session and opens a new one, discarding
//! any optimistic changes made in the old one.
//!
//! ## Lifecycle
//!
//! ```text
//! open ─► Connecting ─► Live ◄─► Degraded
//!                          │
//!                 close / switch_collection ─► Closed
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hearthlist::shared::AppConfig;
//! use hearthlist::sync::{ListSession, MemoryStore, NewItemForm};
//!
//! # async fn example() -> Result<(), hearthlist::shared::ListError> {
//! let store = Arc::new(MemoryStore::new());
//! let session = ListSession::open(store, &AppConfig::default()).await?;
//! session.add(&NewItemForm::new("Milk", "Kitchen")).await?;
//! let view = session.view();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::shared::config::AppConfig;
use crate::shared::error::{ListError, ListResult};
use crate::shared::item::ItemId;
use crate::sync::dispatcher::MutationDispatcher;
use crate::sync::forms::{EditForm, NewItemForm};
use crate::sync::reconciliation::{LocalView, ReconciliationEngine};
use crate::sync::remote::{RemoteStore, Subscription};
use crate::sync::reorder::{DragGesture, ReorderBatchBuilder, ReorderPlan};
use crate::sync::sync_state::Connectivity;
use crate::sync::view::ViewProjector;

/// Live, scoped view of one collection
pub struct ListSession {
    collection: String,
    order_field: String,
    repair_collisions: bool,
    store: Arc<dyn RemoteStore>,
    engine: Arc<ReconciliationEngine>,
    dispatcher: MutationDispatcher,
    reorder: ReorderBatchBuilder,
    pump: Option<JoinHandle<()>>,
}

impl ListSession {
    /// Open the collection named in `config`
    pub async fn open(store: Arc<dyn RemoteStore>, config: &AppConfig) -> ListResult<Self> {
        Self::open_collection(store, &config.collection, config).await
    }

    /// Subscribe to `collection` and start applying its snapshots
    pub async fn open_collection(
        store: Arc<dyn RemoteStore>,
        collection: &str,
        config: &AppConfig,
    ) -> ListResult<Self> {
        let subscription = store
            .subscribe(collection, &config.order_field)
            .await
            .map_err(|e| ListError::stream(e.to_string()))?;

        let engine = Arc::new(ReconciliationEngine::new(collection));
        let dispatcher = MutationDispatcher::new(Arc::clone(&store), Arc::clone(&engine));
        let reorder = ReorderBatchBuilder::new(config.order_field.clone());

        let pump = tokio::spawn(pump_snapshots(
            subscription,
            Arc::clone(&engine),
            config.repair_collisions.then(|| (Arc::clone(&store), reorder.clone())),
        ));

        tracing::info!("[Sync] Opened session for '{}'", collection);
        Ok(Self {
            collection: collection.to_string(),
            order_field: config.order_field.clone(),
            repair_collisions: config.repair_collisions,
            store,
            engine,
            dispatcher,
            reorder,
            pump: Some(pump),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Current local view
    pub fn view(&self) -> LocalView {
        self.engine.view()
    }

    /// Receiver notified on every view change
    pub fn watch_view(&self) -> watch::Receiver<LocalView> {
        self.engine.watch_view()
    }

    /// Stream yielding the current view, then every later view
    pub fn view_updates(&self) -> WatchStream<LocalView> {
        WatchStream::new(self.engine.watch_view())
    }

    pub fn connectivity(&self) -> Connectivity {
        self.engine.connectivity()
    }

    pub fn watch_connectivity(&self) -> watch::Receiver<Connectivity> {
        self.engine.watch_connectivity()
    }

    /// Filtered projection that follows this session's view
    pub fn projector(&self) -> ViewProjector {
        ViewProjector::new(self.engine.watch_view())
    }

    /// Wait until the view satisfies `predicate`
    pub async fn wait_for(&self, mut predicate: impl FnMut(&LocalView) -> bool) -> ListResult<LocalView> {
        let mut rx = self.engine.watch_view();
        loop {
            {
                let view = rx.borrow_and_update();
                if predicate(&view) {
                    return Ok(view.clone());
                }
            }
            rx.changed().await.map_err(|_| ListError::SessionClosed)?;
        }
    }

    pub async fn add(&self, form: &NewItemForm) -> ListResult<ItemId> {
        self.dispatcher.add(form).await
    }

    pub async fn edit(&self, id: &ItemId, form: &EditForm) -> ListResult<()> {
        self.dispatcher.edit(id, form).await
    }

    pub fn toggle(&self, id: &ItemId) -> ListResult<bool> {
        self.dispatcher.toggle(id)
    }

    pub async fn remove(&self, id: &ItemId) -> ListResult<()> {
        self.dispatcher.remove(id).await
    }

    /// Apply a drag gesture on the displayed list and commit it atomically
    ///
    /// The new order is shown immediately. If the batch fails, it stays
    /// visible until the next snapshot replaces it.
    pub async fn reorder(&self, displayed: &[ItemId], gesture: &DragGesture) -> ListResult<ReorderPlan> {
        let plan = self.reorder.plan(&self.engine.view().items, displayed, gesture)?;
        if plan.is_noop() {
            return Ok(plan);
        }
        self.engine.optimistic(|items| plan.apply_to(items));
        self.reorder.commit(&self.store, &self.collection, &plan).await?;
        Ok(plan)
    }

    /// Close this session and open `collection` on the same store
    pub async fn switch_collection(mut self, collection: &str) -> ListResult<ListSession> {
        self.shutdown();
        let config = AppConfig {
            collection: collection.to_string(),
            order_field: self.order_field.clone(),
            repair_collisions: self.repair_collisions,
            ..AppConfig::default()
        };
        tracing::info!("[Sync] Switching from '{}' to '{}'", self.collection, collection);
        Self::open_collection(Arc::clone(&self.store), collection, &config).await
    }

    /// Unsubscribe and stop applying snapshots
    pub fn close(mut self) {
        self.shutdown();
    }

    pub fn is_closed(&self) -> bool {
        self.pump.is_none()
    }

    fn shutdown(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
            self.engine.close();
            tracing::info!("[Sync] Closed session for '{}'", self.collection);
        }
    }
}

impl Drop for ListSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Feed snapshots into the engine until the subscription ends or the task
/// is aborted
async fn pump_snapshots(
    mut subscription: Subscription,
    engine: Arc<ReconciliationEngine>,
    repair: Option<(Arc<dyn RemoteStore>, ReorderBatchBuilder)>,
) {
    while let Some(delivery) = subscription.next().await {
        match delivery {
            Ok(snapshot) => {
                let outcome = engine.apply(snapshot);
                if outcome.collisions.is_empty() {
                    continue;
                }
                if let Some((store, builder)) = &repair {
                    spawn_repair(Arc::clone(store), builder.clone(), Arc::clone(&engine));
                }
            }
            Err(e) => engine.stream_failed(&e),
        }
    }
    engine.stream_ended();
}

/// Commit a normalising batch for a snapshot with duplicate positions
fn spawn_repair(store: Arc<dyn RemoteStore>, builder: ReorderBatchBuilder, engine: Arc<ReconciliationEngine>) {
    let plan = builder.normalize(&engine.view().items);
    if plan.is_noop() {
        return;
    }
    tracing::warn!(
        "[Sync] Repairing {} colliding positions in '{}'",
        plan.writes.len(),
        engine.collection()
    );
    tokio::spawn(async move {
        if let Err(e) = builder.commit(&store, engine.collection(), &plan).await {
            tracing::debug!("[Sync] Repair of '{}' deferred to next snapshot: {}", engine.collection(), e);
        }
    });
}
