//! # Remote Store Boundary
//!
//! The list engine talks to its system of record through [`RemoteStore`].
//! The store pushes complete, ordered snapshots of a collection to every
//! subscriber and accepts single-document writes plus one atomic
//! multi-document batch used for reordering.
//!
//! A [`Subscription`] is owned by exactly one consumer. Dropping it, or
//! calling [`Subscription::cancel`], unsubscribes.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::Stream;

use crate::shared::error::StoreError;
use crate::shared::item::{Document, FieldChanges, Item, ItemId};

/// A complete, ordered listing of a collection
pub type Snapshot = Vec<Item>;

/// What a subscription yields: a snapshot, or a broken-stream report
pub type Delivery = Result<Snapshot, StoreError>;

/// Document store the list is synchronised against
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Open a live, ordered snapshot stream for `collection`
    async fn subscribe(&self, collection: &str, order_field: &str)
        -> Result<Subscription, StoreError>;

    /// Create a document; the store assigns id and creation time
    async fn create(&self, collection: &str, document: Document) -> Result<ItemId, StoreError>;

    /// Apply field changes to one document
    async fn update(
        &self,
        collection: &str,
        id: &ItemId,
        changes: FieldChanges,
    ) -> Result<(), StoreError>;

    /// Apply field changes to several documents, all or nothing
    async fn batch_update(
        &self,
        collection: &str,
        updates: Vec<(ItemId, FieldChanges)>,
    ) -> Result<(), StoreError>;

    /// Delete one document
    async fn delete(&self, collection: &str, id: &ItemId) -> Result<(), StoreError>;
}

/// Cancellable stream of snapshots for one collection
pub struct Subscription {
    collection: String,
    inner: Option<BoxStream<'static, Delivery>>,
}

impl Subscription {
    pub fn new(collection: impl Into<String>, stream: BoxStream<'static, Delivery>) -> Self {
        Self {
            collection: collection.into(),
            inner: Some(stream),
        }
    }

    /// Collection this subscription follows
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Stop receiving snapshots; the stream ends immediately
    pub fn cancel(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("[Store] Unsubscribed from '{}'", self.collection);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_none()
    }
}

impl Stream for Subscription {
    type Item = Delivery;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.as_mut() {
            Some(stream) => stream.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("collection", &self.collection)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
