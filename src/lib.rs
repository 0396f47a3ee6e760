//! Hearthlist - Main Library
//!
//! Hearthlist keeps a shared household list (shopping, chores, supplies) in
//! sync between several clients through a push-based remote document store.
//!
//! # Overview
//!
//! This library provides:
//! - A live local view of one collection, rebuilt from every remote snapshot
//! - Optimistic add, edit, toggle and remove
//! - Drag-to-reorder on a filtered list, committed as one atomic batch
//! - Filtered projections with count, completion and price aggregates
//! - A local-only fallback store and a sample-data client
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by every side
//!   - `Item`, `Category`, field change sets
//!   - Error types
//!   - Application configuration
//!
//! - **`sync`** - The sync engine
//!   - Remote store boundary and an in-process store
//!   - Reconciliation, mutation dispatch, reorder batches, view projection
//!   - `ListSession`, scoped to one open collection
//!
//! - **`fallback`** - SQLite key/value blob store for local-only use
//!
//! - **`sample`** - HTTP client for the sample-data endpoint
//!
//! - **`backend`** - The sample-data endpoint (only compiled with `ssr`)
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the Axum sample server and its binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hearthlist::shared::AppConfig;
//! use hearthlist::sync::{DragGesture, ListSession, MemoryStore, StatusFilter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load("hearthlist.toml")?;
//! let session = ListSession::open(Arc::new(MemoryStore::new()), &config).await?;
//!
//! let projector = session.projector();
//! projector.set_status(StatusFilter::Active);
//! let displayed = projector.projection().ids();
//! if let Some(last) = displayed.last() {
//!     session.reorder(&displayed, &DragGesture::new(last.clone(), 0)).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Consistency
//!
//! Remote snapshots always win. Local changes are visible immediately but
//! last only until the next snapshot; if the write failed, that snapshot
//! silently restores the remote state.

/// Shared types and data structures
pub mod shared;

/// Sync engine
pub mod sync;

/// Local-only fallback store
pub mod fallback;

/// Sample-data client
pub mod sample;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
