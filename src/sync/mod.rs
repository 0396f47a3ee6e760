//! Sync Module
//!
//! Keeps a local view of one shared list collection in step with a remote
//! document store.
//!
//! # Overview
//!
//! - **`remote`** - the [`RemoteStore`] seam and live [`Subscription`]s
//! - **`memory`** - push-based in-process store used by tests and demos
//! - **`ordering`** - total order and contiguous position assignment
//! - **`reconciliation`** - snapshot application and the published view
//! - **`forms`** - user input validation for adds and edits
//! - **`dispatcher`** - optimistic add, edit, toggle and remove
//! - **`reorder`** - drag gestures turned into atomic position batches
//! - **`view`** - filtered projection with aggregates
//! - **`session`** - everything scoped to one open collection

pub mod remote;
pub mod memory;
pub mod ordering;
pub mod sync_state;
pub mod reconciliation;
pub mod forms;
pub mod dispatcher;
pub mod reorder;
pub mod view;
pub mod session;

pub use remote::{Delivery, RemoteStore, Snapshot, Subscription};
pub use memory::MemoryStore;
pub use sync_state::Connectivity;
pub use reconciliation::{LocalView, ReconcileOutcome, ReconciliationEngine};
pub use forms::{EditForm, NewItemForm, ValidItem};
pub use dispatcher::MutationDispatcher;
pub use reorder::{DragGesture, ReorderBatchBuilder, ReorderPlan};
pub use view::{project, CategoryFilter, Projection, StatusFilter, ViewFilter, ViewProjector};
pub use session::ListSession;
