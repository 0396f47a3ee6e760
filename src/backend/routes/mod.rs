//! Route Configuration Module
//!
//! - **`router`** - Router assembly
//! - **`items`** - `/api/items` handlers
//!
//! ## Routes
//!
//! - `GET /api/items` - Canned sample list
//! - `POST /api/items` - Echo a submitted item form

/// Main router creation
pub mod router;

/// Sample item handlers
pub mod items;

pub use router::create_router;
