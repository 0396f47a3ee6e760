//! Backend Module
//!
//! Server side of the sample-data endpoint: a small Axum application that
//! serves a canned list of household items and echoes submitted item forms.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Application state and app creation
//! - **`routes`** - Router assembly and the `/api/items` handlers
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - State and initialization
//! └── routes/         - Router and handlers
//! ```

/// Server state and initialization
pub mod server;

/// Route configuration and handlers
pub mod routes;

pub use server::{create_app, AppState};
