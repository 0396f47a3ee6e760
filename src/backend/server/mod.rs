//! Server Module
//!
//! - **`state`** - Shared application state
//! - **`init`** - App creation

/// Application state
pub mod state;

/// Server initialization
pub mod init;

pub use state::AppState;
pub use init::create_app;
