//! Shared Module
//!
//! Types shared by the sync engine, the local fallback store, the sample
//! client and the sample server.
//!
//! # Overview
//!
//! Everything here is platform-agnostic and serializable: the list item and
//! its change sets, the error taxonomy, and application configuration.

/// List item, category taxonomy and field changes
pub mod item;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use item::{Category, Document, FieldChange, FieldChanges, Item, ItemId};
pub use error::{ListError, ListResult, StoreError};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
