//! Shared Error Types
//!
//! This module defines the error taxonomy of the list engine. None of these
//! errors is fatal: every failure degrades to "stale but eventually
//! consistent" local state that the next remote snapshot corrects.
//!
//! # Error Categories
//!
//! - `Validation` - Bad user input, rejected before any remote call
//! - `RemoteWrite` - A single-item write failed (logged, never retried)
//! - `Stream` - The live subscription broke (last good view is kept)
//! - `BatchCommit` - An atomic reorder batch failed as a whole
//! - `UnknownItem` - The id is not in the current local view
//! - `SessionClosed` - The owning session was torn down
//! - `Serialization` - Document encode/decode failure
//!
//! # Usage
//!
//! ```rust
//! use hearthlist::shared::error::ListError;
//!
//! let error = ListError::validation("title", "Title cannot be empty");
//! assert!(error.is_user_facing());
//! ```
use thiserror::Error;

/// Result alias used across the engine
pub type ListResult<T> = Result<T, ListError>;

/// Errors surfaced by the list engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ListError {
    /// User input failed validation
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// A single-item remote write failed
    #[error("Remote {op} failed: {message}")]
    RemoteWrite {
        /// Operation name (create, update, delete)
        op: &'static str,
        message: String,
    },

    /// The snapshot subscription broke
    #[error("Subscription error: {message}")]
    Stream { message: String },

    /// A reorder batch failed atomically
    #[error("Batch commit of {updates} position updates failed: {message}")]
    BatchCommit { updates: usize, message: String },

    /// The item is not present in the local view
    #[error("Unknown item '{id}'")]
    UnknownItem { id: String },

    /// The session that owned this operation has been closed
    #[error("Session is closed")]
    SessionClosed,

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ListError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new remote write error
    pub fn remote_write(op: &'static str, source: &StoreError) -> Self {
        Self::RemoteWrite {
            op,
            message: source.to_string(),
        }
    }

    /// Create a new stream error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Create a new batch commit error
    pub fn batch_commit(updates: usize, source: &StoreError) -> Self {
        Self::BatchCommit {
            updates,
            message: source.to_string(),
        }
    }

    pub fn unknown_item(id: impl ToString) -> Self {
        Self::UnknownItem { id: id.to_string() }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether the error should be shown to the user as a form message
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Errors reported by a remote store adapter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The document does not exist
    #[error("document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },

    /// The store could not be reached or refused service
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// A document could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: impl ToString) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = ListError::validation("price", "Price must be a number");
        match error {
            ListError::Validation { field, message } => {
                assert_eq!(field, "price");
                assert_eq!(message, "Price must be a number");
            }
            _ => panic!("Expected Validation"),
        }
    }

    #[test]
    fn test_remote_write_carries_store_message() {
        let error = ListError::remote_write("delete", &StoreError::Unavailable("offline".into()));
        let display = format!("{}", error);
        assert!(display.contains("Remote delete failed"));
        assert!(display.contains("offline"));
        assert!(!error.is_user_facing());
    }

    #[test]
    fn test_batch_commit_display() {
        let error = ListError::batch_commit(3, &StoreError::Rejected("conflict".into()));
        assert_eq!(
            error.to_string(),
            "Batch commit of 3 position updates failed: request rejected: conflict"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let list_error: ListError = result.unwrap_err().into();
        assert!(matches!(list_error, ListError::Serialization { .. }));
    }

    #[test]
    fn test_not_found_display() {
        let error = StoreError::not_found("shopping", "abc");
        assert_eq!(error.to_string(), "document 'abc' not found in 'shopping'");
    }
}
