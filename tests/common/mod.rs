//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Item and store fixtures
//! - Session helpers that wait for the view to converge
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;

// Re-export commonly used utilities
pub use fixtures::*;
