//! Integration tests

pub mod session_test;
pub mod fallback_test;
pub mod sample_test;
