//! Property-based tests

pub mod ordering_proptest;
pub mod reorder_proptest;
