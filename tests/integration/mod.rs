//! End-to-end tests of the door service.
//!
//! Each test drives the axum router against a JSON document in a temporary
//! directory, so both the HTTP contract and the on-disk effects can be asserted.

pub mod conditional_operations;
pub mod file_persistence;
pub mod id_assignment;
pub mod property_tests;
