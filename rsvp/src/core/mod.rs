//! Deterministic, pure logic for the guest sheet.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! rows and guests and return deterministic outputs suitable for tests.

pub mod activity;
pub mod error;
pub mod invariants;
pub mod merge_writer;
pub mod row_mapper;
pub mod schema;
pub mod types;
