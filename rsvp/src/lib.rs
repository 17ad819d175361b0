//! Bridge between a spreadsheet guest list and an RSVP JSON API.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic. Rows to guests
//!   ([`core::row_mapper`]) and submitted answers back into rows
//!   ([`core::merge_writer`]). No I/O, fully testable in isolation.
//! - **[`io`]**: The spreadsheet store, its credentials and configuration.
//!
//! [`service`] coordinates both to implement the fetch and submit requests.

pub mod core;
pub mod io;
pub mod logging;
pub mod messages;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
