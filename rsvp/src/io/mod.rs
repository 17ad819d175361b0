//! I/O collaborators: the sheet store, its credentials and configuration.

pub mod auth;
pub mod config;
pub mod sheets;
pub mod store;
