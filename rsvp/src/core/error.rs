//! Errors raised while turning sheet rows into guests.

use thiserror::Error;

/// Mapping failures. Any of these aborts the whole read; no partial guest
/// list is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// An `invitedFor` token that is not in the activity catalog.
    #[error("unknown activity: {0}")]
    UnknownActivity(String),

    /// The header row lacks a column the schema requires.
    #[error("missing header column '{0}'")]
    MissingHeader(String),

    /// A header sits at a different position than the rewrite of a row
    /// assumes.
    #[error("header '{header}' is in column {found}, expected column {expected}")]
    LayoutMismatch {
        header: String,
        expected: usize,
        found: usize,
    },

    /// Two data rows share the same numeric guest id.
    #[error("duplicate guest id {0}")]
    DuplicateGuestId(i64),
}
