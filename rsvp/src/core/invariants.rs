//! Invariants of a mapped guest list.

use std::collections::HashSet;

use crate::core::error::MapError;
use crate::core::types::Guest;

/// Numeric guest ids must be unique within a read.
///
/// Guests without a numeric id are skipped; they can never be targeted by a
/// submission, so they cannot collide on the write path either.
pub fn check_unique_ids(guests: &[Guest]) -> Result<(), MapError> {
    let mut seen = HashSet::new();
    for id in guests.iter().filter_map(|guest| guest.id) {
        if !seen.insert(id) {
            return Err(MapError::DuplicateGuestId(id));
        }
    }
    Ok(())
}
