//! Fixed caller-facing status messages.

/// Submission stored.
pub const WRITE_SUCCESS: &str = "Aanwezigheden succesvol opgeslagen!";
/// Submission could not be stored.
pub const WRITE_ERROR: &str = "Er ging iets mis bij het opslagen van de aanwezigheden!";
/// Sheet read (logged only).
pub const READ_SUCCESS: &str = "Sheet met succes uitgelezen!";
/// Sheet could not be read or interpreted.
pub const READ_ERROR: &str = "Er ging iets mis bij het uitlezen van de sheet!";
