//! The external tabular store holding the guest sheet.

use std::sync::Mutex;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::core::types::SheetRow;

/// Failures talking to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Obtaining or using credentials failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The store answered with a body we could not interpret.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The call did not complete within the configured deadline.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// A remote range of rows that is read and replaced as a whole.
///
/// Implementations perform exactly one remote call per method and never
/// retry.
pub trait SheetStore: Send + Sync {
    /// Read the configured range, header row first.
    fn read(&self) -> BoxFuture<'_, Result<Vec<SheetRow>, StoreError>>;

    /// Replace the configured range with `rows`.
    fn write(&self, rows: Vec<SheetRow>) -> BoxFuture<'_, Result<(), StoreError>>;
}

/// In-process store backed by a vector of rows.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<SheetRow>>,
}

impl MemoryStore {
    pub fn new(rows: Vec<SheetRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> Vec<SheetRow> {
        match self.rows.lock() {
            Ok(rows) => rows.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SheetStore for MemoryStore {
    fn read(&self) -> BoxFuture<'_, Result<Vec<SheetRow>, StoreError>> {
        Box::pin(async move { Ok(self.snapshot()) })
    }

    fn write(&self, rows: Vec<SheetRow>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            match self.rows.lock() {
                Ok(mut current) => *current = rows,
                Err(poisoned) => *poisoned.into_inner() = rows,
            }
            Ok(())
        })
    }
}
