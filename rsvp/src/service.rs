//! Request-scoped orchestration of the store and the pure core.
//!
//! `fetch` reads and maps; `submit` reads, merges and writes back. Submits
//! are serialized by a process-local lock held across the whole
//! read-merge-write, so two submissions handled by the same process cannot
//! overwrite each other's rows.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::error::MapError;
use crate::core::merge_writer::{MarkPolicy, merge_sheet};
use crate::core::row_mapper::map_rows_with;
use crate::core::schema::SheetSchema;
use crate::core::types::{AttendanceUpdate, Guest, SheetRow};
use crate::io::config::RsvpConfig;
use crate::io::store::{SheetStore, StoreError};
use crate::messages;

/// Failure of a fetch or submit. Every variant is terminal for the request.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("read sheet: {0}")]
    Read(#[source] StoreError),

    #[error("map sheet: {0}")]
    Map(#[from] MapError),

    #[error("write sheet: {0}")]
    Write(#[source] StoreError),
}

impl ServiceError {
    /// Message shown to the caller.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Read(_) | Self::Map(_) => messages::READ_ERROR,
            Self::Write(_) => messages::WRITE_ERROR,
        }
    }
}

/// What a successful submit changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Guest ids whose row was rewritten.
    pub updated: Vec<i64>,
    /// Guest ids with no row in the sheet; their answers were dropped.
    pub unmatched: Vec<i64>,
    /// Updates dropped because their guest id was missing or not an integer.
    pub without_id: usize,
    /// Whether the row set was written back.
    pub written: bool,
}

pub struct RsvpService {
    store: Arc<dyn SheetStore>,
    schema: SheetSchema,
    policy: MarkPolicy,
    store_timeout: Duration,
    write_lock: Mutex<()>,
}

impl RsvpService {
    pub fn new(store: Arc<dyn SheetStore>, config: &RsvpConfig) -> Self {
        Self {
            store,
            schema: config.headers.clone(),
            policy: config.mark_policy,
            store_timeout: config.store_timeout(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the sheet and map it to guests.
    pub async fn fetch(&self) -> Result<Vec<Guest>, ServiceError> {
        let rows = self.read_rows().await?;
        let guests = map_rows_with(&self.schema, &rows).inspect_err(|err| {
            warn!(error = %err, "{}", messages::READ_ERROR);
        })?;
        info!(guests = guests.len(), "mapped guests");
        Ok(guests)
    }

    /// Merge `updates` into a fresh read of the sheet and write it back.
    ///
    /// Updates for unknown or unusable guest ids are reported in the result
    /// but do not fail the submission. When no row changes, nothing is
    /// written. A header the positional row rewrite cannot handle fails the
    /// submission before anything is written.
    pub async fn submit(&self, updates: &[AttendanceUpdate]) -> Result<SubmitReport, ServiceError> {
        let _guard = self.write_lock.lock().await;

        let rows = self.read_rows().await?;
        let outcome = merge_sheet(&self.schema, &rows, updates, self.policy).inspect_err(|err| {
            warn!(error = %err, "sheet layout does not allow a merge");
        })?;
        if !outcome.unmatched.is_empty() {
            warn!(guest_ids = ?outcome.unmatched, "submission references unknown guests");
        }
        if outcome.without_id > 0 {
            warn!(count = outcome.without_id, "submission contains updates without a guest id");
        }

        if outcome.updated.is_empty() {
            info!("submission matched no rows; skipping write");
            return Ok(SubmitReport {
                updated: outcome.updated,
                unmatched: outcome.unmatched,
                without_id: outcome.without_id,
                written: false,
            });
        }

        with_deadline(self.store_timeout, self.store.write(outcome.rows))
            .await
            .map_err(|err| {
                warn!(error = %err, "{}", messages::WRITE_ERROR);
                ServiceError::Write(err)
            })?;
        info!(guest_ids = ?outcome.updated, "{}", messages::WRITE_SUCCESS);

        Ok(SubmitReport {
            updated: outcome.updated,
            unmatched: outcome.unmatched,
            without_id: outcome.without_id,
            written: true,
        })
    }

    async fn read_rows(&self) -> Result<Vec<SheetRow>, ServiceError> {
        let rows = with_deadline(self.store_timeout, self.store.read())
            .await
            .map_err(|err| {
                warn!(error = %err, "{}", messages::READ_ERROR);
                ServiceError::Read(err)
            })?;
        info!(rows = rows.len(), "{}", messages::READ_SUCCESS);
        Ok(rows)
    }
}

async fn with_deadline<T>(
    deadline: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}
