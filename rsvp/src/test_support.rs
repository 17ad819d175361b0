//! Test-only helpers for building sheet rows, guests and submissions.

use std::sync::Mutex;

use futures::future::BoxFuture;

use crate::core::types::{Answer, AttendanceUpdate, Guest, GuestRef, SheetRow};
use crate::io::store::{SheetStore, StoreError};

/// Header row using the default header names.
pub fn header_row() -> SheetRow {
    [
        "id",
        "firstName",
        "lastName",
        "householdId",
        "invitedFor",
        "plusOne",
        "CITY_HALL",
        "CEREMONY",
        "DINER",
        "PARTY",
        "remarks",
    ]
    .iter()
    .map(|cell| cell.to_string())
    .collect()
}

/// Create a deterministic data row. Marks are given in activity order.
pub fn sheet_row(id: i64, invited_for: &str, marks: [&str; 4]) -> SheetRow {
    let mut row = vec![
        id.to_string(),
        format!("First{}", id),
        format!("Last{}", id),
        (id / 2).to_string(),
        invited_for.to_string(),
        String::new(),
    ];
    row.extend(marks.iter().map(|mark| mark.to_string()));
    row.push(String::new());
    row
}

/// Create a submission. Answers are given in activity order as raw
/// submitted strings (`"COMING"` or anything else).
pub fn update(id: i64, answers: [&str; 4], remarks: &str) -> AttendanceUpdate {
    AttendanceUpdate {
        guest: GuestRef { id: Some(id) },
        city_hall: Answer::from_submission(answers[0]),
        ceremony: Answer::from_submission(answers[1]),
        diner: Answer::from_submission(answers[2]),
        party: Answer::from_submission(answers[3]),
        remarks: remarks.to_string(),
    }
}

/// Create a guest with deterministic defaults.
pub fn guest(id: Option<i64>) -> Guest {
    Guest {
        id,
        first_name: "First".to_string(),
        last_name: "Last".to_string(),
        household_id: None,
        invited_for: Vec::new(),
        already_replied: false,
        attending: Vec::new(),
    }
}

/// Store whose reads and/or writes always fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub rows: Vec<SheetRow>,
    pub fail_read: bool,
    pub fail_write: bool,
    pub writes: Mutex<u32>,
}

impl FailingStore {
    pub fn failing_reads() -> Self {
        Self {
            fail_read: true,
            ..Self::default()
        }
    }

    pub fn failing_writes(rows: Vec<SheetRow>) -> Self {
        Self {
            rows,
            fail_write: true,
            ..Self::default()
        }
    }
}

impl SheetStore for FailingStore {
    fn read(&self) -> BoxFuture<'_, Result<Vec<SheetRow>, StoreError>> {
        Box::pin(async move {
            if self.fail_read {
                return Err(StoreError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(self.rows.clone())
        })
    }

    fn write(&self, _rows: Vec<SheetRow>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            if let Ok(mut writes) = self.writes.lock() {
                *writes += 1;
            }
            if self.fail_write {
                return Err(StoreError::Status {
                    status: 403,
                    body: "forbidden".to_string(),
                });
            }
            Ok(())
        })
    }
}

/// Store whose calls never finish within a short deadline.
#[derive(Debug)]
pub struct SlowStore {
    pub delay: std::time::Duration,
}

impl SheetStore for SlowStore {
    fn read(&self) -> BoxFuture<'_, Result<Vec<SheetRow>, StoreError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(Vec::new())
        })
    }

    fn write(&self, _rows: Vec<SheetRow>) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(())
        })
    }
}
