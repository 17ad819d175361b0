//! Write path: merge submitted answers into the current row set.
//!
//! Only rows whose id matches an update are rebuilt. Every other row,
//! including the header and rows with malformed ids, is passed through as is.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::activity::Activity;
use crate::core::error::MapError;
use crate::core::schema::{
    ID_COLUMN, INVITED_FOR_COLUMN, PRESERVED_COLUMNS, ROW_WIDTH, SheetSchema, cell,
    mark_column, parse_integer, parse_invited_for,
};
use crate::core::types::{Answer, AttendanceUpdate, SheetRow};

/// How marks are written for activities a guest was not invited to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkPolicy {
    /// Write a mark for every activity, invited or not.
    #[default]
    Unconditional,
    /// Leave the mark cell empty for activities missing from the row's
    /// `invitedFor` cell. Rows whose invited cell does not parse fall back
    /// to `Unconditional`.
    InvitedOnly,
}

/// Result of a merge: the full row set plus which update ids hit a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub rows: Vec<SheetRow>,
    /// Update ids that rewrote at least one row, in submission order.
    pub updated: Vec<i64>,
    /// Update ids with no matching row, in submission order.
    pub unmatched: Vec<i64>,
    /// Updates whose guest id was missing or not an integer.
    pub without_id: usize,
}

/// Merge `updates` into `current`.
///
/// The output has the same length and order as `current`. When several
/// updates share an id the first one wins.
pub fn merge_rows(
    current: &[SheetRow],
    updates: &[AttendanceUpdate],
    policy: MarkPolicy,
) -> MergeOutcome {
    let mut by_id: HashMap<i64, &AttendanceUpdate> = HashMap::with_capacity(updates.len());
    let mut without_id = 0;
    for update in updates {
        match update.guest.id {
            Some(id) => {
                by_id.entry(id).or_insert(update);
            }
            None => without_id += 1,
        }
    }

    let mut hit = HashSet::new();
    let rows: Vec<SheetRow> = current
        .iter()
        .map(|row| {
            let matched = parse_integer(cell(row, ID_COLUMN))
                .and_then(|id| by_id.get(&id).map(|update| (id, *update)));
            match matched {
                Some((id, update)) => {
                    hit.insert(id);
                    rewrite_row(row, update, policy)
                }
                None => row.clone(),
            }
        })
        .collect();

    let mut seen = HashSet::with_capacity(by_id.len());
    let (updated, unmatched): (Vec<i64>, Vec<i64>) = updates
        .iter()
        .filter_map(|update| update.guest.id)
        .filter(|id| seen.insert(*id))
        .partition(|id| hit.contains(id));

    MergeOutcome {
        rows,
        updated,
        unmatched,
        without_id,
    }
}

/// Merge `updates` into a sheet whose first row is the header.
///
/// The header is resolved with `schema` and must agree with the positional
/// write layout; otherwise the merge is refused instead of silently missing
/// every row. An empty sheet has nothing to merge into.
pub fn merge_sheet(
    schema: &SheetSchema,
    current: &[SheetRow],
    updates: &[AttendanceUpdate],
    policy: MarkPolicy,
) -> Result<MergeOutcome, MapError> {
    if let Some(header) = current.first() {
        let columns = schema.resolve(header)?;
        schema.check_write_layout(&columns)?;
    }
    Ok(merge_rows(current, updates, policy))
}

fn rewrite_row(row: &[String], update: &AttendanceUpdate, policy: MarkPolicy) -> SheetRow {
    let invited = match policy {
        MarkPolicy::Unconditional => None,
        MarkPolicy::InvitedOnly => parse_invited_for(cell(row, INVITED_FOR_COLUMN)).ok(),
    };

    let mut out: SheetRow = (0..PRESERVED_COLUMNS)
        .map(|idx| cell(row, idx).to_string())
        .collect();
    out.reserve(ROW_WIDTH - PRESERVED_COLUMNS);

    for activity in Activity::ALL {
        debug_assert_eq!(mark_column(activity), out.len());
        let answer = match &invited {
            Some(invited) if !invited.contains(&activity) => Answer::Unknown,
            _ => update.answer(activity),
        };
        out.push(answer.to_mark().to_string());
    }
    out.push(update.remarks.clone());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CHECK_MARK, CROSS_MARK};
    use crate::test_support::{header_row, sheet_row, update};

    #[test]
    fn rewrites_marks_and_remarks_of_matched_row() {
        let current = vec![header_row(), sheet_row(7, "city_hall,party", ["", "", "", ""])];
        let outcome = merge_rows(
            &current,
            &[update(7, ["COMING", "NO", "NO", "NO"], "vegetarian")],
            MarkPolicy::Unconditional,
        );

        let row = &outcome.rows[1];
        assert_eq!(row.len(), ROW_WIDTH);
        assert_eq!(&row[..PRESERVED_COLUMNS], &current[1][..PRESERVED_COLUMNS]);
        assert_eq!(&row[6..10], &[CHECK_MARK, CROSS_MARK, CROSS_MARK, CROSS_MARK]);
        assert_eq!(row[10], "vegetarian");
        assert_eq!(outcome.updated, vec![7]);
        assert!(outcome.unmatched.is_empty());
    }

    #[test]
    fn header_and_other_rows_pass_through() {
        let current = vec![
            header_row(),
            sheet_row(1, "party", ["✓", "", "", ""]),
            vec!["garbage".to_string()],
            sheet_row(2, "party", ["", "", "", ""]),
        ];
        let outcome = merge_rows(
            &current,
            &[update(2, ["NO", "NO", "NO", "COMING"], "")],
            MarkPolicy::Unconditional,
        );
        assert_eq!(outcome.rows.len(), current.len());
        assert_eq!(outcome.rows[0], current[0]);
        assert_eq!(outcome.rows[1], current[1]);
        assert_eq!(outcome.rows[2], current[2]);
        assert_ne!(outcome.rows[3], current[3]);
    }

    #[test]
    fn unknown_update_ids_are_reported_not_applied() {
        let current = vec![header_row(), sheet_row(1, "party", ["", "", "", ""])];
        let outcome = merge_rows(
            &current,
            &[update(99, ["COMING", "COMING", "COMING", "COMING"], "")],
            MarkPolicy::Unconditional,
        );
        assert_eq!(outcome.rows, current);
        assert!(outcome.updated.is_empty());
        assert_eq!(outcome.unmatched, vec![99]);
    }

    #[test]
    fn first_update_for_an_id_wins() {
        let current = vec![header_row(), sheet_row(1, "party", ["", "", "", ""])];
        let outcome = merge_rows(
            &current,
            &[
                update(1, ["NO", "NO", "NO", "COMING"], "first"),
                update(1, ["NO", "NO", "NO", "NO"], "second"),
            ],
            MarkPolicy::Unconditional,
        );
        assert_eq!(outcome.rows[1][9], CHECK_MARK);
        assert_eq!(outcome.rows[1][10], "first");
        assert_eq!(outcome.updated, vec![1]);
    }

    #[test]
    fn short_row_is_padded_before_rewrite() {
        let current = vec![header_row(), vec!["3".to_string(), "Ann".to_string()]];
        let outcome = merge_rows(
            &current,
            &[update(3, ["COMING", "NO", "NO", "NO"], "hi")],
            MarkPolicy::Unconditional,
        );
        let row = &outcome.rows[1];
        assert_eq!(row.len(), ROW_WIDTH);
        assert_eq!(row[0], "3");
        assert_eq!(row[1], "Ann");
        assert_eq!(row[2], "");
        assert_eq!(row[6], CHECK_MARK);
    }

    #[test]
    fn uninvited_activities_still_get_marks_by_default() {
        let current = vec![header_row(), sheet_row(4, "party", ["", "", "", ""])];
        let outcome = merge_rows(
            &current,
            &[update(4, ["COMING", "NO", "NO", "COMING"], "")],
            MarkPolicy::Unconditional,
        );
        assert_eq!(&outcome.rows[1][6..10], &[CHECK_MARK, CROSS_MARK, CROSS_MARK, CHECK_MARK]);
    }

    #[test]
    fn invited_only_policy_blanks_uninvited_marks() {
        let current = vec![header_row(), sheet_row(4, "party,diner", ["", "", "", ""])];
        let outcome = merge_rows(
            &current,
            &[update(4, ["COMING", "NO", "NO", "COMING"], "")],
            MarkPolicy::InvitedOnly,
        );
        assert_eq!(&outcome.rows[1][6..10], &["", "", CROSS_MARK, CHECK_MARK]);
    }

    #[test]
    fn updates_without_id_are_skipped_and_counted() {
        let current = vec![header_row(), sheet_row(7, "party", ["", "", "", ""])];
        let mut orphan = update(0, ["COMING", "COMING", "COMING", "COMING"], "lost");
        orphan.guest.id = None;
        let outcome = merge_rows(
            &current,
            &[orphan, update(7, ["NO", "NO", "NO", "COMING"], "kept")],
            MarkPolicy::Unconditional,
        );
        assert_eq!(outcome.rows[1][10], "kept");
        assert_eq!(outcome.updated, vec![7]);
        assert!(outcome.unmatched.is_empty());
        assert_eq!(outcome.without_id, 1);
    }

    #[test]
    fn merge_sheet_refuses_reordered_layout() {
        let mut header = header_row();
        header.swap(0, 2);
        let current = vec![header, sheet_row(7, "party", ["", "", "", ""])];
        let err = merge_sheet(
            &SheetSchema::default(),
            &current,
            &[update(7, ["NO", "NO", "NO", "COMING"], "")],
            MarkPolicy::Unconditional,
        )
        .expect_err("layout mismatch");
        assert_eq!(
            err,
            MapError::LayoutMismatch {
                header: "id".to_string(),
                expected: ID_COLUMN,
                found: 2,
            }
        );
    }

    #[test]
    fn merge_sheet_reports_missing_header() {
        let mut header = header_row();
        header[9] = "FEEST".to_string();
        let err = merge_sheet(&SheetSchema::default(), &[header], &[], MarkPolicy::Unconditional)
            .expect_err("missing header");
        assert_eq!(err, MapError::MissingHeader("PARTY".to_string()));
    }

    #[test]
    fn merge_sheet_accepts_default_layout_and_empty_sheet() {
        let current = vec![header_row(), sheet_row(7, "party", ["", "", "", ""])];
        let updates = [update(7, ["NO", "NO", "NO", "COMING"], "")];
        let schema = SheetSchema::default();
        let outcome = merge_sheet(&schema, &current, &updates, MarkPolicy::Unconditional)
            .expect("merge");
        assert_eq!(outcome.updated, vec![7]);

        let empty =
            merge_sheet(&schema, &[], &updates, MarkPolicy::Unconditional).expect("merge");
        assert!(empty.rows.is_empty());
        assert_eq!(empty.unmatched, vec![7]);
    }

    #[test]
    fn merge_is_idempotent() {
        let current = vec![
            header_row(),
            sheet_row(1, "party", ["", "", "", ""]),
            sheet_row(2, "diner", ["✓", "", "", ""]),
        ];
        let updates = [update(2, ["NO", "NO", "COMING", "NO"], "late")];
        let once = merge_rows(&current, &updates, MarkPolicy::Unconditional);
        let twice = merge_rows(&once.rows, &updates, MarkPolicy::Unconditional);
        assert_eq!(once.rows, twice.rows);
    }
}
