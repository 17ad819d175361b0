//! Read path: sheet rows to guests.

use crate::core::activity::Activity;
use crate::core::error::MapError;
use crate::core::invariants::check_unique_ids;
use crate::core::schema::{Columns, SheetSchema, cell, parse_integer, parse_invited_for};
use crate::core::types::{Answer, Attendance, Guest, SheetRow};

/// Map rows (header first) to guests using the default header names.
pub fn map_rows(rows: &[SheetRow]) -> Result<Vec<Guest>, MapError> {
    map_rows_with(&SheetSchema::default(), rows)
}

/// Map rows (header first) to guests.
///
/// Fails as a whole on the first unknown activity, on a missing header, or
/// when two rows carry the same numeric id. An empty row set yields no guests.
pub fn map_rows_with(schema: &SheetSchema, rows: &[SheetRow]) -> Result<Vec<Guest>, MapError> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let columns = schema.resolve(header)?;

    let guests = body
        .iter()
        .map(|row| map_row(&columns, row))
        .collect::<Result<Vec<_>, _>>()?;
    check_unique_ids(&guests)?;
    Ok(guests)
}

fn map_row(columns: &Columns, row: &[String]) -> Result<Guest, MapError> {
    let invited_for = parse_invited_for(cell(row, columns.invited_for))?;

    let mut answers = [Answer::Unknown; 4];
    for activity in Activity::ALL {
        answers[activity.index()] = Answer::from_mark(cell(row, columns.mark(activity)));
    }
    let already_replied = answers.iter().any(|answer| answer.is_known());

    let attending = if already_replied {
        Activity::ALL
            .into_iter()
            .filter(|activity| invited_for.contains(activity))
            .map(|activity| Attendance {
                activity,
                is_coming: answers[activity.index()] == Answer::Yes,
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(Guest {
        id: parse_integer(cell(row, columns.id)),
        first_name: cell(row, columns.first_name).to_string(),
        last_name: cell(row, columns.last_name).to_string(),
        household_id: parse_integer(cell(row, columns.household_id)),
        invited_for,
        already_replied,
        attending,
    })
}
