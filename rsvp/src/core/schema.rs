//! Header contract and positional layout of the guest sheet.
//!
//! The read path locates columns by header name through [`SheetSchema`];
//! the write path is positional and uses the layout constants below.

use serde::{Deserialize, Serialize};

use crate::core::activity::Activity;
use crate::core::error::MapError;

/// Number of cells in a fully written row.
pub const ROW_WIDTH: usize = 11;
/// Leading cells copied verbatim when a row is rewritten.
pub const PRESERVED_COLUMNS: usize = 6;
/// Position of the free-text remarks cell.
pub const REMARKS_COLUMN: usize = 10;
/// Position of the id cell.
pub const ID_COLUMN: usize = 0;
/// Position of the invited activities cell.
pub const INVITED_FOR_COLUMN: usize = 4;

/// Position of the mark cell for `activity`.
pub fn mark_column(activity: Activity) -> usize {
    PRESERVED_COLUMNS + activity.index()
}

/// Header names the mapper expects to find in the first row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSchema {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub household_id: String,
    pub invited_for: String,
    pub city_hall: String,
    pub ceremony: String,
    pub diner: String,
    pub party: String,
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            first_name: "firstName".to_string(),
            last_name: "lastName".to_string(),
            household_id: "householdId".to_string(),
            invited_for: "invitedFor".to_string(),
            city_hall: "CITY_HALL".to_string(),
            ceremony: "CEREMONY".to_string(),
            diner: "DINER".to_string(),
            party: "PARTY".to_string(),
        }
    }
}

impl SheetSchema {
    fn mark_header(&self, activity: Activity) -> &str {
        match activity {
            Activity::CityHall => &self.city_hall,
            Activity::Ceremony => &self.ceremony,
            Activity::Diner => &self.diner,
            Activity::Party => &self.party,
        }
    }

    /// Resolve every expected header against `header`.
    ///
    /// Header cells are trimmed before comparison. The first expected name
    /// that is absent is reported.
    pub fn resolve(&self, header: &[String]) -> Result<Columns, MapError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| cell.trim() == name)
                .ok_or_else(|| MapError::MissingHeader(name.to_string()))
        };

        let mut marks = [0; 4];
        for activity in Activity::ALL {
            marks[activity.index()] = find(self.mark_header(activity))?;
        }

        Ok(Columns {
            id: find(&self.id)?,
            first_name: find(&self.first_name)?,
            last_name: find(&self.last_name)?,
            household_id: find(&self.household_id)?,
            invited_for: find(&self.invited_for)?,
            marks,
        })
    }

    /// Check that the columns a row rewrite relies on sit where the
    /// positional write layout puts them: the id, the invited activities and
    /// the four marks. The other preserved cells are copied verbatim and may
    /// be in any order.
    pub fn check_write_layout(&self, columns: &Columns) -> Result<(), MapError> {
        let mut positions = vec![
            (self.id.as_str(), columns.id, ID_COLUMN),
            (self.invited_for.as_str(), columns.invited_for, INVITED_FOR_COLUMN),
        ];
        for activity in Activity::ALL {
            positions.push((
                self.mark_header(activity),
                columns.mark(activity),
                mark_column(activity),
            ));
        }

        match positions.into_iter().find(|(_, found, expected)| found != expected) {
            Some((header, found, expected)) => Err(MapError::LayoutMismatch {
                header: header.to_string(),
                expected,
                found,
            }),
            None => Ok(()),
        }
    }
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub id: usize,
    pub first_name: usize,
    pub last_name: usize,
    pub household_id: usize,
    pub invited_for: usize,
    pub marks: [usize; 4],
}

impl Columns {
    pub fn mark(&self, activity: Activity) -> usize {
        self.marks[activity.index()]
    }
}

/// Cell at `idx`, or `""` past the end of a short row.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Parse an integer cell.
///
/// Accepts plain integers and integral decimals (`"7.0"`), which is how a
/// store may render a number after a user-entered write.
pub fn parse_integer(cell: &str) -> Option<i64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Parse an `invitedFor` cell: whitespace is dropped, tokens are split on
/// commas and lower-cased. Empty tokens are skipped.
pub fn parse_invited_for(cell: &str) -> Result<Vec<Activity>, MapError> {
    let compact: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|token| !token.is_empty())
        .map(|token| Activity::resolve(&token.to_lowercase()))
        .collect()
}
