//! Domain types exchanged with callers and the raw row type of the sheet.
//!
//! Glyphs and the `"COMING"` sentinel only exist at the boundaries
//! ([`Answer::from_mark`], [`Answer::to_mark`] and the `AttendanceUpdate`
//! deserializer). Inside the crate an answer is always an [`Answer`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::activity::Activity;
use crate::core::schema::parse_integer;

/// Raw positional record as stored in the sheet.
pub type SheetRow = Vec<String>;

/// Mark written for an affirmative answer.
pub const CHECK_MARK: &str = "✓";
/// Mark written for a negative answer.
pub const CROSS_MARK: &str = "✗";
/// Submission value meaning "attending".
pub const COMING: &str = "COMING";

/// Tri-state reply for one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Unknown,
}

impl Answer {
    /// Read a mark cell. Any non-empty mark other than the check mark is a
    /// negative answer.
    pub fn from_mark(cell: &str) -> Answer {
        if cell.is_empty() {
            Answer::Unknown
        } else if cell == CHECK_MARK {
            Answer::Yes
        } else {
            Answer::No
        }
    }

    /// Read a submitted activity field.
    pub fn from_submission(value: &str) -> Answer {
        if value == COMING {
            Answer::Yes
        } else {
            Answer::No
        }
    }

    pub fn to_mark(self) -> &'static str {
        match self {
            Answer::Yes => CHECK_MARK,
            Answer::No => CROSS_MARK,
            Answer::Unknown => "",
        }
    }

    pub fn is_known(self) -> bool {
        self != Answer::Unknown
    }
}

/// One attendance entry of a guest that already replied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub activity: Activity,
    pub is_coming: bool,
}

/// A guest as returned by `GET /fetch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    /// Stable key correlating reads and writes. `None` when the id cell is
    /// not an integer; such guests can never be targeted by a submission.
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub household_id: Option<i64>,
    pub invited_for: Vec<Activity>,
    pub already_replied: bool,
    pub attending: Vec<Attendance>,
}

/// Guest reference inside a submission; other fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GuestRef {
    /// `None` when the posted id is missing or not an integer, for instance
    /// a guest whose id cell was blank on fetch. Such an update matches no
    /// row.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
}

/// One guest's answers as posted to `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceUpdate {
    pub guest: GuestRef,
    #[serde(default = "not_coming", deserialize_with = "submission_answer")]
    pub city_hall: Answer,
    #[serde(default = "not_coming", deserialize_with = "submission_answer")]
    pub ceremony: Answer,
    #[serde(default = "not_coming", deserialize_with = "submission_answer")]
    pub diner: Answer,
    #[serde(default = "not_coming", deserialize_with = "submission_answer")]
    pub party: Answer,
    #[serde(default)]
    pub remarks: String,
}

impl AttendanceUpdate {
    pub fn answer(&self, activity: Activity) -> Answer {
        match activity {
            Activity::CityHall => self.city_hall,
            Activity::Ceremony => self.ceremony,
            Activity::Diner => self.diner,
            Activity::Party => self.party,
        }
    }
}

fn not_coming() -> Answer {
    Answer::No
}

fn submission_answer<'de, D>(deserializer: D) -> Result<Answer, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map_or(Answer::No, Answer::from_submission))
}

/// Integers, integral floats and numeric strings; anything else is `None`.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(|float| parse_integer(&float.to_string()))),
        Value::String(text) => parse_integer(&text),
        _ => None,
    })
}
