//! Closed catalog of activities a guest can be invited to.
//!
//! Shared by both directions: the read path resolves `invitedFor` tokens
//! through [`Activity::resolve`], the write path addresses mark columns by
//! [`Activity::ALL`] order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::MapError;

/// One of the event segments a guest may be invited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    CityHall,
    Ceremony,
    Diner,
    Party,
}

impl Activity {
    /// All activities in canonical (column) order.
    pub const ALL: [Activity; 4] = [
        Activity::CityHall,
        Activity::Ceremony,
        Activity::Diner,
        Activity::Party,
    ];

    /// Stable tag used on the wire and inside the `invitedFor` cell.
    pub fn as_str(self) -> &'static str {
        match self {
            Activity::CityHall => "city_hall",
            Activity::Ceremony => "ceremony",
            Activity::Diner => "diner",
            Activity::Party => "party",
        }
    }

    /// Position of this activity within [`Activity::ALL`].
    pub fn index(self) -> usize {
        match self {
            Activity::CityHall => 0,
            Activity::Ceremony => 1,
            Activity::Diner => 2,
            Activity::Party => 3,
        }
    }

    /// Resolve a normalized (lower-case, trimmed) token.
    pub fn resolve(token: &str) -> Result<Activity, MapError> {
        Activity::ALL
            .into_iter()
            .find(|activity| activity.as_str() == token)
            .ok_or_else(|| MapError::UnknownActivity(token.to_string()))
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activity::resolve(&s.trim().to_lowercase())
    }
}
