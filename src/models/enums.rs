use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Lifecycle state of a schedule entry.
///
/// Entries are created `Scheduled` by materialization and only ever
/// transition to `Cancelled`; they are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    Scheduled,
    Cancelled,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DatabaseError::InvalidEnum {
                field: "EntryStatus".into(),
                value: s.into(),
            }),
        }
    }
}
