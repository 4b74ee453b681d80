use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::EntryStatus;

/// One concrete, dated appointment slot.
///
/// Created exclusively by materialization; the only permitted mutation
/// afterwards is the transition to `Cancelled`. `patient_id` is nullable
/// because an entry outlives its patient record (set-null on delete),
/// while a physiotherapist removal deletes the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub physio_id: i64,
    pub patient_id: Option<i64>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: EntryStatus,
}
