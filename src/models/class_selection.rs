use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A patient's recurring weekly class preference: a weekday plus a time
/// of day, independent of any calendar date. Duration is not stored; it
/// is supplied by the caller at materialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSelection {
    pub id: i64,
    pub patient_id: i64,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: u8,
    pub start_time: NaiveTime,
}
