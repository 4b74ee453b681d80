use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A recurring weekly time range during which a physiotherapist accepts
/// appointments. Invariant: `start_time < end_time`. Windows of the same
/// weekday may overlap; no dedup is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: i64,
    pub physio_id: i64,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    /// Whether the window fully contains the `[start, end]` slot.
    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time <= start && self.end_time >= end
    }
}
