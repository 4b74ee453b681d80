use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A clinic patient.
///
/// Billing runs on a rolling 30-day cycle: `next_billing_on` is anchored
/// on the joining date until the first payment is recorded, then on the
/// most recent payment (see `billing`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub last_payment_on: Option<NaiveDate>,
    pub next_billing_on: Option<NaiveDate>,
    pub active: bool,
}
