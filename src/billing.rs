//! Patient registry and billing cycles.
//!
//! Billing runs on rolling 30-day cycles. Registration anchors the
//! first cycle on the joining date; every payment re-anchors it on the
//! paid date. A patient with no joining date has no cycle until their
//! first payment.

use chrono::{Days, NaiveDate};
use rusqlite::Connection;

use crate::config::{BILLING_CYCLE_DAYS, BILLING_DUE_SOON_DAYS};
use crate::db::{repository, DatabaseError};
use crate::models::Patient;

/// Next billing date for a cycle anchored on `anchor`.
pub fn next_billing_date(anchor: NaiveDate) -> NaiveDate {
    anchor + Days::new(BILLING_CYCLE_DAYS)
}

/// Registers a patient. Contact fields are trimmed and blanks stored as
/// NULL; the first billing date is derived from the joining date when
/// one is given.
pub fn register_patient(
    conn: &Connection,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    joined_on: Option<NaiveDate>,
) -> Result<Patient, DatabaseError> {
    let email = normalized(email);
    let phone = normalized(phone);
    let next_billing_on = joined_on.map(next_billing_date);
    let patient = repository::insert_patient(
        conn,
        name.trim(),
        email.as_deref(),
        phone.as_deref(),
        joined_on,
        next_billing_on,
    )?;
    tracing::info!(patient_id = patient.id, "Registered patient");
    Ok(patient)
}

/// Updates a patient's contact fields with the same normalization as
/// [`register_patient`]. Billing columns are untouched.
pub fn update_contact(
    conn: &Connection,
    id: i64,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    joined_on: Option<NaiveDate>,
) -> Result<Patient, DatabaseError> {
    let email = normalized(email);
    let phone = normalized(phone);
    repository::update_contact(
        conn,
        id,
        name.trim(),
        email.as_deref(),
        phone.as_deref(),
        joined_on,
    )?;
    repository::get_patient(conn, id)
}

/// Records a payment: the paid date becomes the cycle anchor and the
/// next billing date moves one cycle past it.
pub fn register_payment(
    conn: &Connection,
    patient_id: i64,
    paid_on: NaiveDate,
) -> Result<Patient, DatabaseError> {
    let next = next_billing_date(paid_on);
    repository::record_payment(conn, patient_id, paid_on, next)?;
    tracing::info!(patient_id, %paid_on, next_billing_on = %next, "Recorded payment");
    repository::get_patient(conn, patient_id)
}

/// Active patients due within the reminder window: everyone whose next
/// billing date falls on or before `today` plus the window, overdue
/// patients included.
pub fn billings_due_soon(conn: &Connection, today: NaiveDate) -> Result<Vec<Patient>, DatabaseError> {
    repository::billings_due_by(conn, today + Days::new(BILLING_DUE_SOON_DAYS))
}

/// Active patients billed exactly on `date`.
pub fn billings_due_on(conn: &Connection, date: NaiveDate) -> Result<Vec<Patient>, DatabaseError> {
    repository::billings_due_on(conn, date)
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
