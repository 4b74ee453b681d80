//! Patient persistence: registry rows plus the billing columns
//! (`joined_on`, `last_payment_on`, `next_billing_on`) that the billing
//! module keeps in step.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Patient;

fn patient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        joined_on: row.get(4)?,
        last_payment_on: row.get(5)?,
        next_billing_on: row.get(6)?,
        active: row.get(7)?,
    })
}

/// Inserts a patient and returns the stored row.
pub fn insert_patient(
    conn: &Connection,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    joined_on: Option<NaiveDate>,
    next_billing_on: Option<NaiveDate>,
) -> Result<Patient, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, email, phone, joined_on, next_billing_on)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, email, phone, joined_on, next_billing_on],
    )?;
    get_patient(conn, conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    conn.query_row(
        "SELECT id, name, email, phone, joined_on, last_payment_on, next_billing_on, active
         FROM patients WHERE id = ?1",
        params![id],
        patient_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::not_found("Patient", id),
        other => other.into(),
    })
}

/// Lists patients ordered by name. With `only_active`, rows that were
/// deactivated are left out.
pub fn list_patients(conn: &Connection, only_active: bool) -> Result<Vec<Patient>, DatabaseError> {
    let sql = if only_active {
        "SELECT id, name, email, phone, joined_on, last_payment_on, next_billing_on, active
         FROM patients WHERE active = 1 ORDER BY name"
    } else {
        "SELECT id, name, email, phone, joined_on, last_payment_on, next_billing_on, active
         FROM patients ORDER BY name"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], patient_from_row)?;
    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

/// Updates the contact fields of a patient. Billing columns are only
/// ever touched through [`record_payment`].
pub fn update_contact(
    conn: &Connection,
    id: i64,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    joined_on: Option<NaiveDate>,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET name = ?2, email = ?3, phone = ?4, joined_on = ?5 WHERE id = ?1",
        params![id, name, email, phone, joined_on],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Patient", id));
    }
    Ok(())
}

pub fn set_patient_active(conn: &Connection, id: i64, active: bool) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET active = ?2 WHERE id = ?1",
        params![id, active],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Patient", id));
    }
    Ok(())
}

/// Stamps a payment: the paid date becomes the new cycle anchor and the
/// caller supplies the next billing date derived from it.
pub fn record_payment(
    conn: &Connection,
    id: i64,
    paid_on: NaiveDate,
    next_billing_on: NaiveDate,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET last_payment_on = ?2, next_billing_on = ?3 WHERE id = ?1",
        params![id, paid_on, next_billing_on],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Patient", id));
    }
    Ok(())
}

/// Active patients whose next billing date is known and falls on or
/// before `limit`, soonest first.
pub fn billings_due_by(conn: &Connection, limit: NaiveDate) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, joined_on, last_payment_on, next_billing_on, active
         FROM patients
         WHERE active = 1 AND next_billing_on IS NOT NULL AND next_billing_on <= ?1
         ORDER BY next_billing_on, name",
    )?;
    let rows = stmt.query_map(params![limit], patient_from_row)?;
    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

/// Active patients billed exactly on `date`.
pub fn billings_due_on(conn: &Connection, date: NaiveDate) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, joined_on, last_payment_on, next_billing_on, active
         FROM patients
         WHERE active = 1 AND next_billing_on = ?1
         ORDER BY name",
    )?;
    let rows = stmt.query_map(params![date], patient_from_row)?;
    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

/// Removes a patient. Class selections go with the row; schedule
/// entries survive with `patient_id` cleared.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Patient", id));
    }
    Ok(())
}
