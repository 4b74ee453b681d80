//! Schedule entries: dated, materialized class slots.
//!
//! The scheduling engine never updates an entry in place. It inserts
//! new rows, and rows leave the live set either by cancellation (status
//! flip) or by plan retraction (delete of still-scheduled future rows).

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{EntryStatus, ScheduleEntry};

type EntryRow = (
    i64,
    i64,
    Option<i64>,
    NaiveDate,
    NaiveTime,
    NaiveTime,
    String,
);

fn entry_from_parts(parts: EntryRow) -> Result<ScheduleEntry, DatabaseError> {
    let (id, physio_id, patient_id, date, start_time, end_time, status) = parts;
    Ok(ScheduleEntry {
        id,
        physio_id,
        patient_id,
        date,
        start_time,
        end_time,
        status: EntryStatus::from_str(&status)?,
    })
}

fn entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

/// Inserts a scheduled entry and returns its id. The partial unique
/// index on `(physio_id, date, start_time)` rejects a second live entry
/// for the same slot; callers treat that rejection as the slot being
/// taken.
pub fn insert_entry(
    conn: &Connection,
    physio_id: i64,
    patient_id: Option<i64>,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO schedule_entries (physio_id, patient_id, date, start_time, end_time, status)
         VALUES (?1, ?2, ?3, ?4, ?5, 'scheduled')",
        params![physio_id, patient_id, date, start_time, end_time],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_entry(conn: &Connection, id: i64) -> Result<ScheduleEntry, DatabaseError> {
    let parts = conn
        .query_row(
            "SELECT id, physio_id, patient_id, date, start_time, end_time, status
             FROM schedule_entries WHERE id = ?1",
            params![id],
            entry_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::not_found("ScheduleEntry", id),
            other => DatabaseError::from(other),
        })?;
    entry_from_parts(parts)
}

/// Live (non-cancelled) entries of one physiotherapist on one date,
/// earliest start first. This is the set conflict checks run against.
pub fn live_entries_for_day(
    conn: &Connection,
    physio_id: i64,
    date: NaiveDate,
) -> Result<Vec<ScheduleEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, physio_id, patient_id, date, start_time, end_time, status
         FROM schedule_entries
         WHERE physio_id = ?1 AND date = ?2 AND status <> 'cancelled'
         ORDER BY start_time",
    )?;
    let rows = stmt.query_map(params![physio_id, date], entry_row)?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(entry_from_parts(row?)?);
    }
    Ok(entries)
}

/// All entries of one physiotherapist between `from` and `to`
/// inclusive, cancelled ones included, ordered by date then start.
pub fn list_range(
    conn: &Connection,
    physio_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ScheduleEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, physio_id, patient_id, date, start_time, end_time, status
         FROM schedule_entries
         WHERE physio_id = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date, start_time",
    )?;
    let rows = stmt.query_map(params![physio_id, from, to], entry_row)?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(entry_from_parts(row?)?);
    }
    Ok(entries)
}

/// Flips an entry to cancelled. The row stays for the record; the slot
/// becomes free for future materialization.
pub fn cancel_entry(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE schedule_entries SET status = 'cancelled' WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("ScheduleEntry", id));
    }
    Ok(())
}

/// Deletes a patient's still-scheduled entries dated on or after
/// `from`. Cancelled entries stay untouched, as does anything already
/// in the past. Returns how many rows went.
pub fn retract_scheduled_from(
    conn: &Connection,
    patient_id: i64,
    from: NaiveDate,
) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM schedule_entries
         WHERE patient_id = ?1 AND status = 'scheduled' AND date >= ?2",
        params![patient_id, from],
    )?;
    Ok(deleted)
}
