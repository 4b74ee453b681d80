//! Weekly availability windows, keyed by physiotherapist and weekday
//! (0 = Monday .. 6 = Sunday).

use chrono::NaiveTime;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::AvailabilityWindow;

fn window_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AvailabilityWindow> {
    Ok(AvailabilityWindow {
        id: row.get(0)?,
        physio_id: row.get(1)?,
        weekday: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
    })
}

/// Replaces the full weekly availability of one physiotherapist.
/// Windows not present in `windows` are gone afterwards; run this
/// inside a transaction when the caller needs all-or-nothing.
pub fn replace_windows(
    conn: &Connection,
    physio_id: i64,
    windows: &[(u8, NaiveTime, NaiveTime)],
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM availability_windows WHERE physio_id = ?1",
        params![physio_id],
    )?;
    for (weekday, start, end) in windows {
        conn.execute(
            "INSERT INTO availability_windows (physio_id, weekday, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4)",
            params![physio_id, weekday, start, end],
        )?;
    }
    Ok(())
}

/// Windows of one physiotherapist on one weekday, earliest start first.
pub fn windows_for_weekday(
    conn: &Connection,
    physio_id: i64,
    weekday: u8,
) -> Result<Vec<AvailabilityWindow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, physio_id, weekday, start_time, end_time
         FROM availability_windows
         WHERE physio_id = ?1 AND weekday = ?2
         ORDER BY start_time",
    )?;
    let rows = stmt.query_map(params![physio_id, weekday], window_from_row)?;
    let mut windows = Vec::new();
    for row in rows {
        windows.push(row?);
    }
    Ok(windows)
}

/// The whole week of one physiotherapist, ordered by weekday then start.
pub fn list_windows(
    conn: &Connection,
    physio_id: i64,
) -> Result<Vec<AvailabilityWindow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, physio_id, weekday, start_time, end_time
         FROM availability_windows
         WHERE physio_id = ?1
         ORDER BY weekday, start_time",
    )?;
    let rows = stmt.query_map(params![physio_id], window_from_row)?;
    let mut windows = Vec::new();
    for row in rows {
        windows.push(row?);
    }
    Ok(windows)
}
