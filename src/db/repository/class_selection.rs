//! Recurring class selections: the `(weekday, start time)` pairs a
//! patient attends every week.

use chrono::NaiveTime;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::ClassSelection;

fn selection_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClassSelection> {
    Ok(ClassSelection {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        weekday: row.get(2)?,
        start_time: row.get(3)?,
    })
}

/// Replaces the full set of selections of one patient. Run inside a
/// transaction when the caller needs all-or-nothing.
pub fn replace_selections(
    conn: &Connection,
    patient_id: i64,
    selections: &[(u8, NaiveTime)],
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM class_selections WHERE patient_id = ?1",
        params![patient_id],
    )?;
    for (weekday, start) in selections {
        conn.execute(
            "INSERT INTO class_selections (patient_id, weekday, start_time)
             VALUES (?1, ?2, ?3)",
            params![patient_id, weekday, start],
        )?;
    }
    Ok(())
}

/// Selections of one patient, ordered by weekday then start.
pub fn selections_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<ClassSelection>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, weekday, start_time
         FROM class_selections
         WHERE patient_id = ?1
         ORDER BY weekday, start_time",
    )?;
    let rows = stmt.query_map(params![patient_id], selection_from_row)?;
    let mut selections = Vec::new();
    for row in rows {
        selections.push(row?);
    }
    Ok(selections)
}
