//! Physiotherapist registry.

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Physiotherapist;

fn physiotherapist_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Physiotherapist> {
    Ok(Physiotherapist {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        active: row.get(3)?,
    })
}

/// Inserts a physiotherapist and returns the stored row. The name is
/// trimmed; a blank email is stored as NULL so the UNIQUE index only
/// bites on real addresses.
pub fn insert_physiotherapist(
    conn: &Connection,
    name: &str,
    email: Option<&str>,
) -> Result<Physiotherapist, DatabaseError> {
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    conn.execute(
        "INSERT INTO physiotherapists (name, email) VALUES (?1, ?2)",
        params![name.trim(), email],
    )?;
    get_physiotherapist(conn, conn.last_insert_rowid())
}

pub fn get_physiotherapist(conn: &Connection, id: i64) -> Result<Physiotherapist, DatabaseError> {
    conn.query_row(
        "SELECT id, name, email, active FROM physiotherapists WHERE id = ?1",
        params![id],
        physiotherapist_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::not_found("Physiotherapist", id),
        other => other.into(),
    })
}

pub fn list_active_physiotherapists(
    conn: &Connection,
) -> Result<Vec<Physiotherapist>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, active FROM physiotherapists WHERE active = 1 ORDER BY name",
    )?;
    let rows = stmt.query_map([], physiotherapist_from_row)?;
    let mut physios = Vec::new();
    for row in rows {
        physios.push(row?);
    }
    Ok(physios)
}

pub fn set_physiotherapist_active(
    conn: &Connection,
    id: i64,
    active: bool,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE physiotherapists SET active = ?2 WHERE id = ?1",
        params![id, active],
    )?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Physiotherapist", id));
    }
    Ok(())
}

/// Removes a physiotherapist together with their availability windows
/// and schedule entries.
pub fn delete_physiotherapist(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM physiotherapists WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Physiotherapist", id));
    }
    Ok(())
}
