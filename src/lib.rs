//! Vitally: clinic administration core.
//!
//! Patients and their rolling billing cycles, physiotherapist weekly
//! availability, recurring class selections and the schedule entries
//! materialized from them. Storage is SQLite through `rusqlite`; every
//! operation is a synchronous call over a borrowed connection, one
//! transaction per call.

pub mod billing;
pub mod config;
pub mod db;
pub mod models;
pub mod scheduling;
