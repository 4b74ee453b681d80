//! Class scheduling engine.
//!
//! Expands a patient's recurring `(weekday, "HH:MM")` class selections
//! into dated schedule entries over a whole-week horizon, against one
//! physiotherapist's weekly availability. Every candidate date gets a
//! recorded decision: an entry is created only when some availability
//! window contains the slot and no live entry of that physiotherapist
//! overlaps it. Dates that fail either check are skipped, the rest of
//! the horizon still materializes.
//!
//! The engine is additive. Entries never move or shrink; a plan change
//! goes through [`apply_class_plan`], which swaps the stored selections,
//! retracts the patient's still-scheduled future entries and
//! materializes the new plan in one transaction.
//!
//! Conflict checks read the live table as they go, so earlier tuples of
//! the same call block later ones. A partial unique index on
//! `(physio_id, date, start_time)` backs the check at the schema level;
//! its violation is reported as the slot being taken, not as an error.

use chrono::{Datelike, Days, Duration, Local, NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DEFAULT_CLASS_DURATION_MIN, MAX_CLASS_DURATION_MIN, MAX_HORIZON_WEEKS};
use crate::db::{repository, DatabaseError};
use crate::models::AvailabilityWindow;

#[derive(Error, Debug)]
pub enum SchedulingError {
    /// A time string did not parse as 24-hour `HH:MM`. Carries the
    /// offending tuple; nothing is written when any tuple fails.
    #[error("invalid time {value:?} for weekday {weekday}: expected HH:MM")]
    InvalidTime { weekday: u8, value: String },

    #[error("weekday {0} out of range (0 = Monday .. 6 = Sunday)")]
    InvalidWeekday(u8),

    #[error("class duration must be positive and fit within one day, got {0} minutes")]
    InvalidDuration(i64),

    #[error("horizon must cover between one week and five years, got {0} weeks")]
    InvalidHorizon(u32),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// One materialization job: a patient, a physiotherapist and the weekly
/// plan to expand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializeRequest {
    pub patient_id: i64,
    pub physio_id: i64,
    /// `(weekday, "HH:MM")` tuples, weekday 0 = Monday .. 6 = Sunday.
    pub selections: Vec<(u8, String)>,
    pub duration_minutes: i64,
    /// Horizon length in whole weeks from the start date.
    pub weeks: u32,
    /// First date considered. Today when `None`.
    pub start_date: Option<NaiveDate>,
}

impl MaterializeRequest {
    pub fn new(patient_id: i64, physio_id: i64, selections: Vec<(u8, String)>, weeks: u32) -> Self {
        Self {
            patient_id,
            physio_id,
            selections,
            duration_minutes: DEFAULT_CLASS_DURATION_MIN,
            weeks,
            start_date: None,
        }
    }
}

/// What happened to one candidate date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotOutcome {
    Created { entry_id: i64 },
    /// No availability window of that weekday contains the slot.
    SkippedNoAvailability,
    /// A live entry overlaps the slot, or the slot guard index rejected
    /// the insert.
    SkippedConflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDecision {
    pub weekday: u8,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub outcome: SlotOutcome,
}

/// Full account of one materialization call, in candidate order: tuples
/// as given, dates ascending within each tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializeReport {
    pub decisions: Vec<SlotDecision>,
}

impl MaterializeReport {
    pub fn created(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d.outcome, SlotOutcome::Created { .. }))
            .count()
    }

    pub fn skipped_no_availability(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.outcome == SlotOutcome::SkippedNoAvailability)
            .count()
    }

    pub fn skipped_conflict(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.outcome == SlotOutcome::SkippedConflict)
            .count()
    }

    pub fn created_entry_ids(&self) -> Vec<i64> {
        self.decisions
            .iter()
            .filter_map(|d| match d.outcome {
                SlotOutcome::Created { entry_id } => Some(entry_id),
                _ => None,
            })
            .collect()
    }
}

/// Materializes a class plan without touching the stored selections.
/// One transaction; either the whole horizon is decided and committed
/// or nothing is written.
pub fn materialize_classes(
    conn: &Connection,
    req: &MaterializeRequest,
) -> Result<MaterializeReport, SchedulingError> {
    let selections = parse_selections(&req.selections)?;
    validate_shape(req)?;
    let start_date = req.start_date.unwrap_or_else(|| Local::now().date_naive());

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    ensure_parties(&tx, req)?;
    let report = materialize_within(&tx, req, start_date, &selections)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        patient_id = req.patient_id,
        physio_id = req.physio_id,
        created = report.created(),
        skipped_no_availability = report.skipped_no_availability(),
        skipped_conflict = report.skipped_conflict(),
        "Materialized class plan"
    );
    Ok(report)
}

/// Swaps a patient's stored selections for `req.selections`, retracts
/// their still-scheduled entries dated on or after the start date and
/// materializes the new plan, all in one transaction. Cancelled entries
/// and anything before the start date stay put.
pub fn apply_class_plan(
    conn: &Connection,
    req: &MaterializeRequest,
) -> Result<MaterializeReport, SchedulingError> {
    let selections = parse_selections(&req.selections)?;
    validate_shape(req)?;
    let start_date = req.start_date.unwrap_or_else(|| Local::now().date_naive());

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    ensure_parties(&tx, req)?;
    let stored: Vec<(u8, NaiveTime)> = selections.iter().map(|s| (s.weekday, s.start)).collect();
    repository::replace_selections(&tx, req.patient_id, &stored)?;
    let retracted = repository::retract_scheduled_from(&tx, req.patient_id, start_date)?;
    let report = materialize_within(&tx, req, start_date, &selections)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        patient_id = req.patient_id,
        physio_id = req.physio_id,
        retracted,
        created = report.created(),
        "Applied class plan"
    );
    Ok(report)
}

/// Replaces the full weekly availability of one physiotherapist with
/// `(weekday, "HH:MM", "HH:MM")` windows. Existing schedule entries are
/// not revisited; narrowing availability only affects future
/// materialization.
pub fn replace_availability(
    conn: &Connection,
    physio_id: i64,
    windows: &[(u8, String, String)],
) -> Result<(), SchedulingError> {
    let mut parsed = Vec::with_capacity(windows.len());
    for (weekday, start, end) in windows {
        check_weekday(*weekday)?;
        parsed.push((
            *weekday,
            parse_clock(*weekday, start)?,
            parse_clock(*weekday, end)?,
        ));
    }
    repository::get_physiotherapist(conn, physio_id)?;

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    repository::replace_windows(&tx, physio_id, &parsed)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(physio_id, windows = parsed.len(), "Replaced availability windows");
    Ok(())
}

/// Replaces a patient's stored selections without materializing
/// anything. [`apply_class_plan`] is the usual entry point; this one
/// exists for plan edits that defer scheduling.
pub fn replace_class_selections(
    conn: &Connection,
    patient_id: i64,
    selections: &[(u8, String)],
) -> Result<(), SchedulingError> {
    let parsed = parse_selections(selections)?;
    let stored: Vec<(u8, NaiveTime)> = parsed.iter().map(|s| (s.weekday, s.start)).collect();
    repository::get_patient(conn, patient_id)?;

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    repository::replace_selections(&tx, patient_id, &stored)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(patient_id, selections = stored.len(), "Replaced class selections");
    Ok(())
}

struct ParsedSelection {
    weekday: u8,
    start: NaiveTime,
}

fn parse_selections(selections: &[(u8, String)]) -> Result<Vec<ParsedSelection>, SchedulingError> {
    let mut parsed = Vec::with_capacity(selections.len());
    for (weekday, start) in selections {
        check_weekday(*weekday)?;
        parsed.push(ParsedSelection {
            weekday: *weekday,
            start: parse_clock(*weekday, start)?,
        });
    }
    Ok(parsed)
}

fn check_weekday(weekday: u8) -> Result<(), SchedulingError> {
    if weekday > 6 {
        return Err(SchedulingError::InvalidWeekday(weekday));
    }
    Ok(())
}

fn parse_clock(weekday: u8, value: &str) -> Result<NaiveTime, SchedulingError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| SchedulingError::InvalidTime {
        weekday,
        value: value.to_string(),
    })
}

// The upper bounds also keep the horizon and slot-end arithmetic inside
// chrono's range.
fn validate_shape(req: &MaterializeRequest) -> Result<(), SchedulingError> {
    if req.duration_minutes <= 0 || req.duration_minutes > MAX_CLASS_DURATION_MIN {
        return Err(SchedulingError::InvalidDuration(req.duration_minutes));
    }
    if req.weeks == 0 || req.weeks > MAX_HORIZON_WEEKS {
        return Err(SchedulingError::InvalidHorizon(req.weeks));
    }
    Ok(())
}

fn ensure_parties(conn: &Connection, req: &MaterializeRequest) -> Result<(), SchedulingError> {
    repository::get_physiotherapist(conn, req.physio_id)?;
    repository::get_patient(conn, req.patient_id)?;
    Ok(())
}

fn materialize_within(
    conn: &Connection,
    req: &MaterializeRequest,
    start_date: NaiveDate,
    selections: &[ParsedSelection],
) -> Result<MaterializeReport, SchedulingError> {
    // Horizon covers whole weeks: start date through start + 7*weeks - 1.
    let horizon_end = start_date + Days::new(7 * u64::from(req.weeks) - 1);
    let mut decisions = Vec::new();

    for sel in selections {
        let windows = repository::windows_for_weekday(conn, req.physio_id, sel.weekday)?;
        let end = slot_end(sel.start, req.duration_minutes);
        let mut date = next_weekday_on_or_after(start_date, sel.weekday);
        while date <= horizon_end {
            let outcome = decide_slot(
                conn,
                req.physio_id,
                req.patient_id,
                date,
                sel.start,
                end,
                &windows,
            )?;
            decisions.push(SlotDecision {
                weekday: sel.weekday,
                date,
                start_time: sel.start,
                end_time: end,
                outcome,
            });
            date = date + Days::new(7);
        }
    }

    Ok(MaterializeReport { decisions })
}

fn decide_slot(
    conn: &Connection,
    physio_id: i64,
    patient_id: i64,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    windows: &[AvailabilityWindow],
) -> Result<SlotOutcome, SchedulingError> {
    if !windows.iter().any(|w| w.contains(start, end)) {
        tracing::debug!(%date, %start, "No availability window contains the slot");
        return Ok(SlotOutcome::SkippedNoAvailability);
    }

    let existing = repository::live_entries_for_day(conn, physio_id, date)?;
    if existing
        .iter()
        .any(|e| overlaps(e.start_time, e.end_time, start, end))
    {
        tracing::debug!(%date, %start, "Slot overlaps an existing entry");
        return Ok(SlotOutcome::SkippedConflict);
    }

    match repository::insert_entry(conn, physio_id, Some(patient_id), date, start, end) {
        Ok(entry_id) => Ok(SlotOutcome::Created { entry_id }),
        Err(e) if e.is_constraint_violation() => {
            tracing::debug!(%date, %start, "Slot guard rejected a duplicate entry");
            Ok(SlotOutcome::SkippedConflict)
        }
        Err(e) => Err(e.into()),
    }
}

/// First date on or after `start` falling on `weekday` (0 = Monday).
fn next_weekday_on_or_after(start: NaiveDate, weekday: u8) -> NaiveDate {
    let delta =
        (i64::from(weekday) - i64::from(start.weekday().num_days_from_monday())).rem_euclid(7);
    start + Days::new(delta as u64)
}

/// End of a slot starting at `start`. Wraps at midnight like plain
/// clock arithmetic; clinic hours are assumed to keep start + duration
/// within the day.
fn slot_end(start: NaiveTime, duration_minutes: i64) -> NaiveTime {
    start
        .overflowing_add_signed(Duration::minutes(duration_minutes))
        .0
}

/// Interval overlap between an existing entry and a candidate slot.
/// Shared boundaries do not collide, so back-to-back classes are fine.
fn overlaps(
    existing_start: NaiveTime,
    existing_end: NaiveTime,
    slot_start: NaiveTime,
    slot_end: NaiveTime,
) -> bool {
    (existing_start <= slot_start && existing_end > slot_start)
        || (existing_start < slot_end && existing_end >= slot_end)
        || (existing_start >= slot_start && existing_end <= slot_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn setup() -> Connection {
        let conn = open_memory_database().unwrap();
        conn.execute_batch(
            "INSERT INTO physiotherapists (id, name, email) VALUES (1, 'Ana Souza', 'ana@vitally.test');
             INSERT INTO patients (id, name, joined_on) VALUES (1, 'Bruno Lima', '2025-02-01');",
        )
        .unwrap();
        conn
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn t(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    fn set_hours(conn: &Connection, windows: &[(u8, &str, &str)]) {
        let windows: Vec<(u8, String, String)> = windows
            .iter()
            .map(|(w, s, e)| (*w, s.to_string(), e.to_string()))
            .collect();
        replace_availability(conn, 1, &windows).unwrap();
    }

    fn request(selections: &[(u8, &str)], weeks: u32) -> MaterializeRequest {
        let selections = selections
            .iter()
            .map(|(w, s)| (*w, s.to_string()))
            .collect();
        let mut req = MaterializeRequest::new(1, 1, selections, weeks);
        req.start_date = Some(monday());
        req
    }

    fn count_entries(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM schedule_entries", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn materializes_one_entry_per_week_across_horizon() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);

        let report = materialize_classes(&conn, &request(&[(0, "09:00")], 4)).unwrap();

        assert_eq!(report.created(), 4);
        assert_eq!(report.skipped_no_availability(), 0);
        assert_eq!(report.skipped_conflict(), 0);

        let entries =
            repository::list_range(&conn, 1, monday(), monday() + Days::new(27)).unwrap();
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![d(2025, 3, 3), d(2025, 3, 10), d(2025, 3, 17), d(2025, 3, 24)]
        );
        for entry in &entries {
            assert_eq!(entry.start_time, t(9, 0));
            assert_eq!(entry.end_time, t(10, 0));
            assert_eq!(entry.patient_id, Some(1));
            assert_eq!(entry.status, crate::models::EntryStatus::Scheduled);
        }
    }

    #[test]
    fn first_candidate_rolls_forward_from_midweek_start() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00"), (2, "08:00", "17:00")]);

        // Start on Wednesday 2025-03-05; one-week horizon ends Tuesday
        // 2025-03-11.
        let mut req = request(&[(0, "09:00"), (2, "10:00")], 1);
        req.start_date = Some(d(2025, 3, 5));
        let report = materialize_classes(&conn, &req).unwrap();

        assert_eq!(report.created(), 2);
        assert_eq!(report.decisions[0].date, d(2025, 3, 10));
        assert_eq!(report.decisions[1].date, d(2025, 3, 5));
    }

    #[test]
    fn horizon_end_is_inclusive() {
        let conn = setup();
        set_hours(&conn, &[(2, "08:00", "17:00"), (3, "08:00", "17:00")]);

        // Start Thursday 2025-03-06; the week ends Wednesday 2025-03-12.
        let mut req = request(&[(2, "09:00"), (3, "09:00")], 1);
        req.start_date = Some(d(2025, 3, 6));
        let report = materialize_classes(&conn, &req).unwrap();

        assert_eq!(report.created(), 2);
        let dates: Vec<NaiveDate> = report.decisions.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![d(2025, 3, 12), d(2025, 3, 6)]);
    }

    #[test]
    fn skips_only_the_conflicting_date() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);
        repository::insert_entry(&conn, 1, None, d(2025, 3, 10), t(9, 30), t(10, 30)).unwrap();

        let report = materialize_classes(&conn, &request(&[(0, "09:00")], 4)).unwrap();

        assert_eq!(report.created(), 3);
        assert_eq!(report.skipped_conflict(), 1);
        let blocked: Vec<NaiveDate> = report
            .decisions
            .iter()
            .filter(|dec| dec.outcome == SlotOutcome::SkippedConflict)
            .map(|dec| dec.date)
            .collect();
        assert_eq!(blocked, vec![d(2025, 3, 10)]);
    }

    #[test]
    fn selection_outside_availability_is_skipped() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);

        let report = materialize_classes(&conn, &request(&[(0, "18:00")], 4)).unwrap();

        assert_eq!(report.created(), 0);
        assert_eq!(report.skipped_no_availability(), 4);
        assert_eq!(count_entries(&conn), 0);
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let conn = setup();
        set_hours(&conn, &[(0, "09:00", "10:00")]);

        let exact = materialize_classes(&conn, &request(&[(0, "09:00")], 1)).unwrap();
        assert_eq!(exact.created(), 1);

        let overflowing = materialize_classes(&conn, &request(&[(0, "09:30")], 1)).unwrap();
        assert_eq!(overflowing.created(), 0);
        assert_eq!(overflowing.skipped_no_availability(), 1);
    }

    #[test]
    fn back_to_back_classes_do_not_conflict() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);
        repository::insert_entry(&conn, 1, None, monday(), t(8, 0), t(9, 0)).unwrap();

        let report = materialize_classes(&conn, &request(&[(0, "09:00")], 1)).unwrap();
        assert_eq!(report.created(), 1);
    }

    #[test]
    fn second_materialization_creates_nothing() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);
        let req = request(&[(0, "09:00")], 4);

        let first = materialize_classes(&conn, &req).unwrap();
        assert_eq!(first.created(), 4);

        let second = materialize_classes(&conn, &req).unwrap();
        assert_eq!(second.created(), 0);
        assert_eq!(second.skipped_conflict(), 4);
        assert_eq!(count_entries(&conn), 4);
    }

    #[test]
    fn slot_guard_rejection_is_a_skip_not_an_error() {
        let conn = setup();
        set_hours(&conn, &[(0, "22:00", "23:45")]);
        // An entry ending past midnight reads back with an early-morning
        // end, which the interval test does not flag; the insert trips
        // the slot guard index instead.
        repository::insert_entry(&conn, 1, None, monday(), t(23, 30), t(0, 30)).unwrap();

        let mut req = request(&[(0, "23:30")], 1);
        req.duration_minutes = 45;
        let report = materialize_classes(&conn, &req).unwrap();

        assert_eq!(report.decisions.len(), 1);
        assert_eq!(report.decisions[0].outcome, SlotOutcome::SkippedConflict);
        assert_eq!(count_entries(&conn), 1);
    }

    #[test]
    fn earlier_tuple_blocks_later_overlapping_tuple() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);

        let report = materialize_classes(&conn, &request(&[(0, "09:00"), (0, "09:30")], 1)).unwrap();

        assert!(matches!(
            report.decisions[0].outcome,
            SlotOutcome::Created { .. }
        ));
        assert_eq!(report.decisions[1].outcome, SlotOutcome::SkippedConflict);
        assert_eq!(count_entries(&conn), 1);
    }

    #[test]
    fn cancelled_entries_do_not_block() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);
        let id = repository::insert_entry(&conn, 1, None, monday(), t(9, 0), t(10, 0)).unwrap();
        repository::cancel_entry(&conn, id).unwrap();

        let report = materialize_classes(&conn, &request(&[(0, "09:00")], 1)).unwrap();

        assert_eq!(report.created(), 1);
        // The cancelled row stays alongside the fresh one.
        assert_eq!(count_entries(&conn), 2);
    }

    #[test]
    fn malformed_time_fails_before_any_write() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);

        let err = materialize_classes(&conn, &request(&[(0, "09:00"), (2, "9h30")], 4))
            .unwrap_err();

        match err {
            SchedulingError::InvalidTime { weekday, value } => {
                assert_eq!(weekday, 2);
                assert_eq!(value, "9h30");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(count_entries(&conn), 0);
    }

    #[test]
    fn out_of_range_weekday_is_rejected() {
        let conn = setup();
        let err = materialize_classes(&conn, &request(&[(7, "09:00")], 1)).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidWeekday(7)));
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        let conn = setup();

        let mut req = request(&[(0, "09:00")], 1);
        req.duration_minutes = 0;
        assert!(matches!(
            materialize_classes(&conn, &req).unwrap_err(),
            SchedulingError::InvalidDuration(0)
        ));

        let req = request(&[(0, "09:00")], 0);
        assert!(matches!(
            materialize_classes(&conn, &req).unwrap_err(),
            SchedulingError::InvalidHorizon(0)
        ));
    }

    #[test]
    fn horizon_and_duration_bounds_are_enforced() {
        let conn = setup();

        let mut req = request(&[(0, "09:00")], 1);
        req.duration_minutes = 24 * 60;
        assert!(matches!(
            materialize_classes(&conn, &req).unwrap_err(),
            SchedulingError::InvalidDuration(1440)
        ));

        // Extreme values come back as errors, not as panics in the date
        // and duration arithmetic.
        let mut req = request(&[(0, "09:00")], 1);
        req.duration_minutes = i64::MAX;
        assert!(matches!(
            materialize_classes(&conn, &req).unwrap_err(),
            SchedulingError::InvalidDuration(i64::MAX)
        ));

        let req = request(&[(0, "09:00")], u32::MAX);
        assert!(matches!(
            materialize_classes(&conn, &req).unwrap_err(),
            SchedulingError::InvalidHorizon(u32::MAX)
        ));

        // The bounds themselves pass.
        let mut req = request(&[], MAX_HORIZON_WEEKS);
        req.duration_minutes = MAX_CLASS_DURATION_MIN;
        assert!(materialize_classes(&conn, &req).is_ok());
        assert_eq!(count_entries(&conn), 0);
    }

    #[test]
    fn empty_selection_list_is_a_no_op() {
        let conn = setup();
        let report = materialize_classes(&conn, &request(&[], 4)).unwrap();
        assert!(report.decisions.is_empty());
        assert_eq!(count_entries(&conn), 0);
    }

    #[test]
    fn unknown_physiotherapist_fails_with_not_found() {
        let conn = setup();
        let mut req = request(&[(0, "09:00")], 1);
        req.physio_id = 99;
        let err = materialize_classes(&conn, &req).unwrap_err();
        assert!(matches!(
            err,
            SchedulingError::Database(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn apply_class_plan_replaces_selections_and_reschedules() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00"), (1, "08:00", "17:00")]);

        let first = apply_class_plan(&conn, &request(&[(0, "09:00")], 4)).unwrap();
        assert_eq!(first.created(), 4);

        let second = apply_class_plan(&conn, &request(&[(1, "10:00")], 4)).unwrap();
        assert_eq!(second.created(), 4);

        let selections = repository::selections_for_patient(&conn, 1).unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].weekday, 1);
        assert_eq!(selections[0].start_time, t(10, 0));

        // The Monday entries are gone; only the Tuesday plan remains.
        let entries =
            repository::list_range(&conn, 1, monday(), monday() + Days::new(27)).unwrap();
        assert_eq!(entries.len(), 4);
        for entry in &entries {
            assert_eq!(entry.date.weekday().num_days_from_monday(), 1);
            assert_eq!(entry.start_time, t(10, 0));
        }
    }

    #[test]
    fn apply_class_plan_keeps_past_and_cancelled_entries() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00"), (1, "08:00", "17:00")]);

        // A class attended the week before the new plan starts.
        repository::insert_entry(&conn, 1, Some(1), d(2025, 2, 24), t(9, 0), t(10, 0)).unwrap();

        let first = apply_class_plan(&conn, &request(&[(0, "09:00")], 4)).unwrap();
        let cancelled_id = first.created_entry_ids()[0];
        repository::cancel_entry(&conn, cancelled_id).unwrap();

        apply_class_plan(&conn, &request(&[(1, "10:00")], 4)).unwrap();

        let past = repository::get_entry(&conn, 1).unwrap();
        assert_eq!(past.date, d(2025, 2, 24));

        let kept = repository::get_entry(&conn, cancelled_id).unwrap();
        assert_eq!(kept.status, crate::models::EntryStatus::Cancelled);

        // 1 past + 1 cancelled + 4 from the new plan.
        assert_eq!(count_entries(&conn), 6);
    }

    #[test]
    fn replace_availability_is_wholesale() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "12:00"), (2, "14:00", "18:00")]);
        set_hours(&conn, &[(4, "09:00", "13:00")]);

        let windows = repository::list_windows(&conn, 1).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].weekday, 4);

        set_hours(&conn, &[]);
        assert!(repository::list_windows(&conn, 1).unwrap().is_empty());
    }

    #[test]
    fn replace_availability_for_unknown_physio_fails() {
        let conn = setup();
        let err = replace_availability(&conn, 99, &[(0, "08:00".into(), "12:00".into())])
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulingError::Database(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn inverted_window_rolls_back_the_replacement() {
        let conn = setup();
        set_hours(&conn, &[(0, "09:00", "13:00")]);

        // The second window has start >= end; the schema check rejects
        // it and the whole replacement rolls back.
        let err = replace_availability(
            &conn,
            1,
            &[
                (1, "09:00".into(), "13:00".into()),
                (2, "10:00".into(), "08:00".into()),
            ],
        )
        .unwrap_err();
        match err {
            SchedulingError::Database(db) => assert!(db.is_constraint_violation()),
            other => panic!("unexpected error: {other}"),
        }

        let kept = repository::list_windows(&conn, 1).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].weekday, 0);
        assert_eq!(kept[0].start_time, t(9, 0));
        assert_eq!(kept[0].end_time, t(13, 0));
    }

    #[test]
    fn replace_class_selections_is_wholesale() {
        let conn = setup();
        replace_class_selections(&conn, 1, &[(0, "09:00".into()), (2, "10:00".into())]).unwrap();
        replace_class_selections(&conn, 1, &[(4, "11:00".into())]).unwrap();

        let selections = repository::selections_for_patient(&conn, 1).unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].weekday, 4);
        assert_eq!(selections[0].start_time, t(11, 0));
    }

    #[test]
    fn deleting_patient_keeps_entries_unassigned() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);
        let report = apply_class_plan(&conn, &request(&[(0, "09:00")], 2)).unwrap();
        let entry_id = report.created_entry_ids()[0];

        repository::delete_patient(&conn, 1).unwrap();

        assert!(repository::selections_for_patient(&conn, 1).unwrap().is_empty());
        let entry = repository::get_entry(&conn, entry_id).unwrap();
        assert_eq!(entry.patient_id, None);
        assert_eq!(entry.status, crate::models::EntryStatus::Scheduled);
    }

    #[test]
    fn deleting_physiotherapist_cascades_schedule() {
        let conn = setup();
        set_hours(&conn, &[(0, "08:00", "17:00")]);
        materialize_classes(&conn, &request(&[(0, "09:00")], 2)).unwrap();

        repository::delete_physiotherapist(&conn, 1).unwrap();

        assert!(repository::list_windows(&conn, 1).unwrap().is_empty());
        assert_eq!(count_entries(&conn), 0);
    }

    #[test]
    fn cancel_entry_flips_status_once() {
        let conn = setup();
        let id = repository::insert_entry(&conn, 1, Some(1), monday(), t(9, 0), t(10, 0)).unwrap();

        repository::cancel_entry(&conn, id).unwrap();
        let entry = repository::get_entry(&conn, id).unwrap();
        assert_eq!(entry.status, crate::models::EntryStatus::Cancelled);

        let err = repository::cancel_entry(&conn, 999).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn grid_lists_entries_in_day_and_time_order() {
        let conn = setup();
        repository::insert_entry(&conn, 1, Some(1), d(2025, 3, 10), t(14, 0), t(15, 0)).unwrap();
        repository::insert_entry(&conn, 1, Some(1), d(2025, 3, 3), t(9, 0), t(10, 0)).unwrap();
        repository::insert_entry(&conn, 1, Some(1), d(2025, 3, 10), t(8, 0), t(9, 0)).unwrap();

        let entries =
            repository::list_range(&conn, 1, d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        let order: Vec<(NaiveDate, NaiveTime)> =
            entries.iter().map(|e| (e.date, e.start_time)).collect();
        assert_eq!(
            order,
            vec![
                (d(2025, 3, 3), t(9, 0)),
                (d(2025, 3, 10), t(8, 0)),
                (d(2025, 3, 10), t(14, 0)),
            ]
        );
    }

    #[test]
    fn next_weekday_lands_on_the_requested_day() {
        // 2025-03-03 is a Monday.
        assert_eq!(next_weekday_on_or_after(monday(), 0), monday());
        assert_eq!(next_weekday_on_or_after(monday(), 3), d(2025, 3, 6));
        assert_eq!(next_weekday_on_or_after(d(2025, 3, 5), 0), d(2025, 3, 10));
        assert_eq!(next_weekday_on_or_after(d(2025, 3, 9), 6), d(2025, 3, 9));
    }

    #[test]
    fn overlap_covers_containment_and_edges() {
        // Existing covers the slot start.
        assert!(overlaps(t(8, 30), t(9, 30), t(9, 0), t(10, 0)));
        // Existing covers the slot end.
        assert!(overlaps(t(9, 30), t(10, 30), t(9, 0), t(10, 0)));
        // Existing inside the slot.
        assert!(overlaps(t(9, 15), t(9, 45), t(9, 0), t(10, 0)));
        // Slot inside the existing entry.
        assert!(overlaps(t(8, 0), t(12, 0), t(9, 0), t(10, 0)));
        // Identical intervals.
        assert!(overlaps(t(9, 0), t(10, 0), t(9, 0), t(10, 0)));
        // Back-to-back on either side.
        assert!(!overlaps(t(8, 0), t(9, 0), t(9, 0), t(10, 0)));
        assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
    }
}
