/// Application-level constants
pub const APP_NAME: &str = "Vitally";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Days between a payment (or the joining date, before any payment) and
/// the next billing date.
pub const BILLING_CYCLE_DAYS: u64 = 30;

/// How far ahead the due-soon billing listing looks.
pub const BILLING_DUE_SOON_DAYS: u64 = 7;

/// Class length in minutes assumed when the caller does not supply one.
pub const DEFAULT_CLASS_DURATION_MIN: i64 = 60;

/// Longest class the scheduling engine accepts; a slot must fit within
/// one day.
pub const MAX_CLASS_DURATION_MIN: i64 = 24 * 60 - 1;

/// Longest materialization horizon in whole weeks (five years).
pub const MAX_HORIZON_WEEKS: u32 = 260;
