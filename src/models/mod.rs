//! Record types for the clinic entities.
//!
//! One explicit struct per stored entity; the repositories map rows into
//! these and nothing else. Weekdays are numbered 0 = Monday .. 6 = Sunday
//! throughout (the same numbering chrono exposes via
//! `Weekday::num_days_from_monday`).

pub mod availability;
pub mod class_selection;
pub mod enums;
pub mod patient;
pub mod physiotherapist;
pub mod schedule_entry;

pub use availability::AvailabilityWindow;
pub use class_selection::ClassSelection;
pub use enums::EntryStatus;
pub use patient::Patient;
pub use physiotherapist::Physiotherapist;
pub use schedule_entry::ScheduleEntry;
