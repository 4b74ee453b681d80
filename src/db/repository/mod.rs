//! Per-entity SQL accessors.
//!
//! Every function takes a borrowed [`rusqlite::Connection`] (a
//! transaction works too, it derefs to one) and maps SQLite failures
//! into [`DatabaseError`](crate::db::DatabaseError). Business rules
//! such as billing arithmetic or slot conflict handling live in the
//! callers, not here.

pub mod availability;
pub mod class_selection;
pub mod patient;
pub mod physiotherapist;
pub mod schedule;

pub use availability::*;
pub use class_selection::*;
pub use patient::*;
pub use physiotherapist::*;
pub use schedule::*;
