// Analytics and spreadsheet exports for a team event-registration system.
//
// Registrations, team members and attendance marks are read from a backend
// snapshot, normalized once, and then fed to independent pure aggregators:
//
// - `trends`: registrations and revenue per day over a trailing window
// - `distribution`: event, affiliation, year-of-study and status breakdowns
// - `comparison`: one comparable row per event
// - `attendance`: desk and venue check-in statistics
// - `export`: flat rows for spreadsheet sheets
//
// None of the aggregators fail. Missing fields are defaulted by
// `normalize`, divisions by zero yield zero, and a registration that
// cannot be exported becomes a diagnostic row.
pub mod attendance;
pub mod cache;
pub mod comparison;
pub mod config;
pub mod contacts;
pub mod distribution;
pub mod error;
pub mod events;
pub mod export;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod revenue;
pub mod summary;
pub mod trends;
pub mod types;
pub mod util;

#[cfg(test)]
mod fixtures;

pub use error::ReportError;
pub use events::{Event, EventCatalog};
pub use normalize::{normalize, normalize_at};
pub use types::{AttendanceRecord, RawRegistration, Registration, Status, TeamMember};
