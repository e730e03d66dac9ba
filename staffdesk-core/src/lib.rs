//! Core types for the staffdesk toolkit.
//!
//! This crate provides the pieces shared by the staffdesk front ends:
//! - `date` for month-grid math and inclusive date ranges
//! - `selection` for the calendar tap-classification state machine
//! - `roster` for staff scheduling records (tasks, shifts, absences, events)
//! - `registry` for the screen-action registry used by navigation chrome

pub mod date;
pub mod error;
pub mod registry;
pub mod roster;
pub mod selection;

// Re-export the types most callers touch at crate root for convenience
pub use date::{DateRange, MonthView};
pub use error::{StaffDeskError, StaffDeskResult};
pub use selection::{DateSelectionEngine, SelectionRange, TapOutcome};
