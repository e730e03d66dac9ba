//! Staff roster records: tasks, shifts, absences, and one-off staff events.
//!
//! These are the typed shapes of the records the CRUD services move around.
//! Field names serialize in camelCase so the wire records match the service
//! payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date::DateRange;

/// A housekeeping/maintenance task on the task board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Staff member the task is assigned to, by name.
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

/// A staff member in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub on_shift: bool,
}

/// A scheduled shift covering one or more staff members over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    /// Names of the staff members working the shift.
    pub staff: Vec<String>,
    pub date_range: DateRange,
    pub created_at: DateTime<Utc>,
}

/// A staff member's absence over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Absence {
    pub id: String,
    pub staff: String,
    pub date_range: DateRange,
    pub kind: AbsenceKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsenceKind {
    Vacation,
    Sick,
    Personal,
}

/// A one-off event pinned to a single calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Everything the calendar grid overlays on its day cells.
#[derive(Debug, Clone, Default)]
pub struct RosterItems {
    pub shifts: Vec<Shift>,
    pub absences: Vec<Absence>,
    pub events: Vec<StaffEvent>,
}

/// Borrowed view of the roster items touching one day.
#[derive(Debug, Default)]
pub struct DayItems<'a> {
    pub shifts: Vec<&'a Shift>,
    pub absences: Vec<&'a Absence>,
    pub events: Vec<&'a StaffEvent>,
}

impl<'a> DayItems<'a> {
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty() && self.absences.is_empty() && self.events.is_empty()
    }
}

/// Indicator color class for a day cell, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayIndicator {
    Shift,
    Absence,
    Event,
}

impl RosterItems {
    /// Collect the items touching a given day: shifts and absences by range
    /// containment, events by exact date.
    pub fn items_for_date(&self, date: NaiveDate) -> DayItems<'_> {
        DayItems {
            shifts: self
                .shifts
                .iter()
                .filter(|s| s.date_range.contains(date))
                .collect(),
            absences: self
                .absences
                .iter()
                .filter(|a| a.date_range.contains(date))
                .collect(),
            events: self.events.iter().filter(|e| e.date == date).collect(),
        }
    }

    pub fn has_items(&self, date: NaiveDate) -> bool {
        !self.items_for_date(date).is_empty()
    }

    /// Indicator for a day cell. Precedence: shifts over absences over
    /// events.
    pub fn indicator(&self, date: NaiveDate) -> Option<DayIndicator> {
        let items = self.items_for_date(date);
        if !items.shifts.is_empty() {
            Some(DayIndicator::Shift)
        } else if !items.absences.is_empty() {
            Some(DayIndicator::Absence)
        } else if !items.events.is_empty() {
            Some(DayIndicator::Event)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty() && self.absences.is_empty() && self.events.is_empty()
    }
}
