//! Month-grid math and inclusive date ranges.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{StaffDeskError, StaffDeskResult};

/// The month a calendar grid currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        MonthView { year, month }
    }

    /// The month containing today's date (local time).
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        MonthView::new(today.year(), today.month())
    }

    /// Parse a "YYYY-MM" flag value.
    pub fn from_flag(s: &str) -> StaffDeskResult<Self> {
        let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map_err(|_| StaffDeskError::InvalidMonth(s.to_string()))?;
        Ok(MonthView::new(date.year(), date.month()))
    }

    /// First day of the displayed month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid year/month")
    }

    /// Number of days in the displayed month.
    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("valid year/month")
            .pred_opt()
            .expect("month has a last day")
            .day()
    }

    /// Number of blank cells before day 1 in a Sunday-first grid.
    pub fn leading_weekday_offset(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// Resolve a 1-based day index into a concrete date.
    ///
    /// Callers must pass a day valid for the displayed month; the grid only
    /// wires up cells that exist.
    pub fn date_of(&self, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .expect("day index valid for the displayed month")
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Display title, e.g. "March 2024".
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn prev(&self) -> MonthView {
        if self.month == 1 {
            MonthView::new(self.year - 1, 12)
        } else {
            MonthView::new(self.year, self.month - 1)
        }
    }

    pub fn next(&self) -> MonthView {
        if self.month == 12 {
            MonthView::new(self.year + 1, 1)
        } else {
            MonthView::new(self.year, self.month + 1)
        }
    }
}

/// Inclusive calendar date range, always stored with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from two endpoints, swapping them if given in reverse
    /// order.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if b < a {
            DateRange { start: b, end: a }
        } else {
            DateRange { start: a, end: b }
        }
    }

    /// A single-day range.
    pub fn single(date: NaiveDate) -> Self {
        DateRange { start: date, end: date }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, endpoints included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether any day of the range falls inside the given month.
    pub fn overlaps_month(&self, view: &MonthView) -> bool {
        let first = view.first_day();
        let last = view.date_of(view.days_in_month());
        self.start <= last && first <= self.end
    }
}
