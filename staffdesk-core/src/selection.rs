//! Tap classification for the calendar grid.
//!
//! A stream of day-cell taps resolves into single-date selections and date
//! ranges: the first tap arms a provisional start date, the second completes
//! the range (endpoints swapped into ascending order if needed), and a quick
//! second tap on the same cell collapses everything back to a single date.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::debug;

use crate::date::{DateRange, MonthView};

/// Window within which a second tap on the same day cell counts as a double
/// tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(500);

/// Current highlight state. Endpoints fill in as a range is built: `start`
/// alone while the first date is armed, both once a range completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// What a tap resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// A single date was selected. Also emitted provisionally by the tap that
    /// arms the first endpoint of a range, so the host highlights it while
    /// the range is being built.
    Selected(NaiveDate),
    /// A second tap completed a range. Endpoints are already normalized.
    RangeCompleted(DateRange),
}

/// State machine turning day-cell taps into selections.
///
/// Purely synchronous; the host supplies the tap instant so behavior is a
/// total function of its inputs.
#[derive(Debug)]
pub struct DateSelectionEngine {
    month: MonthView,
    range: SelectionRange,
    pending_start: Option<NaiveDate>,
    last_tap_at: Option<Instant>,
    last_tapped_day: Option<u32>,
}

impl DateSelectionEngine {
    pub fn new(month: MonthView) -> Self {
        DateSelectionEngine {
            month,
            range: SelectionRange::default(),
            pending_start: None,
            last_tap_at: None,
            last_tapped_day: None,
        }
    }

    /// Classify a tap on a 1-based day cell of the displayed month.
    pub fn tap(&mut self, day: u32, now: Instant) -> TapOutcome {
        let clicked = self.month.date_of(day);

        // Double tap requires the same day cell within the window. Takes
        // precedence over every other rule.
        let double_tap = match (self.last_tap_at, self.last_tapped_day) {
            (Some(at), Some(last_day)) => {
                now.duration_since(at) < DOUBLE_TAP_WINDOW && last_day == day
            }
            _ => false,
        };

        let outcome = if double_tap {
            debug!(date = %clicked, "double tap, collapsing to single date");
            self.range = SelectionRange::default();
            self.pending_start = None;
            TapOutcome::Selected(clicked)
        } else if let Some(first) = self.pending_start {
            if clicked == first {
                // Same date re-tapped after the double-tap window: still a
                // single-date selection.
                debug!(date = %clicked, "same date re-tapped, single date");
                self.range = SelectionRange::default();
                self.pending_start = None;
                TapOutcome::Selected(clicked)
            } else {
                let range = DateRange::new(first, clicked);
                debug!(start = %range.start, end = %range.end, "range completed");
                self.range = SelectionRange {
                    start: Some(range.start),
                    end: Some(range.end),
                };
                self.pending_start = None;
                TapOutcome::RangeCompleted(range)
            }
        } else {
            debug!(date = %clicked, "first date armed");
            self.pending_start = Some(clicked);
            self.range = SelectionRange {
                start: Some(clicked),
                end: None,
            };
            TapOutcome::Selected(clicked)
        };

        self.last_tap_at = Some(now);
        self.last_tapped_day = Some(day);
        outcome
    }

    /// Resolve a long press on a day cell. Independent of the tap state
    /// machine; does not mutate it.
    pub fn long_press(&self, day: u32) -> NaiveDate {
        self.month.date_of(day)
    }

    /// Whether a day cell falls inside the completed selection range.
    pub fn is_in_range(&self, day: u32) -> bool {
        let (Some(start), Some(end)) = (self.range.start, self.range.end) else {
            return false;
        };
        let date = self.month.date_of(day);
        start <= date && date <= end
    }

    /// Whether a day cell is the start of the completed selection range.
    pub fn is_range_start(&self, day: u32) -> bool {
        let (Some(start), Some(_)) = (self.range.start, self.range.end) else {
            return false;
        };
        self.month.date_of(day) == start
    }

    /// Whether a day cell is the end of the completed selection range.
    pub fn is_range_end(&self, day: u32) -> bool {
        let (Some(_), Some(end)) = (self.range.start, self.range.end) else {
            return false;
        };
        self.month.date_of(day) == end
    }

    pub fn selection(&self) -> SelectionRange {
        self.range
    }

    /// The armed first date while a range is being built.
    pub fn pending_start(&self) -> Option<NaiveDate> {
        self.pending_start
    }

    pub fn month(&self) -> MonthView {
        self.month
    }

    /// Switch the displayed month. Selection state carries over; day indices
    /// of later taps resolve against the new month.
    pub fn set_month(&mut self, month: MonthView) {
        self.month = month;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march_2024() -> DateSelectionEngine {
        DateSelectionEngine::new(MonthView::new(2024, 3))
    }

    /// Tap instants offset in milliseconds from a common base.
    fn clock() -> impl Fn(u64) -> Instant {
        let base = Instant::now();
        move |ms| base + Duration::from_millis(ms)
    }

    #[test]
    fn test_queries_false_before_any_tap() {
        let engine = march_2024();
        assert!(!engine.is_in_range(10));
        assert!(!engine.is_range_start(10));
        assert!(!engine.is_range_end(10));
        assert_eq!(engine.selection(), SelectionRange::default());
    }

    #[test]
    fn test_first_tap_arms_provisional_selection() {
        let mut engine = march_2024();
        let t = clock();

        let outcome = engine.tap(10, t(0));
        assert_eq!(outcome, TapOutcome::Selected(date(2024, 3, 10)));
        assert_eq!(engine.pending_start(), Some(date(2024, 3, 10)));
        assert_eq!(engine.selection().start, Some(date(2024, 3, 10)));
        assert_eq!(engine.selection().end, None);
        // Highlight queries stay false while the end is unset
        assert!(!engine.is_range_start(10));
        assert!(!engine.is_in_range(10));
    }

    #[test]
    fn test_double_tap_collapses_to_single_date() {
        let mut engine = march_2024();
        let t = clock();

        engine.tap(10, t(0));
        let outcome = engine.tap(10, t(300));
        assert_eq!(outcome, TapOutcome::Selected(date(2024, 3, 10)));
        assert_eq!(engine.pending_start(), None);
        assert_eq!(engine.selection(), SelectionRange::default());
    }

    #[test]
    fn test_double_tap_clears_in_progress_range() {
        let mut engine = march_2024();
        let t = clock();

        engine.tap(5, t(0));
        engine.tap(10, t(600));
        assert!(engine.is_in_range(7));

        // Quick second tap on the cell just tapped wipes the completed range
        engine.tap(10, t(700));
        assert!(!engine.is_in_range(7));
        assert_eq!(engine.selection(), SelectionRange::default());
    }

    #[test]
    fn test_range_completes_in_order() {
        let mut engine = march_2024();
        let t = clock();

        engine.tap(5, t(0));
        let outcome = engine.tap(10, t(600));
        assert_eq!(
            outcome,
            TapOutcome::RangeCompleted(DateRange::new(date(2024, 3, 5), date(2024, 3, 10)))
        );
        assert_eq!(engine.pending_start(), None);
        assert!(engine.is_range_start(5));
        assert!(engine.is_range_end(10));
        assert!(engine.is_in_range(7));
        assert!(!engine.is_in_range(11));
    }

    #[test]
    fn test_range_swaps_reversed_endpoints() {
        // Tap day 10 first, then day 5: the stored range is still ascending
        let mut engine = march_2024();
        let t = clock();

        let first = engine.tap(10, t(0));
        assert_eq!(first, TapOutcome::Selected(date(2024, 3, 10)));

        let outcome = engine.tap(5, t(600));
        let TapOutcome::RangeCompleted(range) = outcome else {
            panic!("expected a completed range, got {outcome:?}");
        };
        assert_eq!(range.start, date(2024, 3, 5));
        assert_eq!(range.end, date(2024, 3, 10));
    }

    #[test]
    fn test_same_date_retap_after_window_selects_single() {
        // Misses the double-tap window but hits the armed date: single-date
        // selection through the pending-start branch
        let mut engine = march_2024();
        let t = clock();

        engine.tap(7, t(0));
        let outcome = engine.tap(7, t(600));
        assert_eq!(outcome, TapOutcome::Selected(date(2024, 3, 7)));
        assert_eq!(engine.pending_start(), None);
        assert_eq!(engine.selection(), SelectionRange::default());
    }

    #[test]
    fn test_tap_after_completed_range_starts_over() {
        let mut engine = march_2024();
        let t = clock();

        engine.tap(5, t(0));
        engine.tap(10, t(600));
        let outcome = engine.tap(20, t(1200));
        assert_eq!(outcome, TapOutcome::Selected(date(2024, 3, 20)));
        assert_eq!(engine.pending_start(), Some(date(2024, 3, 20)));
        // The old range highlight is gone
        assert!(!engine.is_in_range(7));
    }

    #[test]
    fn test_long_press_does_not_mutate_tap_state() {
        let mut engine = march_2024();
        let t = clock();

        engine.tap(5, t(0));
        assert_eq!(engine.long_press(12), date(2024, 3, 12));
        assert_eq!(engine.pending_start(), Some(date(2024, 3, 5)));

        // The armed range still completes as if the long press never happened
        let outcome = engine.tap(8, t(600));
        assert_eq!(
            outcome,
            TapOutcome::RangeCompleted(DateRange::new(date(2024, 3, 5), date(2024, 3, 8)))
        );
    }

    #[test]
    fn test_month_change_resolves_later_taps_against_new_month() {
        let mut engine = march_2024();
        let t = clock();

        engine.tap(28, t(0));
        engine.set_month(MonthView::new(2024, 4));
        let outcome = engine.tap(3, t(600));
        assert_eq!(
            outcome,
            TapOutcome::RangeCompleted(DateRange::new(date(2024, 3, 28), date(2024, 4, 3)))
        );
    }
}
