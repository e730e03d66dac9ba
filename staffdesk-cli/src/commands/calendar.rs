//! Month calendar command with simulated tap sequences.

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

use staffdesk_core::{DateSelectionEngine, MonthView, TapOutcome};

use crate::render;
use crate::services;

/// Gap between simulated taps: outside the double-tap window.
const TAP_GAP: Duration = Duration::from_millis(600);
/// Gap for the second tap of a simulated double tap: inside the window.
const DOUBLE_TAP_GAP: Duration = Duration::from_millis(100);

pub fn run(month: Option<&str>, taps: Option<&str>) -> Result<()> {
    let view = match month {
        Some(flag) => MonthView::from_flag(flag)?,
        None => MonthView::current(),
    };

    let roster = services::sample_roster(view);
    let mut engine = DateSelectionEngine::new(view);

    let mut outcomes = Vec::new();
    if let Some(taps) = taps {
        for outcome in simulate_taps(&mut engine, taps)? {
            outcomes.push(outcome);
        }
    }

    println!("{}", render::render_month(&engine, &roster));

    let summary = render::render_roster_summary(&roster);
    if !summary.is_empty() {
        println!();
        for line in summary {
            println!("{line}");
        }
    }

    if !outcomes.is_empty() {
        println!();
        for outcome in outcomes {
            match outcome {
                TapOutcome::Selected(date) => {
                    println!("Selected {}", date.format("%B %-d, %Y").bold());
                }
                TapOutcome::RangeCompleted(range) => {
                    println!(
                        "Range {} – {} ({} days)",
                        range.start.format("%B %-d").bold(),
                        range.end.format("%B %-d, %Y").bold(),
                        range.days()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Feed a comma-separated tap sequence through the engine. Each entry is a
/// day number; a "x2" suffix taps the cell twice inside the double-tap
/// window.
fn simulate_taps(engine: &mut DateSelectionEngine, sequence: &str) -> Result<Vec<TapOutcome>> {
    let view = engine.month();
    let mut now = Instant::now();
    let mut outcomes = Vec::new();

    for entry in sequence.split(',') {
        let entry = entry.trim();
        let (day_str, double) = match entry.strip_suffix("x2") {
            Some(day) => (day, true),
            None => (entry, false),
        };
        let day: u32 = day_str
            .parse()
            .with_context(|| format!("Invalid tap entry '{entry}'"))?;
        if day < 1 || day > view.days_in_month() {
            bail!("Day {} does not exist in {}", day, view.title());
        }

        now += TAP_GAP;
        let outcome = engine.tap(day, now);
        if double {
            now += DOUBLE_TAP_GAP;
            outcomes.push(engine.tap(day, now));
        } else {
            outcomes.push(outcome);
        }
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use staffdesk_core::DateRange;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_simulate_range_taps() {
        let mut engine = DateSelectionEngine::new(MonthView::new(2024, 3));
        let outcomes = simulate_taps(&mut engine, "10,5").unwrap();
        assert_eq!(
            outcomes,
            vec![
                TapOutcome::Selected(date(10)),
                TapOutcome::RangeCompleted(DateRange::new(date(5), date(10))),
            ]
        );
    }

    #[test]
    fn test_simulate_double_tap() {
        let mut engine = DateSelectionEngine::new(MonthView::new(2024, 3));
        let outcomes = simulate_taps(&mut engine, "7x2").unwrap();
        assert_eq!(outcomes, vec![TapOutcome::Selected(date(7))]);
        assert_eq!(engine.pending_start(), None);
    }

    #[test]
    fn test_rejects_out_of_month_day() {
        let mut engine = DateSelectionEngine::new(MonthView::new(2024, 2));
        assert!(simulate_taps(&mut engine, "30").is_err());
        assert!(simulate_taps(&mut engine, "abc").is_err());
    }
}
