//! Terminal rendering for the task board, staff directory, and calendar grid.

use owo_colors::OwoColorize;

use staffdesk_core::DateSelectionEngine;
use staffdesk_core::roster::{
    DayIndicator, RosterItems, StaffMember, Task, TaskPriority, TaskStatus,
};

use crate::services;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for TaskPriority {
    fn render(&self) -> String {
        match self {
            TaskPriority::High => "high".red().to_string(),
            TaskPriority::Medium => "medium".yellow().to_string(),
            TaskPriority::Low => "low".dimmed().to_string(),
        }
    }
}

impl Render for TaskStatus {
    fn render(&self) -> String {
        match self {
            TaskStatus::Pending => "○".dimmed().to_string(),
            TaskStatus::InProgress => "◐".yellow().to_string(),
            TaskStatus::Completed => "●".green().to_string(),
        }
    }
}

impl Render for Task {
    fn render(&self) -> String {
        let assignee = match &self.assigned_to {
            Some(name) => format!(" → {name}"),
            None => " (unassigned)".to_string(),
        };
        format!(
            "{} [{}] {} ({}){}",
            self.status.render(),
            self.id.dimmed(),
            self.title,
            self.priority.render(),
            assignee.dimmed(),
        )
    }
}

impl Render for StaffMember {
    fn render(&self) -> String {
        let presence = if self.on_shift {
            "●".green().to_string()
        } else {
            "○".dimmed().to_string()
        };
        format!(
            "{} {} — {} ({})",
            presence,
            self.name,
            self.position,
            self.department.dimmed()
        )
    }
}

fn indicator_dot(indicator: Option<DayIndicator>) -> String {
    match indicator {
        Some(DayIndicator::Shift) => "•".blue().to_string(),
        Some(DayIndicator::Absence) => "•".yellow().to_string(),
        Some(DayIndicator::Event) => "•".green().to_string(),
        None => " ".to_string(),
    }
}

/// Render the month grid: Sunday-first weeks, selection highlight from the
/// engine's queries, indicator dots from the roster.
pub fn render_month(engine: &DateSelectionEngine, roster: &RosterItems) -> String {
    let view = engine.month();
    let mut lines = Vec::new();

    lines.push(format!("   {}", view.title().bold()));
    lines.push(" Su  Mo  Tu  We  Th  Fr  Sa".dimmed().to_string());

    let mut cells: Vec<String> = Vec::new();
    for _ in 0..view.leading_weekday_offset() {
        cells.push("    ".to_string());
    }

    for day in 1..=view.days_in_month() {
        let date = view.date_of(day);
        let number = format!("{day:>2}");

        let styled = if engine.is_range_start(day) || engine.is_range_end(day) {
            number.bold().reversed().to_string()
        } else if engine.is_in_range(day) {
            number.reversed().to_string()
        } else if engine.pending_start() == Some(date) {
            number.bold().to_string()
        } else if services::is_today(view, day) {
            number.underline().to_string()
        } else {
            number
        };

        cells.push(format!(" {}{}", styled, indicator_dot(roster.indicator(date))));
    }

    for week in cells.chunks(7) {
        lines.push(week.concat());
    }

    if !roster.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  {} shifts   {} absences   {} events",
            "•".blue(),
            "•".yellow(),
            "•".green()
        ));
    }

    lines.join("\n")
}

/// One summary line per roster item overlapping the displayed month.
pub fn render_roster_summary(roster: &RosterItems) -> Vec<String> {
    let mut lines = Vec::new();
    for shift in &roster.shifts {
        lines.push(format!(
            "  {} Shift {} – {}: {}",
            "•".blue(),
            shift.date_range.start.format("%b %-d"),
            shift.date_range.end.format("%b %-d"),
            shift.staff.join(", ")
        ));
    }
    for absence in &roster.absences {
        lines.push(format!(
            "  {} Absence {} – {}: {} ({:?})",
            "•".yellow(),
            absence.date_range.start.format("%b %-d"),
            absence.date_range.end.format("%b %-d"),
            absence.staff,
            absence.kind
        ));
    }
    for event in &roster.events {
        lines.push(format!(
            "  {} Event {}: {}",
            "•".green(),
            event.date.format("%b %-d"),
            event.title
        ));
    }
    lines
}
