//! Demote all-day days that have something blocked on them.
//!
//! A demoted day loses whatever partial slot list the bucketizer left and is
//! rebuilt from the full interval of every available event starting on that
//! date, the long event included. Subtraction then carves the blocked time out.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::event::CalendarEvent;
use crate::slots::{DayMap, TimeSlot};

/// Whether any blocked event starts on `date`. Only the start is needed.
pub fn has_blocked_on(date: NaiveDate, blocked: &[&CalendarEvent], tz: &Tz) -> bool {
    blocked.iter().any(|event| event.start_date(tz) == Some(date))
}

/// The full intervals of the available events starting on `date`.
pub fn available_on(date: NaiveDate, available: &[&CalendarEvent], tz: &Tz) -> Vec<TimeSlot> {
    available
        .iter()
        .filter(|event| event.start_date(tz) == Some(date))
        .filter_map(|event| event.interval(tz))
        .collect()
}

pub fn resolve_all_day(
    days: &mut DayMap,
    available: &[&CalendarEvent],
    blocked: &[&CalendarEvent],
    tz: &Tz,
) {
    for (date, day) in days.iter_mut() {
        if !day.is_all_day || !has_blocked_on(*date, blocked, tz) {
            continue;
        }

        day.is_all_day = false;
        day.slots = available_on(*date, available, tz);
        tracing::debug!(%date, slots = day.slots.len(), "demoted all-day date with blocked events");
    }
}
