//! Remove blocked intervals from available intervals.
//!
//! Each available slot starts as a single candidate. Every blocked slot is
//! applied in input order to every surviving candidate, which it either keeps,
//! drops, trims on one side, or splits in two. Results are concatenated in
//! encounter order; they are neither re-sorted nor merged.
//!
//! Cost is `O(available × blocked)` per day, both of which are bounded by a
//! single day's events.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::event::CalendarEvent;
use crate::slots::{DayMap, TimeSlot};

/// Apply one blocked slot to one candidate, pushing what survives.
fn cut(candidate: TimeSlot, blocked: &TimeSlot, out: &mut Vec<TimeSlot>) {
    // No overlap; touching endpoints do not count.
    if blocked.end <= candidate.start || blocked.start >= candidate.end {
        out.push(candidate);
        return;
    }

    let covers_left = blocked.start <= candidate.start;
    let covers_right = blocked.end >= candidate.end;

    match (covers_left, covers_right) {
        // Fully covered.
        (true, true) => {}
        // Left edge.
        (true, false) => out.push(TimeSlot::new(blocked.end, candidate.end)),
        // Right edge.
        (false, true) => out.push(TimeSlot::new(candidate.start, blocked.start)),
        // Strictly inside.
        (false, false) => {
            out.push(TimeSlot::new(candidate.start, blocked.start));
            out.push(TimeSlot::new(blocked.end, candidate.end));
        }
    }
}

/// The free remainder of `available` after removing every slot in `blocked`.
pub fn subtract_slot(available: TimeSlot, blocked: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut candidates = vec![available];

    for b in blocked {
        let mut next = Vec::with_capacity(candidates.len() + 1);
        for candidate in candidates {
            cut(candidate, b, &mut next);
        }
        candidates = next;
    }

    candidates
}

/// [`subtract_slot`] for each available slot, concatenated in input order.
pub fn subtract_slots(available: &[TimeSlot], blocked: &[TimeSlot]) -> Vec<TimeSlot> {
    available
        .iter()
        .flat_map(|slot| subtract_slot(*slot, blocked))
        .collect()
}

/// Intervals of the blocked events starting on the given local date.
fn blocked_slots_on(date: NaiveDate, blocked: &[&CalendarEvent], tz: &Tz) -> Vec<TimeSlot> {
    blocked
        .iter()
        .filter_map(|event| event.interval(tz))
        .filter(|slot| slot.start.with_timezone(tz).date_naive() == date)
        .collect()
}

/// Carve each non-all-day day's blocked time out of its slots.
pub fn subtract_blocked(days: &mut DayMap, blocked: &[&CalendarEvent], tz: &Tz) {
    for (date, day) in days.iter_mut() {
        if day.is_all_day || day.slots.is_empty() {
            continue;
        }

        let busy = blocked_slots_on(*date, blocked, tz);
        if busy.is_empty() {
            continue;
        }
        day.slots = subtract_slots(&day.slots, &busy);
        tracing::debug!(%date, blocked = busy.len(), remaining = day.slots.len(), "subtracted blocked time");
    }
}
