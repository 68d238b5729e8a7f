//! Group available events into per-date day records.
//!
//! Each event is keyed by the local date it starts on. An event lasting at
//! least the all-day threshold flags its date as all-day; once set, the flag
//! stays set for that date no matter which events follow. Shorter events are
//! appended to the date's slot list in input order.

use chrono::Duration;
use chrono_tz::Tz;

use crate::event::CalendarEvent;
use crate::slots::{DayMap, DaySlots};

pub fn bucketize(available: &[&CalendarEvent], tz: &Tz, all_day_threshold: Duration) -> DayMap {
    let mut days = DayMap::new();

    for event in available {
        let Some(slot) = event.interval(tz) else {
            tracing::warn!(title = %event.title, "skipping available event without a usable start and end");
            continue;
        };

        let date = slot.start.with_timezone(tz).date_naive();
        let day = days.entry(date).or_insert_with(|| DaySlots::new(date));

        if slot.duration() >= all_day_threshold {
            day.is_all_day = true;
        } else {
            day.slots.push(slot);
        }
    }

    tracing::debug!(days = days.len(), "bucketized available events");
    days
}
