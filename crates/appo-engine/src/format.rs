//! Render day records as the availability report.
//!
//! One line per day that has something to offer:
//!
//! ```text
//! ・6/10 (火) 9:00~12:00、13:00~18:00
//! ・6/11 (水) 終日
//! ・11/3 (月祝) 18:00以降
//! ```
//!
//! A slot ending at or after the late-night cutoff, or exactly at midnight, is
//! written open-ended from its start time.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::holiday::HolidayCalendar;
use crate::slots::{DaySlots, TimeSlot};

pub const LINE_PREFIX: &str = "・";
pub const HOLIDAY_MARKER: &str = "祝";
pub const ALL_DAY_LABEL: &str = "終日";
pub const SLOT_SEPARATOR: &str = "、";
pub const OPEN_ENDED_SUFFIX: &str = "以降";

/// Sunday through Saturday.
pub const WEEKDAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}

/// `H:mm`, hours unpadded.
fn clock(time: NaiveTime) -> String {
    format!("{}:{:02}", time.hour(), time.minute())
}

pub struct ReportFormatter<'a> {
    tz: Tz,
    late_night_cutoff: NaiveTime,
    holidays: &'a dyn HolidayCalendar,
}

impl<'a> ReportFormatter<'a> {
    pub fn new(tz: Tz, late_night_cutoff: NaiveTime, holidays: &'a dyn HolidayCalendar) -> Self {
        Self {
            tz,
            late_night_cutoff,
            holidays,
        }
    }

    /// `日`, or `月祝` on a holiday.
    pub fn day_label(&self, date: NaiveDate) -> String {
        let mut label = weekday_label(date).to_string();
        if self.holidays.is_holiday(date) {
            label.push_str(HOLIDAY_MARKER);
        }
        label
    }

    fn is_open_ended(&self, end: NaiveTime) -> bool {
        end >= self.late_night_cutoff || (end.hour() == 0 && end.minute() == 0)
    }

    /// `H:mm~H:mm`, or `H:mm以降` when the slot runs late.
    pub fn format_slot(&self, slot: &TimeSlot) -> String {
        let start = slot.start.with_timezone(&self.tz).time();
        let end = slot.end.with_timezone(&self.tz).time();

        if self.is_open_ended(end) {
            format!("{}{}", clock(start), OPEN_ENDED_SUFFIX)
        } else {
            format!("{}~{}", clock(start), clock(end))
        }
    }

    /// The report line for `day`, or `None` when it has no availability.
    /// Zero-length slots are ignored.
    pub fn format_day(&self, day: &DaySlots) -> Option<String> {
        if !day.has_availability() {
            return None;
        }
        let content = if day.is_all_day {
            ALL_DAY_LABEL.to_string()
        } else {
            day.slots
                .iter()
                .filter(|slot| !slot.is_empty())
                .map(|slot| self.format_slot(slot))
                .collect::<Vec<_>>()
                .join(SLOT_SEPARATOR)
        };

        Some(format!(
            "{}{}/{} ({}) {}",
            LINE_PREFIX,
            day.date.month(),
            day.date.day(),
            self.day_label(day.date),
            content
        ))
    }

    /// All lines joined with `\n`, in the order given.
    pub fn format_report(&self, days: &[DaySlots]) -> String {
        days.iter()
            .filter_map(|day| self.format_day(day))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
