//! Calendar events as delivered by the event source.
//!
//! The wire shape follows the Google Calendar API: `summary` (read as the
//! title), an optional `description`, and `start`/`end` objects holding either
//! a `dateTime` (RFC 3339) or an all-day `date`. Fields the engine does not use
//! are ignored. Start and end are kept optional because the source may omit or
//! garble them; such events are skipped during extraction instead of failing
//! the whole batch.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::slots::TimeSlot;

/// Either a precise instant or an all-day calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    At(DateTime<Utc>),
    AllDay(NaiveDate),
}

impl EventTime {
    /// The instant this time denotes in `tz`. All-day dates resolve to local
    /// midnight.
    pub fn resolve(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            EventTime::At(instant) => Some(*instant),
            EventTime::AllDay(date) => tz
                .from_local_datetime(&date.and_time(NaiveTime::MIN))
                .earliest()
                .map(|local| local.with_timezone(&Utc)),
        }
    }

    /// The local calendar date this time falls on in `tz`.
    pub fn local_date(&self, tz: &Tz) -> NaiveDate {
        match self {
            EventTime::At(instant) => instant.with_timezone(tz).date_naive(),
            EventTime::AllDay(date) => *date,
        }
    }
}

/// Wire form of [`EventTime`]: `{"dateTime": ...}` or `{"date": ...}`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

impl RawEventTime {
    fn parse(&self) -> Option<EventTime> {
        if let Some(raw) = &self.date_time {
            return match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Some(EventTime::At(dt.with_timezone(&Utc))),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "unparseable event dateTime");
                    None
                }
            };
        }
        let raw = self.date.as_ref()?;
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(EventTime::AllDay(date)),
            Err(e) => {
                tracing::warn!(value = %raw, error = %e, "unparseable event date");
                None
            }
        }
    }
}

impl From<&EventTime> for RawEventTime {
    fn from(time: &EventTime) -> Self {
        match time {
            EventTime::At(instant) => Self {
                date_time: Some(instant.to_rfc3339()),
                date: None,
            },
            EventTime::AllDay(date) => Self {
                date_time: None,
                date: Some(date.format("%Y-%m-%d").to_string()),
            },
        }
    }
}

impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawEventTime::from(self).serialize(serializer)
    }
}

/// Deserialize an optional event time, mapping anything unusable to `None`.
fn lenient_event_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<EventTime>, D::Error> {
    let raw = Option::<RawEventTime>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.parse()))
}

/// A single calendar event occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, alias = "summary")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_event_time")]
    pub start: Option<EventTime>,
    #[serde(default, deserialize_with = "lenient_event_time")]
    pub end: Option<EventTime>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            start: Some(start),
            end: Some(end),
        }
    }

    /// A timed event from two RFC 3339 strings.
    pub fn timed(
        title: impl Into<String>,
        start: &str,
        end: &str,
    ) -> Result<Self, chrono::ParseError> {
        let start = DateTime::parse_from_rfc3339(start)?.with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339(end)?.with_timezone(&Utc);
        Ok(Self::new(title, EventTime::At(start), EventTime::At(end)))
    }

    /// An all-day event covering `start` up to (not including) `end`.
    pub fn all_day(title: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(title, EventTime::AllDay(start), EventTime::AllDay(end))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The event's interval in `tz`, or `None` when the start or end is
    /// missing or the interval is empty.
    pub fn interval(&self, tz: &Tz) -> Option<TimeSlot> {
        let start = self.start?.resolve(tz)?;
        let end = self.end?.resolve(tz)?;
        let slot = TimeSlot::new(start, end);
        (!slot.is_empty()).then_some(slot)
    }

    /// Whether either end is a date-only value.
    pub fn is_all_day(&self) -> bool {
        matches!(self.start, Some(EventTime::AllDay(_)))
            || matches!(self.end, Some(EventTime::AllDay(_)))
    }

    /// The local calendar date the event starts on.
    pub fn start_date(&self, tz: &Tz) -> Option<NaiveDate> {
        self.start.map(|start| start.local_date(tz))
    }
}
