//! # appo-engine
//!
//! Deterministic extraction of "available for appointment" windows from a
//! calendar.
//!
//! Events whose title or description carries the availability marker become
//! candidate windows; events whose title carries a blocked marker are carved
//! out of them. Candidate windows long enough to count as all-day are reported
//! as a whole day unless something is blocked on that date. The result is a
//! compact per-day text report plus the structured day records behind it.
//!
//! ```rust
//! use appo_engine::{extract_availability, CalendarEvent, ExtractorConfig};
//!
//! let events = vec![
//!     CalendarEvent::timed("アポ可能", "2025-06-10T09:00:00+09:00", "2025-06-10T18:00:00+09:00").unwrap(),
//!     CalendarEvent::timed("★ 打ち合わせ", "2025-06-10T12:00:00+09:00", "2025-06-10T13:00:00+09:00").unwrap(),
//! ];
//! let extraction = extract_availability(&events, &ExtractorConfig::default()).unwrap();
//! assert_eq!(extraction.formatted, "・6/10 (火) 9:00~12:00、13:00~18:00");
//! ```
//!
//! ## Modules
//!
//! - [`classifier`]: Split events into available and blocked sets by marker
//! - [`bucketizer`]: Group available events into per-date day records
//! - [`resolver`]: Demote all-day days that have blocked events
//! - [`subtract`]: Remove blocked intervals from available intervals
//! - [`format`]: Render day records as the text report
//! - [`holiday`]: Year-scoped holiday lookup
//! - [`extract`]: The full pipeline
//! - [`request`]: Request validation, event source seam, response shapes
//! - [`config`]: Markers, thresholds, timezone, holiday table
//! - [`error`]: Error types

pub mod bucketizer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod format;
pub mod holiday;
pub mod request;
pub mod resolver;
pub mod slots;
pub mod subtract;

pub use classifier::{classify, Classification};
pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use event::{CalendarEvent, EventTime};
pub use extract::{extract_availability, Extraction, Extractor};
pub use format::ReportFormatter;
pub use holiday::{HolidayCalendar, HolidayDate, YearHolidays};
pub use request::{
    handle_extract, CallerSession, DateRange, EventSource, ExtractRequest, ExtractResponse,
    FetchWindow, ResponseStatus,
};
pub use slots::{DayMap, DaySlots, TimeSlot};
pub use subtract::{subtract_slot, subtract_slots};
