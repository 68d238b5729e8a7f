//! Request handling around the core pipeline.
//!
//! [`handle_extract`] checks the caller session, validates the requested date
//! range, asks an [`EventSource`] for the events in that range, and runs the
//! extraction. Authentication and fetching are the collaborators' business;
//! this module only fixes the seams and maps failures onto response
//! categories:
//!
//! | failure                    | status         | body                                  |
//! |----------------------------|----------------|---------------------------------------|
//! | no session / empty token   | `Unauthorized` | `{"error":"Unauthorized"}`            |
//! | missing or bad date range  | `BadRequest`   | `{"error":"Invalid dates"}`           |
//! | fetch, config, other       | `ServerError`  | `{"error":"Failed to extract appointments"}` |

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::event::CalendarEvent;
use crate::extract::{Extraction, Extractor};
use crate::slots::DaySlots;

/// Response category, with the HTTP status a transport would use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Ok,
    Unauthorized,
    BadRequest,
    ServerError,
}

impl ResponseStatus {
    pub fn code(self) -> u16 {
        match self {
            ResponseStatus::Ok => 200,
            ResponseStatus::Unauthorized => 401,
            ResponseStatus::BadRequest => 400,
            ResponseStatus::ServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        self == ResponseStatus::Ok
    }
}

/// The incoming request body: `{"startDate": "2025-06-09", "endDate": "2025-06-15"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ExtractRequest {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    pub fn validate(&self) -> Result<DateRange> {
        let start = required(self.start_date.as_deref(), "startDate")?;
        let end = required(self.end_date.as_deref(), "endDate")?;
        DateRange::parse(start, end)
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ExtractError::InvalidDateRange(format!("{} is required", field))),
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ExtractError::InvalidDateRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// From 00:00:00.000 on the first day to 23:59:59.999 on the last, local
    /// to `tz`.
    pub fn fetch_window(&self, tz: Tz) -> Result<FetchWindow> {
        let time_min = local_instant(tz, self.start, NaiveTime::MIN)?;
        let next_day = self
            .end
            .succ_opt()
            .ok_or_else(|| ExtractError::InvalidDateRange(format!("{} has no next day", self.end)))?;
        let time_max = local_instant(tz, next_day, NaiveTime::MIN)? - Duration::milliseconds(1);

        Ok(FetchWindow {
            time_min,
            time_max,
            tz,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        ExtractError::InvalidDateRange(format!("'{}' is not a YYYY-MM-DD date: {}", raw, e))
    })
}

fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            ExtractError::InvalidDateRange(format!("{} {} does not exist in {}", date, time, tz))
        })
}

/// The instants an event source is asked to cover, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    /// Timezone used to resolve all-day event dates.
    pub tz: Tz,
}

impl FetchWindow {
    /// Whether `event` overlaps the window. Events without a start are kept so
    /// the pipeline can skip them itself; events without a usable end count
    /// as instants.
    pub fn contains(&self, event: &CalendarEvent) -> bool {
        let Some(start) = event.start.and_then(|s| s.resolve(&self.tz)) else {
            return true;
        };
        let end = event.end.and_then(|e| e.resolve(&self.tz));

        match end {
            Some(end) if end > start => start <= self.time_max && end > self.time_min,
            _ => start >= self.time_min && start <= self.time_max,
        }
    }
}

/// The authenticated caller, as established by the session collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerSession {
    pub access_token: Option<String>,
}

impl CallerSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Where events come from. Implementations own timeouts and retries.
pub trait EventSource {
    /// Single occurrences overlapping `window`, in the source's order.
    fn fetch_events(&self, session: &CallerSession, window: &FetchWindow) -> Result<Vec<CalendarEvent>>;
}

/// An in-memory source: the events overlapping the window, in order.
impl EventSource for [CalendarEvent] {
    fn fetch_events(&self, _session: &CallerSession, window: &FetchWindow) -> Result<Vec<CalendarEvent>> {
        Ok(self.iter().filter(|e| window.contains(e)).cloned().collect())
    }
}

impl EventSource for Vec<CalendarEvent> {
    fn fetch_events(&self, session: &CallerSession, window: &FetchWindow) -> Result<Vec<CalendarEvent>> {
        self.as_slice().fetch_events(session, window)
    }
}

/// The response body: `{"success":true,"formatted":...,"raw":[...]}` or
/// `{"error":...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractResponse {
    Success {
        success: bool,
        formatted: String,
        raw: Vec<DaySlots>,
    },
    Failure {
        error: String,
    },
}

impl ExtractResponse {
    pub fn failure(error: &ExtractError) -> Self {
        ExtractResponse::Failure {
            error: error.public_message().to_string(),
        }
    }
}

impl From<Extraction> for ExtractResponse {
    fn from(extraction: Extraction) -> Self {
        ExtractResponse::Success {
            success: true,
            formatted: extraction.formatted,
            raw: extraction.raw,
        }
    }
}

fn run_extract<S>(
    session: Option<&CallerSession>,
    request: &ExtractRequest,
    source: &S,
    config: &ExtractorConfig,
) -> Result<Extraction>
where
    S: EventSource + ?Sized,
{
    let session = session
        .filter(|s| s.is_authenticated())
        .ok_or(ExtractError::Unauthenticated)?;
    let range = request.validate()?;

    let extractor = Extractor::new(config.clone())?;
    let window = range.fetch_window(config.tz()?)?;
    let events = source.fetch_events(session, &window)?;
    tracing::debug!(
        start = %range.start,
        end = %range.end,
        events = events.len(),
        "fetched events"
    );

    Ok(extractor.extract(&events))
}

/// Authenticate, validate, fetch and extract.
pub fn handle_extract<S>(
    session: Option<&CallerSession>,
    request: &ExtractRequest,
    source: &S,
    config: &ExtractorConfig,
) -> (ResponseStatus, ExtractResponse)
where
    S: EventSource + ?Sized,
{
    match run_extract(session, request, source, config) {
        Ok(extraction) => (ResponseStatus::Ok, extraction.into()),
        Err(e) => {
            let status = e.status();
            if status == ResponseStatus::ServerError {
                tracing::error!(error = %e, "calendar extraction failed");
            } else {
                tracing::warn!(error = %e, "extraction request rejected");
            }
            (status, ExtractResponse::failure(&e))
        }
    }
}
