//! The extraction pipeline.
//!
//! classify → bucketize → resolve all-day → subtract → format. Every call
//! builds its own day map and keeps nothing once it returns.

use chrono_tz::Tz;
use serde::Serialize;

use crate::bucketizer::bucketize;
use crate::classifier::classify;
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::event::CalendarEvent;
use crate::format::ReportFormatter;
use crate::holiday::HolidayCalendar;
use crate::resolver::resolve_all_day;
use crate::slots::DaySlots;
use crate::subtract::subtract_blocked;

/// The report text and the day records it was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub formatted: String,
    /// Every day that had an available event, ascending by date, including
    /// days whose slots were subtracted away.
    pub raw: Vec<DaySlots>,
}

/// A configured pipeline. Reusable across calls.
pub struct Extractor {
    config: ExtractorConfig,
    tz: Tz,
    holidays: Box<dyn HolidayCalendar>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("config", &self.config)
            .field("tz", &self.tz)
            .finish_non_exhaustive()
    }
}

impl Extractor {
    /// Validates `config` and uses its holiday table.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let tz = config.tz()?;
        let holidays = Box::new(config.holiday_table());
        Ok(Self {
            config,
            tz,
            holidays,
        })
    }

    /// Replace the configured holiday table with another source.
    pub fn with_holidays(mut self, holidays: impl HolidayCalendar + 'static) -> Self {
        self.holidays = Box::new(holidays);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Per-day availability, ascending by date, before formatting.
    pub fn compute_days(&self, events: &[CalendarEvent]) -> Vec<DaySlots> {
        let classification = classify(events, &self.config);

        let mut days = bucketize(
            &classification.available,
            &self.tz,
            self.config.all_day_threshold(),
        );
        resolve_all_day(
            &mut days,
            &classification.available,
            &classification.blocked,
            &self.tz,
        );
        subtract_blocked(&mut days, &classification.blocked, &self.tz);

        days.into_values().collect()
    }

    pub fn formatter(&self) -> ReportFormatter<'_> {
        ReportFormatter::new(
            self.tz,
            self.config.late_night_cutoff,
            self.holidays.as_ref(),
        )
    }

    pub fn extract(&self, events: &[CalendarEvent]) -> Extraction {
        let raw = self.compute_days(events);
        let formatted = self.formatter().format_report(&raw);
        Extraction { formatted, raw }
    }
}

/// One-shot extraction with `config`'s own holiday table.
pub fn extract_availability(events: &[CalendarEvent], config: &ExtractorConfig) -> Result<Extraction> {
    Ok(Extractor::new(config.clone())?.extract(events))
}
