//! Extraction settings: markers, thresholds, timezone, and the holiday table.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! available_marker = "アポ可能"
//! blocked_markers = ["★", "⚫︎", "●"]
//! all_day_threshold_hours = 12
//! late_night_cutoff = "23:00"
//! timezone = "Asia/Tokyo"
//! holiday_year = 2025
//! holidays = ["01-01", "01-13"]
//! include_all_day_events = false
//! ```

use std::path::Path;

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::holiday::{HolidayDate, YearHolidays, JAPAN_2025};

pub const DEFAULT_AVAILABLE_MARKER: &str = "アポ可能";
pub const DEFAULT_BLOCKED_MARKERS: [&str; 3] = ["★", "⚫︎", "●"];
pub const DEFAULT_ALL_DAY_THRESHOLD_HOURS: i64 = 12;
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";
pub const DEFAULT_HOLIDAY_YEAR: i32 = 2025;

fn default_late_night_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Substring of title or description that marks an available window.
    pub available_marker: String,
    /// Substrings of the title, any of which marks a blocked event.
    pub blocked_markers: Vec<String>,
    /// Available events at least this long make their date all-day.
    pub all_day_threshold_hours: i64,
    /// Slots ending at or after this local time are reported open-ended.
    #[serde(with = "hhmm")]
    pub late_night_cutoff: NaiveTime,
    /// IANA timezone used for calendar dates and wall-clock times.
    pub timezone: String,
    /// The one year the holiday table is valid for.
    pub holiday_year: i32,
    pub holidays: Vec<HolidayDate>,
    /// Use date-only events, resolved to local midnight. Off by default, in
    /// which case only events with a `dateTime` take part.
    pub include_all_day_events: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            available_marker: DEFAULT_AVAILABLE_MARKER.to_string(),
            blocked_markers: DEFAULT_BLOCKED_MARKERS.iter().map(|m| m.to_string()).collect(),
            all_day_threshold_hours: DEFAULT_ALL_DAY_THRESHOLD_HOURS,
            late_night_cutoff: default_late_night_cutoff(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            holiday_year: DEFAULT_HOLIDAY_YEAR,
            holidays: JAPAN_2025.to_vec(),
            include_all_day_events: false,
        }
    }
}

impl ExtractorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ExtractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ExtractError::Config(e.to_string()))
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// An empty marker would match every event, so it is refused along with
    /// non-positive thresholds and unknown timezones.
    pub fn validate(&self) -> Result<()> {
        if self.available_marker.is_empty() {
            return Err(ExtractError::Config(
                "available_marker must not be empty".to_string(),
            ));
        }
        if self.blocked_markers.iter().any(|m| m.is_empty()) {
            return Err(ExtractError::Config(
                "blocked_markers must not contain empty strings".to_string(),
            ));
        }
        if self.all_day_threshold_hours <= 0 {
            return Err(ExtractError::Config(format!(
                "all_day_threshold_hours must be positive, got {}",
                self.all_day_threshold_hours
            )));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| ExtractError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn all_day_threshold(&self) -> Duration {
        Duration::hours(self.all_day_threshold_hours)
    }

    pub fn holiday_table(&self) -> YearHolidays {
        YearHolidays::new(self.holiday_year, self.holidays.iter().copied())
    }
}

/// `HH:MM` wall-clock times.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}
