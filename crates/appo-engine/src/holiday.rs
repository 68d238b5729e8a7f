//! Year-scoped holiday lookup.
//!
//! The formatter only asks one question of a holiday source: is this date a
//! holiday? [`HolidayCalendar`] is that seam. [`YearHolidays`] answers it from
//! a fixed `(month, day)` table that is valid for exactly one year; dates in
//! any other year are never holidays, even when the month and day match.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// A source of holiday information.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

impl<F> HolidayCalendar for F
where
    F: Fn(NaiveDate) -> bool,
{
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self(date)
    }
}

/// A calendar without holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// A month/day pair, written as `MM-DD` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HolidayDate {
    pub month: u32,
    pub day: u32,
}

impl HolidayDate {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    fn matches(&self, date: NaiveDate) -> bool {
        self.month == date.month() && self.day == date.day()
    }
}

impl fmt::Display for HolidayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl TryFrom<String> for HolidayDate {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let invalid = || format!("invalid holiday '{}', expected MM-DD", raw);
        let (month, day) = raw.split_once('-').ok_or_else(invalid)?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let day: u32 = day.trim().parse().map_err(|_| invalid())?;
        // 2000 is a leap year, so Feb 29 is accepted here.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(invalid());
        }
        Ok(Self { month, day })
    }
}

impl From<HolidayDate> for String {
    fn from(date: HolidayDate) -> Self {
        date.to_string()
    }
}

/// Japanese national holidays for 2025.
pub const JAPAN_2025: [HolidayDate; 16] = [
    HolidayDate::new(1, 1),   // New Year's Day
    HolidayDate::new(1, 13),  // Coming of Age Day
    HolidayDate::new(2, 11),  // National Foundation Day
    HolidayDate::new(2, 23),  // Emperor's Birthday
    HolidayDate::new(3, 20),  // Vernal Equinox Day
    HolidayDate::new(4, 29),  // Showa Day
    HolidayDate::new(5, 3),   // Constitution Memorial Day
    HolidayDate::new(5, 4),   // Greenery Day
    HolidayDate::new(5, 5),   // Children's Day
    HolidayDate::new(7, 21),  // Marine Day
    HolidayDate::new(8, 11),  // Mountain Day
    HolidayDate::new(9, 15),  // Respect for the Aged Day
    HolidayDate::new(9, 23),  // Autumnal Equinox Day
    HolidayDate::new(10, 13), // Sports Day
    HolidayDate::new(11, 3),  // Culture Day
    HolidayDate::new(11, 23), // Labour Thanksgiving Day
];

/// A holiday table valid for a single year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearHolidays {
    year: i32,
    dates: Vec<HolidayDate>,
}

impl YearHolidays {
    pub fn new(year: i32, dates: impl IntoIterator<Item = HolidayDate>) -> Self {
        Self {
            year,
            dates: dates.into_iter().collect(),
        }
    }

    pub fn japan_2025() -> Self {
        Self::new(2025, JAPAN_2025)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn dates(&self) -> &[HolidayDate] {
        &self.dates
    }
}

impl HolidayCalendar for YearHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        date.year() == self.year && self.dates.iter().any(|h| h.matches(date))
    }
}
