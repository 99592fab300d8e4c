use std::fmt;
use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::weekday::Weekday;

/// A calendar date as perceived in some local zone, with no time-of-day and no offset.
///
/// Advancing a `CivilDate` is always "next calendar day", so clock irregularities
/// in the zone the date came from (DST shifts, offset changes) never skip or
/// repeat a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CivilDate(NaiveDate);

impl CivilDate {
    pub const MIN: CivilDate = CivilDate(NaiveDate::MIN);
    pub const MAX: CivilDate = CivilDate(NaiveDate::MAX);

    /// Returns `None` for dates that do not exist (e.g. February 30th).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a zero-padded `YYYY-MM-DD` date. Shorter forms like `2024-1-5` are rejected.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();
        if trimmed.len() != 10 {
            return Err(CoreError::DateFormat(s.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|source| CoreError::DateParse {
                value: s.to_string(),
                source,
            })
    }

    /// The civil date of a zoned timestamp, as seen on a wall calendar in that zone.
    pub fn from_zoned<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self(timestamp.date_naive())
    }

    /// Today in the system's local zone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Today in the given IANA zone.
    pub fn today_in(tz: chrono_tz::Tz) -> Self {
        Self::from_zoned(&Utc::now().with_timezone(&tz))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday().into()
    }

    /// The next calendar day, or `None` past [`CivilDate::MAX`].
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// `n` calendar days later, or `None` if that leaves the representable range.
    pub fn add_days(self, n: u64) -> Option<Self> {
        self.0.checked_add_days(chrono::Days::new(n)).map(Self)
    }

    /// Signed number of calendar days from `self` to `other`.
    pub fn days_until(self, other: CivilDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Every calendar day in the inclusive range `[self, end]`. Empty if `end < self`.
    pub fn days_through(self, end: CivilDate) -> DateRange {
        DateRange {
            next: (self <= end).then_some(self),
            end,
        }
    }

    pub fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CivilDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Lazy inclusive walk over calendar days. Holds only the cursor.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<CivilDate>,
    end: CivilDate,
}

impl Iterator for DateRange {
    type Item = CivilDate;

    fn next(&mut self) -> Option<CivilDate> {
        let current = self.next?;
        self.next = current.succ().filter(|next| *next <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|next| next.days_until(self.end) as usize + 1)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

impl FusedIterator for DateRange {}
