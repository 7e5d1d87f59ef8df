use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EngineError, EngineResult};

/// Inclusive date range; a range whose start equals its end covers one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidRange(format!(
                "range end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Day count inclusive of both endpoints; never less than 1.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Inclusive overlap with another range, clamped to zero when disjoint.
    pub fn overlap_days(&self, other: &DateRange) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start > end {
            0
        } else {
            (end - start).num_days() + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.total_days()).map(move |offset| start + Duration::days(offset))
    }
}

/// One calendar month, the grain of billing and accrual rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidInput(format!(
                "month {month} out of range"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid month")
    }

    pub fn last_day(&self) -> NaiveDate {
        self.succ().first_day() - Duration::days(1)
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    pub fn succ(&self) -> MonthKey {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Human-readable label, e.g. "June 2026".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Every month fully or partially overlapping the given range, ascending.
    pub fn span(range: &DateRange) -> Vec<MonthKey> {
        let mut months = Vec::new();
        let mut current = MonthKey::from_date(range.start);
        let last = MonthKey::from_date(range.end);
        while current <= last {
            months.push(current);
            current = current.succ();
        }
        months
    }

    /// `count` consecutive months starting at `start`. A non-positive count is
    /// a contract violation, not a data-quality problem.
    pub fn sequence(start: MonthKey, count: i32) -> EngineResult<Vec<MonthKey>> {
        if count <= 0 {
            return Err(EngineError::InvalidInput(format!(
                "requested month count {count} must be positive"
            )));
        }
        let mut months = Vec::with_capacity(count as usize);
        let mut current = start;
        for _ in 0..count {
            months.push(current);
            current = current.succ();
        }
        Ok(months)
    }

    pub fn parse(key: &str) -> Option<MonthKey> {
        let (year, month) = key.split_once('-')?;
        let year = year.parse().ok()?;
        let month = month.parse().ok()?;
        MonthKey::new(year, month).ok()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MonthKey::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid month key: {raw}")))
    }
}
