use crate::utils::error::{HoyError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TIMEZONE: &str = "America/Bogota";
pub const TARGET_MONTH: &str = "07";
pub const TARGET_DAY: &str = "20";

/// Civil date as observed in a specific timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from)
            .ok_or_else(|| HoyError::InvalidCalendarDate {
                value: format!("{:04}-{:02}-{:02}", year, month, day),
            })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = HoyError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::from)
            .map_err(|_| HoyError::InvalidCalendarDate {
                value: s.to_string(),
            })
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Recurring (month, day) that triggers the celebration, independent of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDate {
    month: u32,
    day: u32,
}

impl TargetDate {
    pub fn new(month: u32, day: u32) -> Result<Self> {
        // 2000 is a leap year, so Feb 29 is accepted.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(HoyError::InvalidTargetDate { month, day });
        }
        Ok(Self { month, day })
    }

    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }

    pub fn day_str(&self) -> String {
        format!("{:02}", self.day)
    }

    pub fn matches(&self, date: &CalendarDate) -> bool {
        date.month == self.month && date.day == self.day
    }
}

impl Default for TargetDate {
    fn default() -> Self {
        Self { month: 7, day: 20 }
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeOverride {
    ForcedYes,
    ForcedNo,
    #[default]
    Absent,
}

impl ModeOverride {
    pub fn forced(&self) -> Option<bool> {
        match self {
            ModeOverride::ForcedYes => Some(true),
            ModeOverride::ForcedNo => Some(false),
            ModeOverride::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Override,
    Calendar,
}

/// Decision plus the single date resolution it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub celebrate: bool,
    pub calendar_date: CalendarDate,
    pub timezone: String,
    pub mode_override: ModeOverride,
    pub source: DecisionSource,
}
