//! Reporting windows: semantic selectors and the concrete ranges they map to.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Semantic range selector offered to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
        TimeRange::All,
    ];

    /// Parses a selector, falling back to [`TimeRange::Month`] for anything
    /// unrecognized.
    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Quarter => "quarter",
            TimeRange::Year => "year",
            TimeRange::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "Week",
            TimeRange::Month => "Month",
            TimeRange::Quarter => "Quarter",
            TimeRange::Year => "Year",
            TimeRange::All => "All Time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTimeRange(pub String);

impl fmt::Display for UnknownTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown time range `{}`", self.0)
    }
}

impl std::error::Error for UnknownTimeRange {}

impl FromStr for TimeRange {
    type Err = UnknownTimeRange;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            other => Err(UnknownTimeRange(other.to_string())),
        }
    }
}

/// Inclusive `[start, end]` instant pair used to filter transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DateRangeError> {
        if end < start {
            return Err(DateRangeError::EndBeforeStart);
        }
        Ok(Self { start, end })
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeError {
    EndBeforeStart,
}

impl fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRangeError::EndBeforeStart => f.write_str("date range end must not precede start"),
        }
    }
}

impl std::error::Error for DateRangeError {}

/// Maps a selector to concrete bounds anchored at `now`.
///
/// `month` is calendar aligned; `quarter` and `year` are rolling windows that
/// end at `now`. Calendar subtraction clamps to the last valid day.
pub fn resolve(selector: TimeRange, now: DateTime<Utc>) -> DateRange {
    match selector {
        TimeRange::Week => DateRange {
            start: now
                .checked_sub_signed(Duration::days(7))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: now,
        },
        TimeRange::Month => month_bounds(now),
        TimeRange::Quarter => DateRange {
            start: months_before(now, 3),
            end: now,
        },
        TimeRange::Year => DateRange {
            start: months_before(now, 12),
            end: now,
        },
        TimeRange::All => DateRange {
            start: DateTime::<Utc>::MIN_UTC,
            end: now,
        },
    }
}

/// First and last instant of the calendar month containing `now`.
///
/// In the last representable month the end clamps to `MAX_UTC`.
pub fn month_bounds(now: DateTime<Utc>) -> DateRange {
    let first = first_of_month(now.year(), now.month());
    let start = midnight(first);
    let end = first
        .checked_add_months(Months::new(1))
        .and_then(|next| midnight(next).checked_sub_signed(Duration::nanoseconds(1)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    DateRange { start, end }
}

fn months_before(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}
