//! Calendar types for recurring billing
//!
//! This module provides the value types the recurrence engine works with:
//! - Cadence: how often an item recurs (yearly, monthly or daily)
//! - ValidityInterval: when a contract or item is billable
//! - DateRange: the inclusive window covered by one invoice line
//!
//! All of them carry a compact textual codec through `FromStr`/`Display`.

use chrono::{Datelike, Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Textual date form used in contract files (`01.12.2016`)
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Unpadded date form used in human-readable descriptions (`1.12.2016`)
pub const SHORT_DATE_FORMAT: &str = "%-d.%-m.%Y";

/// Date form used by the invoice import (`2016-12-01`)
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_EXPECTED: &str = "a date (dd.mm.yyyy)";

/// Parses a `dd.mm.yyyy` date; one-digit day and month are accepted
pub fn parse_date(raw: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::format(raw, DATE_EXPECTED))
}

/// Formats a date as `dd.mm.yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Moves a date by whole days in either direction
pub fn offset_days(date: NaiveDate, days: i64) -> Result<NaiveDate, CoreError> {
    let moved = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    moved.ok_or_else(|| out_of_range(date))
}

/// Adds years, months and days to a date
///
/// Years and months are applied first; a day of month that does not exist in
/// the target month rolls over into the next one (31 Oct + 1 month = 1 Dec).
/// Days are applied last. Negative components move backwards.
pub fn add_calendar(
    date: NaiveDate,
    years: i64,
    months: i64,
    days: i64,
) -> Result<NaiveDate, CoreError> {
    let total_months = i64::from(date.year()) * 12 + i64::from(date.month0()) + years * 12 + months;
    let year = i32::try_from(total_months.div_euclid(12)).map_err(|_| out_of_range(date))?;
    let month0 = u32::try_from(total_months.rem_euclid(12)).map_err(|_| out_of_range(date))?;

    let first_of_month = NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or_else(|| out_of_range(date))?;
    offset_days(first_of_month, i64::from(date.day0()) + days)
}

fn out_of_range(date: NaiveDate) -> CoreError {
    CoreError::validation(format_date(date), "moves outside the supported calendar range")
}

/// Recurrence period of a billable item
///
/// Exactly one of years, months or days is non-zero. A cadence with all
/// components zero means "inherit the contract cadence".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cadence {
    years: u32,
    months: u32,
    days: u32,
}

impl Cadence {
    /// The all-zero cadence, resolved from the contract when read by an item
    pub const INHERIT: Cadence = Cadence { years: 0, months: 0, days: 0 };

    /// Creates a cadence, rejecting more than one non-zero component
    pub fn new(years: u32, months: u32, days: u32) -> Result<Self, CoreError> {
        let non_zero = [years, months, days].iter().filter(|c| **c != 0).count();
        if non_zero > 1 {
            return Err(CoreError::validation(
                format!("{},{},{}", years, months, days),
                "has more than one non-zero component",
            ));
        }
        Ok(Self { years, months, days })
    }

    pub const fn yearly(years: u32) -> Self {
        Self { years, months: 0, days: 0 }
    }

    pub const fn monthly(months: u32) -> Self {
        Self { years: 0, months, days: 0 }
    }

    pub const fn daily(days: u32) -> Self {
        Self { years: 0, months: 0, days }
    }

    /// Returns true if this cadence defers to the contract default
    pub fn is_inherit(&self) -> bool {
        *self == Self::INHERIT
    }

    /// Returns self unless it is the inherit marker, in which case `default`
    pub fn or(self, default: Cadence) -> Cadence {
        if self.is_inherit() {
            default
        } else {
            self
        }
    }

    /// Moves a date forward by one period
    pub fn advance(&self, date: NaiveDate) -> Result<NaiveDate, CoreError> {
        add_calendar(
            date,
            i64::from(self.years),
            i64::from(self.months),
            i64::from(self.days),
        )
    }

    /// Moves a date backward by one period
    pub fn rewind(&self, date: NaiveDate) -> Result<NaiveDate, CoreError> {
        add_calendar(
            date,
            -i64::from(self.years),
            -i64::from(self.months),
            -i64::from(self.days),
        )
    }
}

impl FromStr for Cadence {
    type Err = CoreError;

    /// Parses the `Y,M,D` form, e.g. `0,1,0` for monthly
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const EXPECTED: &str = "a cadence (years,months,days)";

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(CoreError::format(s, EXPECTED));
        }

        let mut components = [0i64; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| CoreError::format(s, EXPECTED))?;
        }

        if components.iter().any(|c| *c < 0) {
            return Err(CoreError::validation(s, "has a negative component"));
        }
        if components.iter().filter(|c| **c != 0).count() > 1 {
            return Err(CoreError::validation(s, "has more than one non-zero component"));
        }

        let [years, months, days] = components;
        let component = |c: i64| u32::try_from(c).map_err(|_| CoreError::validation(s, "is too large"));
        Cadence::new(component(years)?, component(months)?, component(days)?)
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.years, self.months, self.days)
    }
}

/// When a contract or item may be billed, `[start, end)`
///
/// Either bound may be absent. An item reads absent bounds from its contract.
/// Bounds are not required to be ordered; see [`ValidityInterval::is_ordered`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ValidityInterval {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ValidityInterval {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// An interval with neither bound set
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Fills absent bounds from `defaults`
    pub fn inherit_from(&self, defaults: &ValidityInterval) -> ValidityInterval {
        ValidityInterval {
            start: self.start.or(defaults.start),
            end: self.end.or(defaults.end),
        }
    }

    /// Returns false only when both bounds are set and start is after end
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

impl FromStr for ValidityInterval {
    type Err = CoreError;

    /// Parses `dd.mm.yyyy - dd.mm.yyyy`; either side may be blank and an
    /// empty string is an unbounded interval
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::unbounded());
        }

        let parts: Vec<&str> = s.split('-').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(CoreError::format(s, "an interval (dd.mm.yyyy - dd.mm.yyyy)"));
        }

        let bound = |part: &str| -> Result<Option<NaiveDate>, CoreError> {
            if part.is_empty() {
                Ok(None)
            } else {
                parse_date(part).map(Some)
            }
        };

        Ok(Self {
            start: bound(parts[0])?,
            end: bound(parts[1])?,
        })
    }
}

impl fmt::Display for ValidityInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            return Ok(());
        }
        let start = self.start.map(format_date).unwrap_or_default();
        let end = self.end.map(format_date).unwrap_or_default();
        write!(f, "{} - {}", start, end)
    }
}

/// Inclusive range of days covered by an invoice line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::validation(
                format!("{} - {}", format_date(start), format_date(end)),
                "ends before it starts",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} – {}",
            self.start.format(SHORT_DATE_FORMAT),
            self.end.format(SHORT_DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_accepts_unpadded() {
        assert_eq!(parse_date("1.1.2016").unwrap(), date(2016, 1, 1));
        assert_eq!(parse_date(" 30.11.2016 ").unwrap(), date(2016, 11, 30));
    }

    #[test]
    fn test_add_calendar_rolls_month_overflow() {
        assert_eq!(add_calendar(date(2016, 10, 31), 0, 1, 0).unwrap(), date(2016, 12, 1));
        assert_eq!(add_calendar(date(2016, 2, 29), 1, 0, 0).unwrap(), date(2017, 3, 1));
        assert_eq!(add_calendar(date(2016, 3, 31), 0, -1, 0).unwrap(), date(2016, 3, 2));
    }

    #[test]
    fn test_cadence_round_trip_text() {
        let cadence: Cadence = "0,1,0".parse().unwrap();
        assert_eq!(cadence, Cadence::monthly(1));
        assert_eq!(cadence.to_string(), "0,1,0");
    }

    #[test]
    fn test_interval_empty_is_unbounded() {
        let interval: ValidityInterval = "".parse().unwrap();
        assert!(interval.is_unbounded());
        assert_eq!(interval.to_string(), "");
    }

    #[test]
    fn test_date_range_display() {
        let range = DateRange::new(date(2016, 12, 1), date(2016, 12, 31)).unwrap();
        assert_eq!(range.to_string(), "1.12.2016 – 31.12.2016");
        assert_eq!(range.days(), 31);
    }
}
