//! Week key resolution.
//!
//! A week is named by the calendar date of the Monday that begins it. The
//! date is taken in the timestamp's own calendar: no timezone normalization
//! happens, so two subjects in different offsets can land on different weeks
//! for the same instant.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use std::fmt;

use crate::domain::errors::{DomainError, DomainResult};

const WEEK_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical identifier of a Monday-start calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Resolve the week containing `at`, in `at`'s local calendar.
    pub fn resolve<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::containing(at.date_naive())
    }

    /// Week containing the current local date.
    pub fn current() -> Self {
        Self::resolve(&Local::now())
    }

    /// Week containing a calendar date. Sunday belongs to the week that
    /// started six days earlier.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday();
        Self(date - Duration::days(i64::from(offset)))
    }

    /// Parse a stored `YYYY-MM-DD` key. The date must be a Monday.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let date = NaiveDate::parse_from_str(s, WEEK_KEY_FORMAT)
            .map_err(|e| DomainError::ValidationFailed(format!("Invalid week key '{s}': {e}")))?;

        let key = Self::containing(date);
        if key.0 != date {
            return Err(DomainError::ValidationFailed(format!(
                "Week key '{s}' is a {:?}, expected a Monday",
                date.weekday()
            )));
        }
        Ok(key)
    }

    pub fn monday(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WEEK_KEY_FORMAT))
    }
}
