//! Wall-clock departure times.
//!
//! The arrivals API provides times as "HH:MM" strings with no date. A board
//! that spans midnight therefore has to decide which calendar day each time
//! belongs to before it can order them. This module anchors a bare clock
//! time to a concrete date relative to "now".

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Trains before this hour belong to the previous day's late-night service.
const SERVICE_DAY_START_HOUR: u32 = 4;

/// From this hour on, the board is showing the evening service.
const EVENING_START_HOUR: u32 = 18;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day as printed on the board, without a date.
///
/// # Examples
///
/// ```
/// use board_server::board::ClockTime;
///
/// let time = ClockTime::parse_hhmm("23:50").unwrap();
/// assert_eq!(time.hour(), 23);
/// assert_eq!(time.to_string(), "23:50");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    time: NaiveTime,
}

impl ClockTime {
    /// Parse a time from "HH:MM" format. A single-digit hour is accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use board_server::board::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    /// assert!(ClockTime::parse_hhmm("9:05").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("0905").is_err());
    /// assert!(ClockTime::parse_hhmm("09:5").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// assert!(ClockTime::parse_hhmm("--:--").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let (hours, minutes) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        let hour = parse_digits(hours.as_bytes(), 1..=2)
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_digits(minutes.as_bytes(), 2..=2)
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time"))?;

        Ok(Self { time })
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    /// Place this clock time on a calendar day relative to `now`.
    ///
    /// The time is assumed to be today, except:
    /// - between midnight and 04:00, times from 18:00 on are yesterday's
    ///   evening service;
    /// - from 18:00 on, times before 04:00 are tonight's late-night service,
    ///   which falls on tomorrow's date.
    ///
    /// # Examples
    ///
    /// ```
    /// use board_server::board::ClockTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let now = date.and_hms_opt(22, 0, 0).unwrap();
    ///
    /// let late = ClockTime::parse_hhmm("00:30").unwrap().anchor(now);
    /// assert_eq!(late.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    /// ```
    pub fn anchor(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        let now_hour = now.hour();

        let date = if now_hour < SERVICE_DAY_START_HOUR && self.hour() >= EVENING_START_HOUR {
            today.pred_opt().unwrap_or(today)
        } else if now_hour >= EVENING_START_HOUR && self.hour() < SERVICE_DAY_START_HOUR {
            today.succ_opt().unwrap_or(today)
        } else {
            today
        };

        date.and_time(self.time)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse a run of ASCII digits whose length falls in `len`.
fn parse_digits(bytes: &[u8], len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&bytes.len()) {
        return None;
    }
    bytes.iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char).to_digit(10)?;
        Some(acc * 10 + digit)
    })
}
