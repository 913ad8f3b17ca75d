//! Wall-clock access.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of the server's local wall-clock time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the operating system clock in the server's local timezone.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Copy, Clone)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// First instant of the calendar month containing `now` (day 1, 00:00:00.000000).
pub fn start_of_month(now: NaiveDateTime) -> NaiveDateTime {
    let date = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or(now.date());
    date.and_time(NaiveTime::MIN)
}
