use chrono::{Local, Timelike};
use std::sync::Mutex;
use std::time::Duration;

use crate::types::ClockMinute;

pub trait Clock: Send + Sync {
    fn now(&self) -> ClockMinute;

    /// Time left until the wall clock reaches the next `:00` second.
    fn until_next_minute(&self) -> Duration {
        Duration::ZERO
    }
}

/// Local wall-clock time of the worker process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> ClockMinute {
        ClockMinute::from_time(Local::now().time())
    }

    fn until_next_minute(&self) -> Duration {
        let time = Local::now().time();
        // nanosecond() exceeds 1e9 during a leap second.
        let elapsed = Duration::from_secs(u64::from(time.second()))
            + Duration::from_nanos(u64::from(time.nanosecond().min(999_999_999)));
        Duration::from_secs(60).saturating_sub(elapsed)
    }
}

/// A clock that reads whatever it was last set to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<ClockMinute>,
}

impl ManualClock {
    pub fn new(at: ClockMinute) -> Self {
        Self { current: Mutex::new(at) }
    }

    pub fn set(&self, at: ClockMinute) {
        match self.current.lock() {
            Ok(mut current) => *current = at,
            Err(poisoned) => *poisoned.into_inner() = at,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> ClockMinute {
        match self.current.lock() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
