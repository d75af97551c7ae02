use chrono::{NaiveTime, Timelike};
use std::fmt;

use crate::error::WorkerError;
use crate::types::{Prayer, PrayerTimings};

pub const REMINDER_OFFSET_MINUTES: u32 = 5;
const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with the seconds dropped. Displays as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockMinute {
    minutes: u32,
}

impl ClockMinute {
    pub const MIDNIGHT: ClockMinute = ClockMinute { minutes: 0 };

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { minutes: hour * 60 + minute })
        } else {
            None
        }
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Self {
            minutes: time.hour() * 60 + time.minute(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }

    /// Wraps backwards past midnight.
    pub fn minus_minutes(&self, minutes: u32) -> Self {
        let shift = minutes % MINUTES_PER_DAY;
        Self {
            minutes: (self.minutes + MINUTES_PER_DAY - shift) % MINUTES_PER_DAY,
        }
    }

    pub fn is_midnight(&self) -> bool {
        *self == Self::MIDNIGHT
    }
}

impl fmt::Display for ClockMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`. Anything after the first whitespace is a
/// timezone annotation (`05:30 (BST)`) and is ignored.
pub fn parse_timing(raw: &str) -> Result<ClockMinute, WorkerError> {
    let token = raw
        .split_whitespace()
        .next()
        .ok_or_else(|| WorkerError::TimingFormatError(raw.to_string()))?;

    NaiveTime::parse_from_str(token, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M"))
        .map(ClockMinute::from_time)
        .map_err(|_| WorkerError::TimingFormatError(raw.to_string()))
}

pub fn reminder_instant(prayer_time: ClockMinute) -> ClockMinute {
    prayer_time.minus_minutes(REMINDER_OFFSET_MINUTES)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReminder {
    pub prayer: Prayer,
    pub prayer_time: ClockMinute,
    pub remind_at: ClockMinute,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderSchedule {
    pub reminders: Vec<ScheduledReminder>,
    /// Prayer entries whose time could not be parsed, as `(name, raw)`.
    pub malformed: Vec<(String, String)>,
}

impl ReminderSchedule {
    pub fn due_at(&self, now: ClockMinute) -> impl Iterator<Item = &ScheduledReminder> {
        self.reminders.iter().filter(move |r| r.remind_at == now)
    }
}

/// Builds the day's reminder instants for the five prayers. Informational
/// entries are dropped; malformed prayer times are collected, not fatal.
pub fn reminder_schedule(timings: &PrayerTimings) -> ReminderSchedule {
    let mut schedule = ReminderSchedule::default();

    for (name, raw) in timings {
        let Some(prayer) = Prayer::from_name(name) else {
            log::debug!("Ignoring non-prayer timing entry {}", name);
            continue;
        };

        match parse_timing(raw) {
            Ok(prayer_time) => schedule.reminders.push(ScheduledReminder {
                prayer,
                prayer_time,
                remind_at: reminder_instant(prayer_time),
            }),
            Err(e) => {
                log::warn!("Skipping {}: {}", name, e);
                schedule.malformed.push((name.clone(), raw.clone()));
            }
        }
    }

    schedule.reminders.sort_by_key(|r| r.prayer);
    schedule
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ReminderTemplate {
    pub app_url: String,
}

impl ReminderTemplate {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self { app_url: app_url.into() }
    }

    pub fn render(&self, prayer: Prayer) -> ReminderEmail {
        ReminderEmail {
            subject: format!("🕌 Time to Prepare for {}", prayer),
            body: format!(
                "As-salaamu 'alaykum!\n\nIt's almost time for {} prayer. Take a moment to do your Khushoo checklist before standing before Allah.\n\nVisit your Khushoo Coach to prepare now.\n\n🕋 {}",
                prayer, self.app_url
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_and_second_precision_give_same_instant() {
        let a = reminder_instant(parse_timing("05:30").unwrap());
        let b = reminder_instant(parse_timing("05:30:00").unwrap());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "05:25");
    }

    #[test]
    fn seconds_are_truncated() {
        assert_eq!(parse_timing("13:07:59").unwrap().to_string(), "13:07");
    }

    #[test]
    fn timezone_suffix_is_ignored() {
        assert_eq!(parse_timing("05:30 (BST)").unwrap().to_string(), "05:30");
    }

    #[test]
    fn reminder_wraps_past_midnight() {
        let instant = reminder_instant(ClockMinute::new(0, 3).unwrap());
        assert_eq!(instant.to_string(), "23:58");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_timing("soon").is_err());
        assert!(parse_timing("").is_err());
        assert!(parse_timing("25:00").is_err());
    }

    #[test]
    fn schedule_skips_informational_and_malformed_entries() {
        let mut timings = PrayerTimings::new();
        timings.insert("Fajr".into(), "05:30".into());
        timings.insert("Sunrise".into(), "06:45".into());
        timings.insert("Asr".into(), "later".into());

        let schedule = reminder_schedule(&timings);
        assert_eq!(schedule.reminders.len(), 1);
        assert_eq!(schedule.reminders[0].prayer, Prayer::Fajr);
        assert_eq!(schedule.malformed, vec![("Asr".to_string(), "later".to_string())]);
    }
}
