use crate::types::{ClockMinute, Prayer};
use std::collections::HashMap;

/// Reminders already sent today, keyed `"{user_id}_{Prayer}"`.
///
/// Lives only in memory: a restart starts from an empty ledger, so a prayer
/// whose reminder instant comes round again after the restart can be reminded
/// twice that day.
#[derive(Debug, Default)]
pub struct ReminderLedger {
    sent: HashMap<String, ClockMinute>,
}

impl ReminderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(user_id: &str, prayer: Prayer) -> String {
        format!("{}_{}", user_id, prayer)
    }

    pub fn contains(&self, user_id: &str, prayer: Prayer) -> bool {
        self.sent.contains_key(&Self::key(user_id, prayer))
    }

    /// True only when the stored send minute is `now`. An entry left over
    /// from a day whose midnight cycle was missed does not match a moved
    /// prayer time, so it cannot suppress that day's reminder.
    pub fn sent_at(&self, user_id: &str, prayer: Prayer, now: ClockMinute) -> bool {
        self.sent.get(&Self::key(user_id, prayer)) == Some(&now)
    }

    pub fn get(&self, key: &str) -> Option<ClockMinute> {
        self.sent.get(key).copied()
    }

    pub fn record(&mut self, user_id: &str, prayer: Prayer, at: ClockMinute) {
        self.sent.insert(Self::key(user_id, prayer), at);
    }

    /// Clears everything when `now` is midnight. Returns whether it did.
    pub fn reset_if_midnight(&mut self, now: ClockMinute) -> bool {
        if now.is_midnight() {
            log::info!("Midnight reached, clearing {} ledger entries", self.sent.len());
            self.sent.clear();
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct WorkerState {
    pub ledger: ReminderLedger,
    pub cycles: u64,
}
