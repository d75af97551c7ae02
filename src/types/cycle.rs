use crate::types::{ClockMinute, Prayer};

#[derive(Debug, Clone, PartialEq)]
pub enum ReminderOutcome {
    Sent,
    AlreadySent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserOutcome {
    /// Missing email, city or country. Not an error.
    Incomplete,
    TimingsUnavailable(String),
    Checked {
        malformed: usize,
        reminders: Vec<(Prayer, ReminderOutcome)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    pub at: ClockMinute,
    pub ledger_cleared: bool,
    pub directory_error: Option<String>,
    pub users: Vec<(String, UserOutcome)>,
}

impl CycleSummary {
    pub fn new(at: ClockMinute, ledger_cleared: bool) -> Self {
        Self {
            at,
            ledger_cleared,
            directory_error: None,
            users: Vec::new(),
        }
    }

    fn reminders(&self) -> impl Iterator<Item = &ReminderOutcome> {
        self.users
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                UserOutcome::Checked { reminders, .. } => Some(reminders),
                _ => None,
            })
            .flatten()
            .map(|(_, r)| r)
    }

    pub fn sent(&self) -> usize {
        self.reminders()
            .filter(|r| matches!(r, ReminderOutcome::Sent))
            .count()
    }

    pub fn duplicates(&self) -> usize {
        self.reminders()
            .filter(|r| matches!(r, ReminderOutcome::AlreadySent))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reminders()
            .filter(|r| matches!(r, ReminderOutcome::Failed(_)))
            .count()
    }

    pub fn skipped_users(&self) -> usize {
        self.users
            .iter()
            .filter(|(_, o)| matches!(o, UserOutcome::Incomplete))
            .count()
    }

    pub fn lookup_failures(&self) -> usize {
        self.users
            .iter()
            .filter(|(_, o)| matches!(o, UserOutcome::TimingsUnavailable(_)))
            .count()
    }

    pub fn malformed(&self) -> usize {
        self.users
            .iter()
            .map(|(_, o)| match o {
                UserOutcome::Checked { malformed, .. } => *malformed,
                _ => 0,
            })
            .sum()
    }

    /// Worth an info line: anything other than a quiet minute.
    pub fn has_activity(&self) -> bool {
        self.ledger_cleared
            || self.directory_error.is_some()
            || self.sent() > 0
            || self.failed() > 0
            || self.lookup_failures() > 0
    }
}

impl std::fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] users={} skipped={} lookup_failures={} sent={} duplicates={} failed={} malformed={}",
            self.at,
            self.users.len(),
            self.skipped_users(),
            self.lookup_failures(),
            self.sent(),
            self.duplicates(),
            self.failed(),
            self.malformed()
        )?;
        if self.ledger_cleared {
            write!(f, " ledger_cleared")?;
        }
        if let Some(e) = &self.directory_error {
            write!(f, " directory_error={}", e)?;
        }
        Ok(())
    }
}
