use std::future::Future;
use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::clock::Clock;
use crate::services::{NotificationDispatcher, TimingService, UserDirectory};
use crate::state::{ReminderLedger, WorkerState};
use crate::types::{
    reminder_schedule, ClockMinute, CycleSummary, Prayer, ReminderOutcome, ReminderTemplate,
    UserOutcome, UserRecord,
};

pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Ticks land this far past each minute boundary, so a slightly early
/// timer never reads the previous minute.
const TICK_MARGIN: Duration = Duration::from_secs(1);

pub struct ReminderWorker {
    directory: Arc<dyn UserDirectory>,
    timings: Arc<dyn TimingService>,
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    template: ReminderTemplate,
    state: WorkerState,
}

impl ReminderWorker {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        timings: Arc<dyn TimingService>,
        notifier: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        template: ReminderTemplate,
    ) -> Self {
        Self {
            directory,
            timings,
            notifier,
            clock,
            template,
            state: WorkerState::default(),
        }
    }

    pub fn ledger(&self) -> &ReminderLedger {
        &self.state.ledger
    }

    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    /// One pass over every registered user at the clock's current minute.
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let now = self.clock.now();
        self.state.cycles += 1;

        let cleared = self.state.ledger.reset_if_midnight(now);
        let mut summary = CycleSummary::new(now, cleared);

        let users = match self.directory.list_users().await {
            Ok(users) => users,
            Err(e) => {
                log::error!("Could not list users: {}", e);
                summary.directory_error = Some(e.to_string());
                return summary;
            }
        };

        for user in &users {
            let outcome = self.process_user(user, now).await;
            summary.users.push((user.id.clone(), outcome));
        }

        summary
    }

    async fn process_user(&mut self, user: &UserRecord, now: ClockMinute) -> UserOutcome {
        let Some(contact) = user.contact() else {
            log::debug!("Skipping incomplete profile {}", user.id);
            return UserOutcome::Incomplete;
        };

        let timings = match self.timings.get_timings(contact.city, contact.country).await {
            Ok(timings) => timings,
            Err(e) => {
                log::error!(
                    "Could not fetch prayer times for {}, {}: {}",
                    contact.city,
                    contact.country,
                    e
                );
                return UserOutcome::TimingsUnavailable(e.to_string());
            }
        };

        let schedule = reminder_schedule(&timings);
        let mut reminders = Vec::new();

        for due in schedule.due_at(now) {
            let outcome = self.remind(&user.id, contact.email, due.prayer, now).await;
            reminders.push((due.prayer, outcome));
        }

        UserOutcome::Checked {
            malformed: schedule.malformed.len(),
            reminders,
        }
    }

    /// Sends one reminder unless the ledger already has it for this minute.
    /// Only a successful send is recorded; a failure is not retried.
    async fn remind(
        &mut self,
        user_id: &str,
        email: &str,
        prayer: Prayer,
        now: ClockMinute,
    ) -> ReminderOutcome {
        if self.state.ledger.sent_at(user_id, prayer, now) {
            return ReminderOutcome::AlreadySent;
        }

        let message = self.template.render(prayer);
        match self.notifier.send(email, &message.subject, &message.body).await {
            Ok(_) => {
                self.state.ledger.record(user_id, prayer, now);
                log::info!("Sent {} reminder to {} at {}", prayer, user_id, now);
                ReminderOutcome::Sent
            }
            Err(e) => {
                log::error!("Could not send email to {}: {}", email, e);
                ReminderOutcome::Failed(e.to_string())
            }
        }
    }

    /// Polls once a minute, just after each wall-clock minute boundary,
    /// until `shutdown` resolves. Cycles never overlap. A cycle that runs
    /// past its minute is followed by one immediate cycle, then ticks return
    /// to the boundaries; further missed minutes are not caught up.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let first = Instant::now() + self.clock.until_next_minute() + TICK_MARGIN;
        let mut ticker = interval_at(first, POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Reminder worker stopping after {} cycles", self.state.cycles);
                    break;
                }
                _ = ticker.tick() => {
                    let summary = self.run_cycle().await;
                    if summary.has_activity() {
                        log::info!("{}", summary);
                    } else {
                        log::debug!("{}", summary);
                    }
                }
            }
        }
    }
}

pub async fn start_reminder_worker(worker: ReminderWorker) {
    log::info!("🚀 Reminder Worker Started...");
    worker
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Could not listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
}
