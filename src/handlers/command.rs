use std::sync::Arc;

use crate::clock::SystemClock;
use crate::commands::Command;
use crate::config::{self, AladhanConfig, Config, ConfigSource, FirebaseConfig};
use crate::error::WorkerError;
use crate::handlers::{start_reminder_worker, ReminderWorker};
use crate::services::{
    http_client, AladhanClient, FirebaseDirectory, SendGridDispatcher, TimingService,
    UserDirectory,
};
use crate::types::{reminder_schedule, user_key, ReminderTemplate, UserRecord};

pub async fn command_handler(cmd: Command, source: &impl ConfigSource) -> Result<(), WorkerError> {
    match cmd {
        Command::Run => {
            let worker = build_worker(source)?;
            start_reminder_worker(worker).await;
        }
        Command::Once => {
            let mut worker = build_worker(source)?;
            let summary = worker.run_cycle().await;
            println!("{}", summary);
            for (user, outcome) in &summary.users {
                println!("  {}: {:?}", user, outcome);
            }
        }
        Command::SaveLocation { email, city, country } => {
            let directory = firebase_directory(source)?;
            let record = save_location(&directory, &email, &city, &country).await?;
            println!("Location saved for {} ({}, {})", record.id, city.trim(), country.trim());
        }
        Command::Users => {
            let directory = firebase_directory(source)?;
            let users = directory.list_users().await?;
            println!("{} registered users", users.len());
            for user in users {
                let status = if user.is_complete() { "ready" } else { "incomplete" };
                println!(
                    "  {} <{}> {}, {} [{}]",
                    user.id,
                    user.email.as_deref().unwrap_or("-"),
                    user.city.as_deref().unwrap_or("-"),
                    user.country.as_deref().unwrap_or("-"),
                    status
                );
            }
        }
        Command::Timings { city, country } => {
            let http = http_client(config::http_timeout(source)?)?;
            let client = AladhanClient::new(http, AladhanConfig::from_source(source)?);
            print_timings(&client, &city, &country).await?;
        }
    }
    Ok(())
}

/// Validates and stores a location under the key derived from the email.
pub async fn save_location(
    directory: &dyn UserDirectory,
    email: &str,
    city: &str,
    country: &str,
) -> Result<UserRecord, WorkerError> {
    let (email, city, country) = (email.trim(), city.trim(), country.trim());

    if city.is_empty() || country.is_empty() {
        return Err(WorkerError::InvalidInput(
            "Please enter both city and country.".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(WorkerError::InvalidInput(format!("{:?} is not an email address", email)));
    }

    let record = UserRecord::new(user_key(email), email, city, country);
    directory.save_location(&record).await?;
    Ok(record)
}

async fn print_timings(
    service: &dyn TimingService,
    city: &str,
    country: &str,
) -> Result<(), WorkerError> {
    let timings = service.get_timings(city, country).await?;
    let schedule = reminder_schedule(&timings);

    println!("Today's prayer times for {}, {}:", city, country);
    for reminder in &schedule.reminders {
        println!(
            "  {:<8} {}  (reminder at {})",
            reminder.prayer, reminder.prayer_time, reminder.remind_at
        );
    }
    for (name, raw) in &schedule.malformed {
        println!("  {:<8} {:?}  (unreadable, skipped)", name, raw);
    }
    Ok(())
}

fn firebase_directory(source: &impl ConfigSource) -> Result<FirebaseDirectory, WorkerError> {
    let http = http_client(config::http_timeout(source)?)?;
    Ok(FirebaseDirectory::new(http, FirebaseConfig::from_source(source)?))
}

pub fn build_worker(source: &impl ConfigSource) -> Result<ReminderWorker, WorkerError> {
    let config = Config::from_source(source)?;
    let http = http_client(config.http_timeout)?;

    Ok(ReminderWorker::new(
        Arc::new(FirebaseDirectory::new(http.clone(), config.firebase)),
        Arc::new(AladhanClient::new(http.clone(), config.aladhan)),
        Arc::new(SendGridDispatcher::new(http, config.sendgrid)),
        Arc::new(SystemClock),
        ReminderTemplate::new(config.app_url),
    ))
}
