use async_trait::async_trait;
use std::time::Duration;

use crate::error::WorkerError;
use crate::types::{PrayerTimings, UserRecord};

mod aladhan;
mod firebase;
mod sendgrid;

pub use aladhan::AladhanClient;
pub use firebase::FirebaseDirectory;
pub use sendgrid::SendGridDispatcher;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, WorkerError>;

    async fn save_location(&self, record: &UserRecord) -> Result<(), WorkerError>;
}

#[async_trait]
pub trait TimingService: Send + Sync {
    async fn get_timings(&self, city: &str, country: &str) -> Result<PrayerTimings, WorkerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStatus(pub u16);

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<DeliveryStatus, WorkerError>;
}

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, WorkerError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Turns a non-2xx response into an `UpstreamError`.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, WorkerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(WorkerError::UpstreamError {
        service,
        status: status.as_u16(),
        message,
    })
}
