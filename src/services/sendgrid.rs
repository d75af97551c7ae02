use async_trait::async_trait;
use serde_json::json;

use crate::config::SendGridConfig;
use crate::error::WorkerError;
use crate::services::{ensure_success, DeliveryStatus, NotificationDispatcher};

/// Plain-text mail through the SendGrid v3 `mail/send` endpoint.
#[derive(Debug, Clone)]
pub struct SendGridDispatcher {
    http: reqwest::Client,
    config: SendGridConfig,
}

impl SendGridDispatcher {
    pub fn new(http: reqwest::Client, config: SendGridConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl NotificationDispatcher for SendGridDispatcher {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<DeliveryStatus, WorkerError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.config.from_email },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
        });

        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;
        let response = ensure_success("SendGrid", response).await?;

        let status = DeliveryStatus(response.status().as_u16());
        log::info!("[EMAIL SENT] to {} | Status Code: {}", to, status.0);
        Ok(status)
    }
}
