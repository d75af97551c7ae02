use async_trait::async_trait;
use serde_json::Value;

use crate::config::FirebaseConfig;
use crate::error::WorkerError;
use crate::services::{ensure_success, UserDirectory};
use crate::types::UserRecord;

/// User profiles stored under `/users` in a Firebase Realtime Database,
/// reached over its REST interface.
#[derive(Debug, Clone)]
pub struct FirebaseDirectory {
    http: reqwest::Client,
    config: FirebaseConfig,
}

impl FirebaseDirectory {
    pub fn new(http: reqwest::Client, config: FirebaseConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.config.db_url, path)
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.query(&[("auth", token.as_str())]),
            None => request,
        }
    }
}

#[async_trait]
impl UserDirectory for FirebaseDirectory {
    async fn list_users(&self) -> Result<Vec<UserRecord>, WorkerError> {
        let response = self.with_auth(self.http.get(self.url("users"))).send().await?;
        let response = ensure_success("Firebase", response).await?;

        // An empty database answers with `null`.
        let users = match serde_json::from_str::<Value>(&response.text().await?)? {
            Value::Object(map) => map
                .iter()
                .map(|(id, profile)| UserRecord::from_value(id, profile))
                .collect(),
            Value::Null => Vec::new(),
            other => {
                log::warn!("Unexpected users node in directory: {}", other);
                Vec::new()
            }
        };

        Ok(users)
    }

    async fn save_location(&self, record: &UserRecord) -> Result<(), WorkerError> {
        if record.id.is_empty() {
            return Err(WorkerError::InvalidInput("user key is empty".to_string()));
        }

        let path = format!("users/{}", record.id);
        let response = self
            .with_auth(self.http.put(self.url(&path)))
            .json(record)
            .send()
            .await?;
        ensure_success("Firebase", response).await?;

        log::info!("Saved location for {}", record.id);
        Ok(())
    }
}
