use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AladhanConfig;
use crate::error::WorkerError;
use crate::services::{ensure_success, TimingService};
use crate::types::PrayerTimings;

#[derive(Debug, Deserialize)]
struct TimingsResponse {
    data: Option<TimingsData>,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: PrayerTimings,
}

/// Client for the public AlAdhan `timingsByCity` endpoint. No authentication.
#[derive(Debug, Clone)]
pub struct AladhanClient {
    http: reqwest::Client,
    config: AladhanConfig,
}

impl AladhanClient {
    pub fn new(http: reqwest::Client, config: AladhanConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl TimingService for AladhanClient {
    async fn get_timings(&self, city: &str, country: &str) -> Result<PrayerTimings, WorkerError> {
        let url = format!("{}/v1/timingsByCity", self.config.base_url);
        let method = self.config.method.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[("city", city), ("country", country), ("method", method.as_str())])
            .send()
            .await?;
        let response = ensure_success("AlAdhan", response).await?;

        let body: TimingsResponse = serde_json::from_str(&response.text().await?)?;
        body.data
            .map(|d| d.timings)
            .ok_or_else(|| WorkerError::UpstreamError {
                service: "AlAdhan",
                status: 200,
                message: format!("no timings returned for {}, {}", city, country),
            })
    }
}
