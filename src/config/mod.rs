use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::WorkerError;

const DEFAULT_SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";
const DEFAULT_ALADHAN_BASE_URL: &str = "https://api.aladhan.com";
const DEFAULT_ALADHAN_METHOD: u8 = 2;
const DEFAULT_APP_URL: &str = "https://your-app-url.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Source of configuration values. Blank values are treated as unset.
pub trait ConfigSource {
    fn value(&self, key: &str) -> Option<String>;

    fn optional(&self, key: &str) -> Option<String> {
        self.value(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, WorkerError> {
        self.optional(key).ok_or(WorkerError::MissingConfig(key))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn value(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn value(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirebaseConfig {
    pub db_url: String,
    pub auth_token: Option<String>,
}

impl FirebaseConfig {
    pub fn from_source(source: &impl ConfigSource) -> Result<Self, WorkerError> {
        Ok(Self {
            db_url: source
                .required("FIREBASE_DB_URL")?
                .trim_end_matches('/')
                .to_string(),
            auth_token: source.optional("FIREBASE_AUTH_TOKEN"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendGridConfig {
    pub api_key: String,
    pub from_email: String,
    pub base_url: String,
}

impl SendGridConfig {
    pub fn from_source(source: &impl ConfigSource) -> Result<Self, WorkerError> {
        Ok(Self {
            api_key: source.required("SENDGRID_API_KEY")?,
            from_email: source.required("FROM_EMAIL")?,
            base_url: source
                .optional("SENDGRID_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SENDGRID_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AladhanConfig {
    pub base_url: String,
    pub method: u8,
}

impl AladhanConfig {
    pub fn from_source(source: &impl ConfigSource) -> Result<Self, WorkerError> {
        let method = match source.optional("ALADHAN_METHOD") {
            Some(raw) => raw.parse::<u8>().map_err(|e| WorkerError::InvalidConfig {
                key: "ALADHAN_METHOD",
                reason: e.to_string(),
            })?,
            None => DEFAULT_ALADHAN_METHOD,
        };

        Ok(Self {
            base_url: source
                .optional("ALADHAN_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ALADHAN_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            method,
        })
    }
}

impl Default for AladhanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ALADHAN_BASE_URL.to_string(),
            method: DEFAULT_ALADHAN_METHOD,
        }
    }
}

pub fn app_url(source: &impl ConfigSource) -> String {
    source
        .optional("APP_URL")
        .unwrap_or_else(|| DEFAULT_APP_URL.to_string())
}

pub fn http_timeout(source: &impl ConfigSource) -> Result<Duration, WorkerError> {
    let secs = match source.optional("HTTP_TIMEOUT_SECS") {
        Some(raw) => {
            let secs = raw.parse::<u64>().map_err(|e| WorkerError::InvalidConfig {
                key: "HTTP_TIMEOUT_SECS",
                reason: e.to_string(),
            })?;
            if secs == 0 {
                return Err(WorkerError::InvalidConfig {
                    key: "HTTP_TIMEOUT_SECS",
                    reason: "must be greater than zero".to_string(),
                });
            }
            secs
        }
        None => DEFAULT_HTTP_TIMEOUT_SECS,
    };
    Ok(Duration::from_secs(secs))
}

/// Everything the reminder worker needs. Any missing credential is fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub firebase: FirebaseConfig,
    pub sendgrid: SendGridConfig,
    pub aladhan: AladhanConfig,
    pub app_url: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_source(source: &impl ConfigSource) -> Result<Self, WorkerError> {
        Ok(Self {
            firebase: FirebaseConfig::from_source(source)?,
            sendgrid: SendGridConfig::from_source(source)?,
            aladhan: AladhanConfig::from_source(source)?,
            app_url: app_url(source),
            http_timeout: http_timeout(source)?,
        })
    }
}

/// Reads a dotenv file into a map without touching the process environment.
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>, WorkerError> {
    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        values.insert(key, value);
    }
    Ok(values)
}

/// An env file layered over the process environment; the file wins.
#[derive(Debug, Default, Clone)]
pub struct LayeredSource {
    pub overrides: HashMap<String, String>,
}

impl ConfigSource for LayeredSource {
    fn value(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .cloned()
            .or_else(|| ProcessEnv.value(key))
    }
}
