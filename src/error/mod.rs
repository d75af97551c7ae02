use std::fmt;

#[derive(Debug)]
pub enum WorkerError {
    MissingConfig(&'static str),
    InvalidConfig { key: &'static str, reason: String },
    EnvFileError(dotenvy::Error),
    HttpError(reqwest::Error),
    SerdeError(serde_json::Error),
    UpstreamError { service: &'static str, status: u16, message: String },
    TimingFormatError(String),
    InvalidInput(String),
}

impl WorkerError {
    /// Configuration problems are fatal at startup; everything else is
    /// recoverable inside a cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WorkerError::MissingConfig(_)
                | WorkerError::InvalidConfig { .. }
                | WorkerError::EnvFileError(_)
        )
    }
}

impl std::error::Error for WorkerError {}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::MissingConfig(key) => {
                write!(f, "Missing required configuration: {} is not set", key)
            }
            WorkerError::InvalidConfig { key, reason } => {
                write!(f, "Invalid configuration for {}: {}", key, reason)
            }
            WorkerError::EnvFileError(e) => write!(f, "Env file error: {}", e),
            WorkerError::HttpError(e) => write!(f, "HTTP error: {}", e),
            WorkerError::SerdeError(e) => write!(f, "Serialization error: {}", e),
            WorkerError::UpstreamError { service, status, message } => {
                write!(f, "{} responded with {}: {}", service, status, message)
            }
            WorkerError::TimingFormatError(raw) => {
                write!(f, "Unrecognised timing format: {:?}", raw)
            }
            WorkerError::InvalidInput(reason) => write!(f, "Invalid input: {}", reason),
        }
    }
}

impl From<reqwest::Error> for WorkerError {
    fn from(err: reqwest::Error) -> Self {
        WorkerError::HttpError(err)
    }
}

impl From<serde_json::Error> for WorkerError {
    fn from(err: serde_json::Error) -> Self {
        WorkerError::SerdeError(err)
    }
}

impl From<dotenvy::Error> for WorkerError {
    fn from(err: dotenvy::Error) -> Self {
        WorkerError::EnvFileError(err)
    }
}
