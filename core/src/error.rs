use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid analysis period: {days} days (must be a positive number of days)")]
    InvalidPeriod { days: i64 },

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
