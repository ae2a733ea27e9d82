use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("cutoff hour must be within 0..=23, got {0}")]
    InvalidCutoffHour(u32),
    #[error("unknown timezone `{0}`")]
    InvalidTimezone(String),
    #[error("decay factor must be within (0, 1], got {0}")]
    InvalidDecayFactor(f64),
    #[error("window size must be at least 1")]
    InvalidWindowSize,
    #[error("invalid time slot: {0}")]
    InvalidTimeSlot(String),
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
