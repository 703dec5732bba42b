//! Errors raised while loading or validating session settings.

use thiserror::Error;

use super::config::{MAX_TIME_LIMIT_SECS, MIN_TIME_LIMIT_SECS, TIME_ADJUST_STEP_SECS};

/// Errors that can occur when building `SessionSettings`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("time limit {0}s is outside the allowed range {}..={}s", MIN_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS)]
    TimeLimitOutOfRange(u32),

    #[error("time limit {0}s is not a multiple of {}s", TIME_ADJUST_STEP_SECS)]
    TimeLimitOffStep(u32),

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ConfigError::TimeLimitOutOfRange(400).to_string(),
            "time limit 400s is outside the allowed range 10..=300s"
        );
        assert_eq!(
            ConfigError::TimeLimitOffStep(45).to_string(),
            "time limit 45s is not a multiple of 10s"
        );
        assert_eq!(
            ConfigError::ZeroInterval("tick_interval_ms").to_string(),
            "tick_interval_ms must be greater than zero"
        );
    }
}
