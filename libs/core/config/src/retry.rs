use crate::{ConfigError, FromEnv, env_parse_or};
use std::time::Duration;

/// Bounded retry settings for optimistic-concurrency conflicts.
///
/// - `CONFLICT_RETRY_ATTEMPTS`: total attempts including the first (default 3, minimum 1)
/// - `CONFLICT_RETRY_BACKOFF_MS`: delay before the second attempt (default 100)
/// - `CONFLICT_RETRY_MAX_BACKOFF_MS`: cap for the doubling delay (default 2000)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(2000),
        }
    }
}

impl FromEnv for RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_attempts = env_parse_or("CONFLICT_RETRY_ATTEMPTS", 3u32)?;
        if max_attempts == 0 {
            return Err(ConfigError::ParseError {
                key: "CONFLICT_RETRY_ATTEMPTS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            max_attempts,
            initial_backoff: Duration::from_millis(env_parse_or(
                "CONFLICT_RETRY_BACKOFF_MS",
                100u64,
            )?),
            max_backoff: Duration::from_millis(env_parse_or(
                "CONFLICT_RETRY_MAX_BACKOFF_MS",
                2000u64,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_defaults() {
        temp_env::with_vars(
            [
                ("CONFLICT_RETRY_ATTEMPTS", None::<&str>),
                ("CONFLICT_RETRY_BACKOFF_MS", None),
                ("CONFLICT_RETRY_MAX_BACKOFF_MS", None),
            ],
            || {
                assert_eq!(RetryConfig::from_env().unwrap(), RetryConfig::default());
            },
        );
    }

    #[test]
    fn test_retry_config_custom() {
        temp_env::with_vars(
            [
                ("CONFLICT_RETRY_ATTEMPTS", Some("1")),
                ("CONFLICT_RETRY_BACKOFF_MS", Some("5")),
                ("CONFLICT_RETRY_MAX_BACKOFF_MS", Some("50")),
            ],
            || {
                let config = RetryConfig::from_env().unwrap();
                assert_eq!(config.max_attempts, 1);
                assert_eq!(config.initial_backoff, Duration::from_millis(5));
                assert_eq!(config.max_backoff, Duration::from_millis(50));
            },
        );
    }

    #[test]
    fn test_retry_config_rejects_zero_attempts() {
        temp_env::with_var("CONFLICT_RETRY_ATTEMPTS", Some("0"), || {
            let err = RetryConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("at least 1"));
        });
    }
}
