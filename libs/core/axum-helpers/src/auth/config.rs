//! Admin credential configuration, loaded through `core_config::FromEnv`.

use core_config::{ConfigError, FromEnv, env_parse_or, env_required};
use std::fmt;

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Admin credential pair and JWT signing settings.
///
/// - `ADMIN_USERNAME` (required)
/// - `ADMIN_PASSWORD` (required)
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `ADMIN_TOKEN_TTL_SECS` (default 3600)
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub secret: String,
    pub token_ttl_secs: i64,
}

impl AdminConfig {
    /// # Panics
    /// Panics if the secret is shorter than 32 characters.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= MIN_SECRET_LEN,
            "JWT secret must be at least 32 characters"
        );
        Self {
            username: username.into(),
            password: password.into(),
            secret,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("secret", &"***")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl FromEnv for AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let username = env_required("ADMIN_USERNAME")?;
        let password = env_required("ADMIN_PASSWORD")?;
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let token_ttl_secs = env_parse_or("ADMIN_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::ParseError {
                key: "ADMIN_TOKEN_TTL_SECS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self {
            username,
            password,
            secret,
            token_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_admin_config_new_short_secret() {
        AdminConfig::new("admin", "admin", "short");
    }

    #[test]
    fn test_admin_config_from_env_valid() {
        temp_env::with_vars(
            [
                ("ADMIN_USERNAME", Some("admin")),
                ("ADMIN_PASSWORD", Some("hunter2")),
                ("JWT_SECRET", Some(SECRET)),
                ("ADMIN_TOKEN_TTL_SECS", None),
            ],
            || {
                let config = AdminConfig::from_env().unwrap();
                assert_eq!(config.username, "admin");
                assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
            },
        );
    }

    #[test]
    fn test_admin_config_from_env_missing_password() {
        temp_env::with_vars(
            [
                ("ADMIN_USERNAME", Some("admin")),
                ("ADMIN_PASSWORD", None),
                ("JWT_SECRET", Some(SECRET)),
            ],
            || {
                let err = AdminConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("ADMIN_PASSWORD"));
            },
        );
    }

    #[test]
    fn test_admin_config_from_env_short_secret() {
        temp_env::with_vars(
            [
                ("ADMIN_USERNAME", Some("admin")),
                ("ADMIN_PASSWORD", Some("hunter2")),
                ("JWT_SECRET", Some("short")),
            ],
            || {
                let err = AdminConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("32 characters"));
            },
        );
    }

    #[test]
    fn test_admin_config_debug_hides_secrets() {
        let config = AdminConfig::new("admin", "hunter2", SECRET);
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains(SECRET));
    }
}
