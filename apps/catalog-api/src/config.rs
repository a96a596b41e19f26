//! Configuration for the Catalog API

use axum_helpers::AdminConfig;
use core_config::{
    AppInfo, FromEnv, app_info, env_parse_or, github::GitHubConfig, retry::RetryConfig,
    server::ServerConfig,
};

pub use core_config::Environment;

pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub github: GitHubConfig,
    pub retry: RetryConfig,
    pub admin: AdminConfig,
    /// Body limit for `POST /api/images`
    pub upload_max_bytes: usize,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            github: GitHubConfig::from_env()?,
            retry: RetryConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            upload_max_bytes: env_parse_or("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("GITHUB_REPO", Some("acme/grocery-data")),
                ("GITHUB_TOKEN", Some("ghp_test")),
                ("ADMIN_USERNAME", Some("admin")),
                ("ADMIN_PASSWORD", Some("hunter2")),
                ("JWT_SECRET", Some(SECRET)),
                ("UPLOAD_MAX_BYTES", Some("1024")),
                ("APP_ENV", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.github.owner, "acme");
                assert_eq!(config.github.repo, "grocery-data");
                assert_eq!(config.github.document_path, "products.json");
                assert_eq!(config.admin.username, "admin");
                assert_eq!(config.upload_max_bytes, 1024);
                assert_eq!(config.app.name, "catalog_api");
                assert!(config.environment.is_development());
            },
        );
    }

    #[test]
    fn test_config_requires_github_token() {
        temp_env::with_vars(
            [
                ("GITHUB_REPO", Some("acme/grocery-data")),
                ("GITHUB_TOKEN", None),
                ("ADMIN_USERNAME", Some("admin")),
                ("ADMIN_PASSWORD", Some("hunter2")),
                ("JWT_SECRET", Some(SECRET)),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("GITHUB_TOKEN"));
            },
        );
    }

    #[test]
    fn test_config_rejects_bad_upload_limit() {
        temp_env::with_vars(
            [
                ("GITHUB_REPO", Some("acme/grocery-data")),
                ("GITHUB_TOKEN", Some("ghp_test")),
                ("ADMIN_USERNAME", Some("admin")),
                ("ADMIN_PASSWORD", Some("hunter2")),
                ("JWT_SECRET", Some(SECRET)),
                ("UPLOAD_MAX_BYTES", Some("lots")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
