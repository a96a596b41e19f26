use crate::{ConfigError, FromEnv, env_or_default, env_parse_or, env_required};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_JSDELIVR_URL: &str = "https://cdn.jsdelivr.net/gh";

/// How public URLs for committed assets are built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetUrlStyle {
    /// `{raw_url}/{owner}/{repo}/{branch}/{path}`
    #[default]
    Raw,
    /// `{jsdelivr_url}/{owner}/{repo}@{branch}/{path}`
    JsDelivr,
}

impl FromStr for AssetUrlStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "jsdelivr" => Ok(Self::JsDelivr),
            other => Err(format!("expected 'raw' or 'jsdelivr', got '{}'", other)),
        }
    }
}

/// Location of and credential for the repository that backs the catalog.
///
/// Loaded from environment variables:
/// - `GITHUB_REPO` (required): `owner/name`
/// - `GITHUB_TOKEN` (required): personal access token with contents write scope
/// - `GITHUB_BRANCH`: defaults to `main`
/// - `GITHUB_FILE`: path of the catalog document, defaults to `products.json`
/// - `GITHUB_ASSET_PREFIX`: directory for uploaded images, defaults to `public`;
///   must be non-empty and must not contain the catalog document
/// - `GITHUB_ASSET_URL_STYLE`: `raw` (default) or `jsdelivr`
/// - `GITHUB_API_URL` / `GITHUB_RAW_URL`: API and raw-content hosts
/// - `GITHUB_TIMEOUT_SECS`: per-request timeout, defaults to 30
#[derive(Clone)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub branch: String,
    pub document_path: String,
    pub asset_prefix: String,
    pub api_url: String,
    pub raw_url: String,
    pub asset_url_style: AssetUrlStyle,
    pub jsdelivr_url: String,
    pub timeout_secs: u64,
}

impl GitHubConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            branch: "main".to_string(),
            document_path: "products.json".to_string(),
            asset_prefix: "public".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            asset_url_style: AssetUrlStyle::Raw,
            jsdelivr_url: DEFAULT_JSDELIVR_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Base URL under which committed files are publicly readable,
    /// e.g. `https://raw.githubusercontent.com/owner/repo/main`.
    pub fn raw_base_url(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.raw_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch
        )
    }

    /// Base URL that asset URLs are built from, per [`AssetUrlStyle`].
    pub fn public_base_url(&self) -> String {
        match self.asset_url_style {
            AssetUrlStyle::Raw => self.raw_base_url(),
            AssetUrlStyle::JsDelivr => format!(
                "{}/{}/{}@{}",
                self.jsdelivr_url.trim_end_matches('/'),
                self.owner,
                self.repo,
                self.branch
            ),
        }
    }
}

// The token never reaches logs.
impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"***")
            .field("branch", &self.branch)
            .field("document_path", &self.document_path)
            .field("asset_prefix", &self.asset_prefix)
            .field("api_url", &self.api_url)
            .field("raw_url", &self.raw_url)
            .field("asset_url_style", &self.asset_url_style)
            .field("jsdelivr_url", &self.jsdelivr_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn parse_repo(full_name: &str) -> Result<(String, String), ConfigError> {
    let parse_error = || ConfigError::ParseError {
        key: "GITHUB_REPO".to_string(),
        details: format!("expected 'owner/name', got '{}'", full_name),
    };

    let (owner, repo) = full_name.trim().split_once('/').ok_or_else(parse_error)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(parse_error());
    }
    Ok((owner.to_string(), repo.to_string()))
}

fn trim_slashes(value: String) -> String {
    value.trim_matches('/').to_string()
}

impl FromEnv for GitHubConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let (owner, repo) = parse_repo(&env_required("GITHUB_REPO")?)?;
        let token = env_required("GITHUB_TOKEN")?;

        let document_path = trim_slashes(env_or_default("GITHUB_FILE", "products.json"));
        if document_path.is_empty() {
            return Err(ConfigError::ParseError {
                key: "GITHUB_FILE".to_string(),
                details: "must not be empty".to_string(),
            });
        }

        let asset_prefix = trim_slashes(env_or_default("GITHUB_ASSET_PREFIX", "public"));
        if asset_prefix.is_empty() {
            return Err(ConfigError::ParseError {
                key: "GITHUB_ASSET_PREFIX".to_string(),
                details: "must not be empty".to_string(),
            });
        }
        if document_path.starts_with(&format!("{}/", asset_prefix)) {
            return Err(ConfigError::ParseError {
                key: "GITHUB_ASSET_PREFIX".to_string(),
                details: format!("must not contain the catalog document '{}'", document_path),
            });
        }

        Ok(Self {
            owner,
            repo,
            token,
            branch: env_or_default("GITHUB_BRANCH", "main"),
            document_path,
            asset_prefix,
            api_url: env_or_default("GITHUB_API_URL", DEFAULT_API_URL),
            raw_url: env_or_default("GITHUB_RAW_URL", DEFAULT_RAW_URL),
            asset_url_style: env_parse_or("GITHUB_ASSET_URL_STYLE", AssetUrlStyle::Raw)?,
            jsdelivr_url: env_or_default("GITHUB_JSDELIVR_URL", DEFAULT_JSDELIVR_URL),
            timeout_secs: env_parse_or("GITHUB_TIMEOUT_SECS", 30u64)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("GITHUB_REPO", Some("salman/grocery-data")),
                ("GITHUB_TOKEN", Some("ghp_test")),
                ("GITHUB_BRANCH", None),
                ("GITHUB_FILE", None),
                ("GITHUB_ASSET_PREFIX", None),
                ("GITHUB_API_URL", None),
                ("GITHUB_RAW_URL", None),
                ("GITHUB_TIMEOUT_SECS", None),
            ],
            || {
                let config = GitHubConfig::from_env().unwrap();
                assert_eq!(config.owner, "salman");
                assert_eq!(config.repo, "grocery-data");
                assert_eq!(config.branch, "main");
                assert_eq!(config.document_path, "products.json");
                assert_eq!(config.asset_prefix, "public");
                assert_eq!(config.timeout_secs, 30);
                assert_eq!(
                    config.raw_base_url(),
                    "https://raw.githubusercontent.com/salman/grocery-data/main"
                );
            },
        );
    }

    #[test]
    fn test_github_config_trims_paths() {
        temp_env::with_vars(
            [
                ("GITHUB_REPO", Some("acme/shop")),
                ("GITHUB_TOKEN", Some("ghp_test")),
                ("GITHUB_FILE", Some("/data/products.json")),
                ("GITHUB_ASSET_PREFIX", Some("public/uploads/")),
            ],
            || {
                let config = GitHubConfig::from_env().unwrap();
                assert_eq!(config.document_path, "data/products.json");
                assert_eq!(config.asset_prefix, "public/uploads");
            },
        );
    }

    #[test]
    fn test_github_config_requires_token() {
        temp_env::with_vars(
            [("GITHUB_REPO", Some("acme/shop")), ("GITHUB_TOKEN", None)],
            || {
                let err = GitHubConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("GITHUB_TOKEN"));
            },
        );
    }

    #[test]
    fn test_github_config_rejects_malformed_repo() {
        for bad in ["shop", "/shop", "acme/", "acme/shop/extra"] {
            temp_env::with_vars(
                [("GITHUB_REPO", Some(bad)), ("GITHUB_TOKEN", Some("ghp_test"))],
                || {
                    let err = GitHubConfig::from_env().unwrap_err();
                    assert!(err.to_string().contains("GITHUB_REPO"), "{bad}");
                },
            );
        }
    }

    #[test]
    fn test_github_config_rejects_unsafe_asset_prefix() {
        for (prefix, file) in [
            ("", "products.json"),
            ("/", "products.json"),
            ("data", "data/products.json"),
        ] {
            temp_env::with_vars(
                [
                    ("GITHUB_REPO", Some("acme/shop")),
                    ("GITHUB_TOKEN", Some("ghp_test")),
                    ("GITHUB_ASSET_PREFIX", Some(prefix)),
                    ("GITHUB_FILE", Some(file)),
                ],
                || {
                    let err = GitHubConfig::from_env().unwrap_err();
                    assert!(err.to_string().contains("GITHUB_ASSET_PREFIX"), "{prefix}");
                },
            );
        }
    }

    #[test]
    fn test_github_config_jsdelivr_urls() {
        temp_env::with_vars(
            [
                ("GITHUB_REPO", Some("acme/shop")),
                ("GITHUB_TOKEN", Some("ghp_test")),
                ("GITHUB_BRANCH", Some("live")),
                ("GITHUB_ASSET_URL_STYLE", Some("jsDelivr")),
                ("GITHUB_JSDELIVR_URL", None),
            ],
            || {
                let config = GitHubConfig::from_env().unwrap();
                assert_eq!(config.asset_url_style, AssetUrlStyle::JsDelivr);
                assert_eq!(
                    config.public_base_url(),
                    "https://cdn.jsdelivr.net/gh/acme/shop@live"
                );
            },
        );

        temp_env::with_vars(
            [
                ("GITHUB_REPO", Some("acme/shop")),
                ("GITHUB_TOKEN", Some("ghp_test")),
                ("GITHUB_ASSET_URL_STYLE", Some("cloudinary")),
            ],
            || {
                let err = GitHubConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("GITHUB_ASSET_URL_STYLE"));
            },
        );
    }

    #[test]
    fn test_github_config_debug_hides_token() {
        let config = GitHubConfig::new("acme", "shop", "ghp_secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("acme"));
    }
}
