use super::config::AdminConfig;
use crate::errors::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by an admin session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    /// Admin username
    pub sub: String,
    pub roles: Vec<String>,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Token id
    pub jti: String,
}

impl SessionClaims {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ADMIN_ROLE)
    }
}

/// Token returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Stateless admin authentication: credential check plus HS256 tokens.
#[derive(Clone)]
pub struct AdminAuth {
    username: String,
    password_digest: [u8; 32],
    secret: String,
    ttl_secs: i64,
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl AdminAuth {
    pub fn new(config: &AdminConfig) -> Self {
        tracing::info!(username = %config.username, "Admin auth initialized");
        Self {
            username: config.username.clone(),
            password_digest: digest(&config.password),
            secret: config.secret.clone(),
            ttl_secs: config.token_ttl_secs,
        }
    }

    /// Check the credential pair and issue a session token.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AppError> {
        let user_ok = username == self.username;
        let password_ok = digest(password) == self.password_digest;
        if !(user_ok && password_ok) {
            tracing::info!(username = %username, "Rejected admin login");
            return Err(AppError::Unauthorized("Invalid username or password".to_string()));
        }

        let access_token = self
            .issue_token(username)
            .map_err(|e| AppError::InternalServerError(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl_secs,
        })
    }

    /// Sign a session token for `subject`.
    pub fn issue_token(&self, subject: &str) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: subject.to_string(),
            roles: vec![ADMIN_ROLE.to_string()],
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> eyre::Result<SessionClaims> {
        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    fn auth() -> AdminAuth {
        AdminAuth::new(&AdminConfig::new("admin", "hunter2", SECRET))
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let auth = auth();
        let issued = auth.login("admin", "hunter2").unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let claims = auth.verify_token(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.is_admin());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let err = auth().login("admin", "wrong").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_login_rejects_unknown_user() {
        let err = auth().login("root", "hunter2").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let other = AdminAuth::new(&AdminConfig::new(
            "admin",
            "hunter2",
            "another-secret-that-is-also-32-chars-long",
        ));
        let token = other.issue_token("admin").unwrap();
        assert!(auth().verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(auth().verify_token("not.a.jwt").is_err());
    }
}
