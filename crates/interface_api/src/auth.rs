//! Authentication and authorization
//!
//! Two caller populations: the external scheduler (bearer secret or
//! trusted-scheduler header; bypassed entirely in development mode) and
//! administrators (JWT with an admin role) for the settings surface.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ApiConfig;

/// Header a trusted scheduler may present instead of a bearer token
pub const SCHEDULER_TOKEN_HEADER: &str = "x-scheduler-token";

/// Role names
pub mod roles {
    pub const ADMIN: &str = "admin";
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing role: {0}")]
    MissingRole(String),
}

/// Checks whether a trigger request carries a valid scheduler credential
///
/// Accepts `Authorization: Bearer <secret>` or the trusted-scheduler
/// header. In development mode every caller is accepted.
pub fn scheduler_authorized(headers: &HeaderMap, config: &ApiConfig) -> bool {
    if config.dev_mode {
        return true;
    }

    let bearer = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));
    if bearer == Some(config.scheduler_secret.as_str()) {
        return true;
    }

    headers
        .get(SCHEDULER_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        == Some(config.scheduler_secret.as_str())
}

/// Creates a new JWT token
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims
        .roles
        .iter()
        .any(|r| r == required_role || r == roles::ADMIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config_with_secret(secret: &str, dev_mode: bool) -> ApiConfig {
        ApiConfig {
            scheduler_secret: secret.to_string(),
            dev_mode,
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_scheduler_bearer_secret() {
        let config = config_with_secret("s3cret", false);
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer s3cret"));
        assert!(scheduler_authorized(&headers, &config));
    }

    #[test]
    fn test_scheduler_header_secret() {
        let config = config_with_secret("s3cret", false);
        let mut headers = HeaderMap::new();
        headers.insert(SCHEDULER_TOKEN_HEADER, HeaderValue::from_static("s3cret"));
        assert!(scheduler_authorized(&headers, &config));
    }

    #[test]
    fn test_scheduler_rejects_wrong_secret() {
        let config = config_with_secret("s3cret", false);
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer nope"));
        assert!(!scheduler_authorized(&headers, &config));
        assert!(!scheduler_authorized(&HeaderMap::new(), &config));
    }

    #[test]
    fn test_dev_mode_bypasses_auth() {
        let config = config_with_secret("s3cret", true);
        assert!(scheduler_authorized(&HeaderMap::new(), &config));
    }

    #[test]
    fn test_jwt_round_trip_and_roles() {
        let token =
            create_token("ops-1", vec![roles::ADMIN.to_string()], "jwt-secret", 60).unwrap();
        let claims = validate_token(&token, "jwt-secret").unwrap();
        assert_eq!(claims.sub, "ops-1");
        assert!(has_role(&claims, roles::ADMIN));
        assert!(has_role(&claims, "anything-admin-covers"));

        assert!(validate_token(&token, "other-secret").is_err());
    }
}
