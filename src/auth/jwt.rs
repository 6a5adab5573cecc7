use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::error::ApiError;
use crate::models::User;

/// Access token claims. `sub` is the user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys plus the token lifetime
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Issue an access token for `user`
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate signature and expiry, returning the claims
    pub fn validate(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            ApiError::Unauthorized(format!("Invalid JWT token: {}", e))
        })?;

        Ok(token_data.claims)
    }
}

/// Extract JWT token from Authorization header
/// Expected format: "Bearer <token>"
pub fn extract_jwt_from_header(auth_header: Option<&str>) -> Result<&str, ApiError> {
    let auth_value = auth_header
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_value.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format, expected 'Bearer <token>'".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_user(is_admin: bool) -> User {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        User {
            id: "user-123".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            is_admin,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let keys = JwtKeys::new("test-secret", 3600);
        let token = keys.issue(&test_user(true)).unwrap();

        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email, "test@example.com");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtKeys::new("secret-a", 3600).issue(&test_user(false)).unwrap();
        let result = JwtKeys::new("secret-b", 3600).validate(&token);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Well past the default 60s leeway
        let keys = JwtKeys::new("test-secret", -3600);
        let token = keys.issue(&test_user(false)).unwrap();
        assert!(matches!(keys.validate(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let keys = JwtKeys::new("test-secret", 3600);
        assert!(matches!(
            keys.validate("not.a.token"),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_extract_jwt_from_header_valid() {
        let header = "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.token";
        let result = extract_jwt_from_header(Some(header));
        assert_eq!(
            result.unwrap(),
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test.token"
        );
    }

    #[test]
    fn test_extract_jwt_from_header_missing() {
        match extract_jwt_from_header(None) {
            Err(ApiError::Unauthorized(msg)) => {
                assert!(msg.contains("Missing Authorization header"));
            }
            _ => panic!("Expected Unauthorized error"),
        }
    }

    #[test]
    fn test_extract_jwt_from_header_invalid_format() {
        match extract_jwt_from_header(Some("Token abc")) {
            Err(ApiError::Unauthorized(msg)) => {
                assert!(msg.contains("Invalid Authorization header format"));
            }
            _ => panic!("Expected Unauthorized error"),
        }
    }
}
