//! Access credential encoding and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// JWT claims carried by an access credential
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

/// Creates a new access token
///
/// # Arguments
///
/// * `user_id` - User identifier
/// * `roles` - User's roles
/// * `secret` - Shared HS256 secret
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, SessionError> {
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
    .map_err(|_| SessionError::InvalidCredential)
}

/// Validates an access token
///
/// Distinguishes an expired credential from a malformed one, so callers
/// can decide between re-login and refresh.
///
/// # Arguments
///
/// * `token` - The access token to validate
/// * `secret` - Shared HS256 secret
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, SessionError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            SessionError::CredentialExpired
        } else {
            SessionError::InvalidCredential
        }
    })?;

    Ok(token_data.claims)
}

/// Checks if the credential carries the required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == "admin")
}

/// Permission definitions
pub mod permissions {
    pub const PERSON_READ: &str = "person:read";
    pub const PERSON_WRITE: &str = "person:write";
    pub const REGISTRATION_SUBMIT: &str = "registration:submit";
    pub const STAFF_ASSIGN: &str = "staff:assign";
    pub const ADMIN_CONFIG: &str = "admin:config";
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_create_and_validate_round_trip() {
        let token = create_token("user-1", vec!["person:read".to_string()], SECRET, 3600).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.roles, vec!["person:read".to_string()]);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token("user-1", vec![], SECRET, 3600).unwrap();
        let result = validate_token(&token, "other-secret");
        assert!(matches!(result, Err(SessionError::InvalidCredential)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let result = validate_token("not.a.token", SECRET);
        assert!(matches!(result, Err(SessionError::InvalidCredential)));
    }

    #[test]
    fn test_has_role() {
        let claims = Claims {
            sub: "user-1".to_string(),
            roles: vec!["person:read".to_string()],
            exp: 0,
            iat: 0,
        };
        assert!(has_role(&claims, permissions::PERSON_READ));
        assert!(!has_role(&claims, permissions::ADMIN_CONFIG));

        let admin = Claims {
            sub: "user-2".to_string(),
            roles: vec!["admin".to_string()],
            exp: 0,
            iat: 0,
        };
        assert!(has_role(&admin, permissions::ADMIN_CONFIG));
    }
}
