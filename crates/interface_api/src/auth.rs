//! Bearer token authentication
//!
//! Identity is issued by an external provider. This service only checks the
//! token signature and expiry and reads the member id from `sub`.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::MemberId;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (member ID)
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// Parses the subject as a member id
    pub fn member_id(&self) -> Result<MemberId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidSubject)
    }
}

/// Auth errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token subject is not a member id")]
    InvalidSubject,
}

/// Creates a signed token for a member
///
/// Used by tests and local tooling; production tokens come from the
/// identity provider.
pub fn create_token(
    member_id: MemberId,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: member_id.as_uuid().to_string(),
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
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let member_id = MemberId::new();
        let token = create_token(member_id, SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.member_id().unwrap(), member_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(MemberId::new(), SECRET, 60).unwrap();
        assert_eq!(validate_token(&token, "other"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        let past = Utc::now() - Duration::hours(1);
        let claims = Claims {
            sub: MemberId::new().as_uuid().to_string(),
            exp: past.timestamp(),
            iat: (past - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(validate_token(&token, SECRET), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_subject_must_be_uuid() {
        let claims = Claims {
            sub: "not-a-member".to_string(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.member_id(), Err(AuthError::InvalidSubject));
    }
}
