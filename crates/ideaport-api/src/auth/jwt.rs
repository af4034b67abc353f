use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ideaport_core::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Issue an HS256 token for a user. Used by operational tooling and tests;
/// production tokens come from the identity service sharing the secret.
pub fn create_token(user_id: Uuid, secret: &str, expiry_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))
}

/// Validate an HS256 token and return its claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn round_trip_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, SECRET, 1).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = create_token(Uuid::new_v4(), SECRET, 1).unwrap();
        assert!(decode_token(&token, "another-secret-another-secret-xx").is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(decode_token("not.a.token", SECRET).is_err());
    }
}
