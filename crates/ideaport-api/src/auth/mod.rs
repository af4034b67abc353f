//! Bearer-token authentication.
//!
//! Registration and login are owned by an external identity service; this
//! module only validates the JWT it issues and resolves the caller to a
//! portal user. Every versioned route requires an authenticated caller.

pub mod jwt;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;
use ideaport_core::models::User;
use ideaport_core::AppError;

/// The authenticated caller, resolved from the bearer token.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header".to_string())
        })?;

        let claims = jwt::decode_token(token, &state.security.jwt_secret)?;

        let user = state
            .db
            .user_repository
            .get(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

        Ok(AuthUser(user))
    }
}
