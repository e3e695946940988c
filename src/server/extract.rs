use super::types::{ApiError, error_response};
use crate::auth::{SESSION_COOKIE, SessionStore};
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tracing::error;

/// A request carrying a live `session` cookie. Handlers that take this
/// answer 401 to anonymous callers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub session_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<SessionStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(session_id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
            return Err(authentication_required());
        };

        let sessions = Arc::<SessionStore>::from_ref(state);
        match sessions.resolve(&session_id) {
            Ok(Some(email)) => Ok(Self { email, session_id }),
            Ok(None) => Err(authentication_required()),
            Err(e) => {
                error!("Failed to resolve session: {}", e);
                Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request",
                ))
            }
        }
    }
}

fn authentication_required() -> ApiError {
    error_response(StatusCode::UNAUTHORIZED, "Authentication required")
}
