//! Auth extractor for protected routes

use crate::error::ApiError;
use crate::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Authenticated session, resolved from the bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Strip an optional "Bearer " prefix, accepting bare tokens too.
pub(crate) fn bearer_token(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;

        let token = bearer_token(header);

        match state.auth.session_user(token).await {
            Ok(Some(user_id)) => Ok(AuthUser { user_id }),
            Ok(None) => Err(ApiError::unauthorized("invalid or expired session")),
            Err(e) => Err(ApiError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(bearer_token("Bearer abc123"), "abc123");
        assert_eq!(bearer_token("abc123"), "abc123");
        // Only the exact scheme prefix is stripped.
        assert_eq!(bearer_token("bearer abc123"), "bearer abc123");
    }
}
