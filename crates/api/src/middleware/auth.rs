//! Bearer token extractor.
//!
//! Any handler that takes [`RequireAuth`] is protected: the token gate runs
//! during extraction, before the handler body, and a rejection is rendered
//! as a 401 `AppError`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::Span;

use crate::error::{AppError, set_sentry_user};
use crate::models::AuthenticatedUser;
use crate::services::AuthError;
use crate::state::AppState;

/// Extractor that requires a valid, unrevoked bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(session): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", session.user_id)
/// }
/// ```
pub struct RequireAuth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthError::MalformedToken))
            .transpose()?;

        let session = state.auth().authenticate(header).await?;

        Span::current().record("user_id", session.user_id.as_i32());
        set_sentry_user(&session.user_id);

        Ok(Self(session))
    }
}
