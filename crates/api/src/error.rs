//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body has the shape
//! `{"success": false, "error": "<message>"}`.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CatalogError, OrderError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::InvalidName
                | AuthError::WeakPassword(_)
                | AuthError::UserAlreadyExists => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials
                | AuthError::MissingToken
                | AuthError::MalformedToken
                | AuthError::ExpiredToken
                | AuthError::TokenRevoked => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::PasswordHash | AuthError::TokenSigning(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Catalog(err) => match err {
                CatalogError::MissingField(_)
                | CatalogError::DuplicateCategory
                | CatalogError::CategoryInUse
                | CatalogError::UnknownCategory(_)
                | CatalogError::DuplicateProduct => StatusCode::BAD_REQUEST,
                CatalogError::CategoryNotFound | CatalogError::ProductNotFound => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Order(err) => match err {
                OrderError::EmptyOrder
                | OrderError::ProductsNotFound(_)
                | OrderError::TotalTooLarge => StatusCode::BAD_REQUEST,
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Server faults never expose details.
    fn public_message(&self) -> String {
        if self.status().is_server_error() {
            return "Internal server error".to_owned();
        }
        match self {
            Self::Auth(err) => err.to_string(),
            Self::Catalog(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Database(_) => "Internal server error".to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = json!({
            "success": false,
            "error": self.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections render as `AppError::BadRequest`.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use bazaar_core::ProductId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_taxonomy_status_codes() {
        assert_eq!(
            get_status(AuthError::UserAlreadyExists.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::TokenRevoked.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::ExpiredToken.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(OrderError::ProductsNotFound(vec![ProductId::new(1)]).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::TotalTooLarge.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(CatalogError::CategoryInUse.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::DataCorruption("orders.total".to_owned()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::from(AuthError::Repository(RepositoryError::DataCorruption(
            "users.email".to_owned(),
        )));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::from(AuthError::MissingToken);
        assert_eq!(err.public_message(), "authentication token is missing");
    }
}
