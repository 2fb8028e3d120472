//! User and session handlers.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiJson, Result, clear_sentry_user};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::auth::Registration;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: String,
    pub id: bazaar_core::UserId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `POST /users/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let user = state
        .auth()
        .register(Registration {
            name: &body.name,
            email: &body.email,
            password: &body.password,
            avatar_url: body.avatar_url.as_deref(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: format!(
                "{} has been registered successfully with id {}",
                user.name, user.id
            ),
            id: user.id,
        }),
    ))
}

/// `POST /users/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (user, issued) = state.auth().login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token: issued.token,
        expires_at: issued.expires_at,
        user,
    }))
}

/// `POST /users/logout`
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
) -> Result<Json<MessageResponse>> {
    state.auth().logout(&session).await?;
    clear_sentry_user();

    Ok(Json(MessageResponse {
        message: "Logout successful",
    }))
}

/// `GET /users/profile`
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
) -> Result<Json<DataResponse<User>>> {
    let user = state.auth().get_user(session.user_id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// `GET /users`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_session): RequireAuth,
) -> Result<Json<DataResponse<Vec<User>>>> {
    let users = state.auth().list_users().await?;
    Ok(Json(DataResponse { data: users }))
}
