use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::json_body;
use crate::connector::api::session::{clear_session_cookie, parse_session_cookie, session_cookie};
use crate::connector::api::{ApiError, Container};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub new_password: String,
}

pub async fn login(
    State(container): State<Arc<Container>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(payload)?;
    let user = container
        .auth_use_case()
        .login(&request.email, &request.password)
        .await?;

    let token = container.jwt().create_token(user.id(), user.email())?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(json!({ "message": "Logged in successfully", "sessionId": user.id() })),
    )
        .into_response())
}

pub async fn logout() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out successfully" })),
    )
        .into_response()
}

/// `GET /auth/session`: reports whether the request carries a valid session cookie.
pub async fn session(State(container): State<Arc<Container>>, headers: HeaderMap) -> Response {
    let claims = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_session_cookie)
        .and_then(|token| match container.jwt().verify_token(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Rejected session cookie: {}", e);
                None
            }
        });

    match claims {
        Some(claims) => (
            StatusCode::OK,
            Json(json!({ "isAuthenticated": true, "sessionId": claims.sub })),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "isAuthenticated": false })),
        )
            .into_response(),
    }
}

pub async fn reset_password(
    State(container): State<Arc<Container>>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(payload)?;
    let user = container
        .auth_use_case()
        .reset_password(&request.email, &request.new_password)
        .await?;

    // Does not log the user in.
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Password updated successfully",
            "sessionId": user.id(),
        })),
    )
        .into_response())
}
