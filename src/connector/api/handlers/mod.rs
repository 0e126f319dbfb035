pub mod auth;
pub mod products;
pub mod search;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use tracing::debug;

use super::error::ApiError;

/// Unwrap a JSON body, turning extractor rejections into a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}
