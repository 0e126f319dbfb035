use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use crate::connector::api::Container;
use crate::domain::{SearchOutcome, SearchRequest};

/// `POST /search` (and the legacy `POST /openAI`).
///
/// A body that is not a JSON object with a string `message` is treated the
/// same as a missing message.
pub async fn search(
    State(container): State<Arc<Container>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Unreadable search body: {}", rejection.body_text());
            SearchRequest::default()
        }
    };

    let outcome = container.search_use_case().execute(&request).await;
    (outcome_status(&outcome), Json(outcome_body(&outcome))).into_response()
}

pub fn outcome_status(outcome: &SearchOutcome) -> StatusCode {
    match outcome {
        SearchOutcome::Success { .. } => StatusCode::OK,
        SearchOutcome::MissingInput { .. } | SearchOutcome::InvalidFilter { .. } => {
            StatusCode::BAD_REQUEST
        }
        SearchOutcome::NoMatch { .. } => StatusCode::NOT_FOUND,
        SearchOutcome::UpstreamError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn outcome_body(outcome: &SearchOutcome) -> Value {
    match outcome {
        SearchOutcome::Success { count, products } => {
            json!({ "success": true, "count": count, "products": products })
        }
        SearchOutcome::MissingInput { message } => {
            json!({ "success": false, "message": message })
        }
        SearchOutcome::InvalidFilter {
            message,
            suggestions,
        }
        | SearchOutcome::NoMatch {
            message,
            suggestions,
        } => json!({ "success": false, "message": message, "suggestions": suggestions }),
        SearchOutcome::UpstreamError { message } => json!({ "message": message }),
    }
}
