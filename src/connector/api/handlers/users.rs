use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::json_body;
use crate::connector::api::{ApiError, Container};
use crate::domain::{UserInput, UserView, UserWithWishlist};

pub const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    #[serde(default)]
    pub product_id: Option<String>,
}

pub async fn list_users(State(container): State<Arc<Container>>) -> Result<Json<Value>, ApiError> {
    let users = container.users_use_case().list().await?;
    Ok(Json(json!({ "count": users.len(), "data": users })))
}

pub async fn get_user(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
) -> Result<Json<UserWithWishlist>, ApiError> {
    let user = container
        .users_use_case()
        .get(&id)
        .await
        .map_err(|e| ApiError::from(e).not_found_as(USER_NOT_FOUND))?;
    Ok(Json(user))
}

pub async fn create_user(
    State(container): State<Arc<Container>>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let input = json_body(payload)?;
    let user = container.users_use_case().create(input).await?;
    Ok((StatusCode::CREATED, Json(user.view())))
}

pub async fn update_user(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    let input = json_body(payload)?;
    let user = container
        .users_use_case()
        .update(&id, input)
        .await
        .map_err(|e| ApiError::from(e).not_found_as(USER_NOT_FOUND))?;
    Ok(Json(user.view()))
}

pub async fn delete_user(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    container
        .users_use_case()
        .delete(&id)
        .await
        .map_err(|e| ApiError::from(e).not_found_as(USER_NOT_FOUND))?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// `PUT /users/{id}/wishlist`: adds the product, or removes it if present.
pub async fn toggle_wishlist(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
    payload: Result<Json<WishlistRequest>, JsonRejection>,
) -> Result<Json<UserWithWishlist>, ApiError> {
    let request = json_body(payload)?;
    let product_id = request.product_id.unwrap_or_default();
    let user = container
        .users_use_case()
        .toggle_wishlist(&id, &product_id)
        .await?;
    Ok(Json(user))
}
