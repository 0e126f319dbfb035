use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::json_body;
use crate::connector::api::{ApiError, Container};
use crate::domain::{Product, ProductInput};

pub const PRODUCT_NOT_FOUND: &str = "Product not found!";

pub async fn create_product(
    State(container): State<Arc<Container>>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let input = json_body(payload)?;
    let product = container.products_use_case().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(State(container): State<Arc<Container>>) -> Result<Json<Value>, ApiError> {
    let products = container.products_use_case().list().await?;
    Ok(Json(json!({ "count": products.len(), "data": products })))
}

pub async fn get_product(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = container
        .products_use_case()
        .get(&id)
        .await
        .map_err(|e| ApiError::from(e).not_found_as(PRODUCT_NOT_FOUND))?;
    Ok(Json(product))
}

pub async fn update_product(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let input = json_body(payload)?;
    let product = container
        .products_use_case()
        .update(&id, input)
        .await
        .map_err(|e| ApiError::from(e).not_found_as(PRODUCT_NOT_FOUND))?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(container): State<Arc<Container>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    container
        .products_use_case()
        .delete(&id)
        .await
        .map_err(|e| ApiError::from(e).not_found_as(PRODUCT_NOT_FOUND))?;
    Ok(Json(json!({ "message": "Product deleted successfully!" })))
}
