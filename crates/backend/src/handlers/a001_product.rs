use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_product::{Product, ProductDto, ProductId, ProductSearchCriteria};
use contracts::domain::common::AggregateId;
use contracts::shared::pagination::PaginatedResult;
use serde::Deserialize;

use super::error::ApiError;
use crate::domain::a001_product::service;
use crate::shared::data::db::get_connection;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

fn parse_id(id: &str) -> Result<ProductId, ApiError> {
    ProductId::from_string(id).map_err(ApiError::bad_request)
}

/// POST /api/v1/products
pub async fn create(
    Json(dto): Json<ProductDto>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = service::create(get_connection(), dto).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products?page&size
pub async fn list_all(
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResult<Product>>, ApiError> {
    let page = service::find_all(get_connection(), query.page, query.size).await?;
    Ok(Json(page))
}

/// GET /api/v1/products/search
pub async fn search(
    Query(criteria): Query<ProductSearchCriteria>,
) -> Result<Json<PaginatedResult<Product>>, ApiError> {
    let page = service::search(get_connection(), criteria).await?;
    Ok(Json(page))
}

/// GET /api/v1/products/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    match service::find_by_id(get_connection(), id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::not_found(format!("Product not found: {}", id))),
    }
}

/// GET /api/v1/products/barcode/:barcode
pub async fn get_by_barcode(Path(barcode): Path<String>) -> Result<Json<Product>, ApiError> {
    match service::find_by_barcode(get_connection(), &barcode).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::not_found(format!(
            "Product not found for barcode: {}",
            barcode
        ))),
    }
}

/// PUT /api/v1/products/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<ProductDto>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let product = service::update(get_connection(), id, dto).await?;
    Ok(Json(product))
}

/// DELETE /api/v1/products/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    service::delete(get_connection(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
