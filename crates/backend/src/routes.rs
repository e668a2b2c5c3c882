use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // ========================================
        // A001 PRODUCTS
        // ========================================
        .route(
            "/api/v1/products",
            get(handlers::a001_product::list_all).post(handlers::a001_product::create),
        )
        .route(
            "/api/v1/products/search",
            get(handlers::a001_product::search),
        )
        .route(
            "/api/v1/products/barcode/:barcode",
            get(handlers::a001_product::get_by_barcode),
        )
        .route(
            "/api/v1/products/:id",
            get(handlers::a001_product::get_by_id)
                .put(handlers::a001_product::update)
                .delete(handlers::a001_product::delete),
        )
        // ========================================
        // SYSTEM USERS
        // ========================================
        .route("/api/v1/users", post(handlers::users::register))
        .route("/api/v1/users/:id", get(handlers::users::get_by_id))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
}
