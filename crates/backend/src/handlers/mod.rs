pub mod a001_product;
pub mod error;
pub mod users;

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
