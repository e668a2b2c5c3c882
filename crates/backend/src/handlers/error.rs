use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::domain::a001_product::ProductError;
use crate::system::users::UserError;

/// Ошибка HTTP-слоя с JSON-телом `{ timestamp, status, error, message }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn internal(details: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", details);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": self.status.as_u16(),
            "error": self.status.canonical_reason().unwrap_or("Error"),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(_) => Self::bad_request(err.to_string()),
            ProductError::Duplicate { .. } | ProductError::InvalidState { .. } => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            ProductError::NotFound(_) => Self::not_found(err.to_string()),
            ProductError::Database(e) => Self::internal(e),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(_) => Self::bad_request(err.to_string()),
            UserError::EmailTaken(_) | UserError::UsernameTaken(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            UserError::PasswordHash(e) => Self::internal(e),
            UserError::Database(e) => Self::internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::{ProductId, ProductStatus};

    #[test]
    fn product_errors_map_to_status_codes() {
        let cases = [
            (ProductError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                ProductError::Duplicate {
                    barcode: "7701234567890".into(),
                    lot: "L1".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ProductError::InvalidState {
                    status: ProductStatus::Sold,
                },
                StatusCode::CONFLICT,
            ),
            (ProductError::NotFound(ProductId::new_v7()), StatusCode::NOT_FOUND),
            (
                ProductError::Database(sea_orm::DbErr::Custom("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }

    #[test]
    fn database_details_are_not_exposed() {
        let err = ApiError::from(UserError::Database(sea_orm::DbErr::Custom(
            "secret table layout".into(),
        )));
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn user_conflicts() {
        let err = ApiError::from(UserError::EmailTaken("a@b.c".into()));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(err.message.contains("a@b.c"));
    }
}
