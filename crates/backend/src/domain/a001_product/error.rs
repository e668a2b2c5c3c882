use contracts::domain::a001_product::{ProductId, ProductStatus};
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    /// Некорректные данные (штрихкод, пустые поля, отрицательное количество)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Product with barcode {barcode} and lot {lot} already exists")]
    Duplicate { barcode: String, lot: String },

    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Product is {status} and cannot be modified")]
    InvalidState { status: ProductStatus },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ProductError {
    /// Нарушение уникальности (barcode, lot) на уровне БД.
    /// Срабатывает, если параллельная транзакция успела вставить ту же пару.
    pub fn from_write(err: DbErr, barcode: &str, lot: &str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => ProductError::Duplicate {
                barcode: barcode.to_string(),
                lot: lot.to_string(),
            },
            _ => ProductError::Database(err),
        }
    }
}
