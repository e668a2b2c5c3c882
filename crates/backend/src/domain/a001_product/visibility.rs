use contracts::domain::a001_product::{ProductSearchCriteria, ProductStatus};
use sea_orm::sea_query::SimpleExpr;
use sea_orm::ColumnTrait;

use super::repository::Column;

/// Статус, который реально применяется к поиску.
/// Явно запрошенный статус берётся как есть, иначе видны только активные.
pub fn effective_status(criteria: &ProductSearchCriteria) -> ProductStatus {
    criteria.status.unwrap_or(ProductStatus::Active)
}

pub fn status_filter(status: ProductStatus) -> SimpleExpr {
    Column::Status.eq(status.as_str())
}

/// Условие для прямых выборок (по ID, по штрихкоду)
pub fn active_only() -> SimpleExpr {
    status_filter(ProductStatus::Active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_active() {
        assert_eq!(
            effective_status(&ProductSearchCriteria::empty()),
            ProductStatus::Active
        );
        let with_name = ProductSearchCriteria {
            name: Some("milk".into()),
            ..Default::default()
        };
        assert_eq!(effective_status(&with_name), ProductStatus::Active);
    }

    #[test]
    fn explicit_status_is_used_verbatim() {
        for status in [ProductStatus::Active, ProductStatus::Sold, ProductStatus::Discarded] {
            let criteria = ProductSearchCriteria {
                status: Some(status),
                ..Default::default()
            };
            assert_eq!(effective_status(&criteria), status);
        }
    }

    #[test]
    fn status_is_stored_upper_case() {
        assert_eq!(
            status_filter(ProductStatus::Discarded),
            Column::Status.eq("DISCARDED")
        );
        assert_eq!(active_only(), Column::Status.eq("ACTIVE"));
    }
}
