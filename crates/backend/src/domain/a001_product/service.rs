use chrono::Local;
use contracts::domain::a001_product::{
    Product, ProductDto, ProductId, ProductSearchCriteria, ProductStatus,
};
use contracts::shared::pagination::{PageRequest, PaginatedResult};
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::error::ProductError;
use super::{repository, visibility};

/// Создать новую партию.
///
/// Проверка дубликата и вставка выполняются в одной транзакции.
pub async fn create(db: &DatabaseConnection, dto: ProductDto) -> Result<Product, ProductError> {
    let txn = db.begin().await?;

    if repository::exists_by_barcode_and_lot(&txn, &dto.barcode, &dto.lot).await? {
        tracing::warn!(
            "Rejected duplicate product: barcode={} lot={}",
            dto.barcode,
            dto.lot
        );
        return Err(ProductError::Duplicate {
            barcode: dto.barcode,
            lot: dto.lot,
        });
    }

    let product = Product::new_for_insert(&dto).map_err(ProductError::Validation)?;
    let saved = repository::save(&txn, &product)
        .await
        .map_err(|e| ProductError::from_write(e, &dto.barcode, &dto.lot))?;
    txn.commit().await?;

    tracing::info!(
        "Created product {} (barcode={}, lot={})",
        saved.id,
        saved.barcode,
        saved.lot
    );
    Ok(saved)
}

/// Обновить активную партию. ID и статус не меняются.
pub async fn update(
    db: &DatabaseConnection,
    id: ProductId,
    dto: ProductDto,
) -> Result<Product, ProductError> {
    let txn = db.begin().await?;

    let current = repository::find_any_by_id(&txn, &id)
        .await?
        .ok_or(ProductError::NotFound(id))?;

    if !current.status.is_mutable() {
        return Err(ProductError::InvalidState {
            status: current.status,
        });
    }

    if current.key_differs(&dto)
        && repository::exists_by_barcode_and_lot(&txn, &dto.barcode, &dto.lot).await?
    {
        tracing::warn!(
            "Rejected update of {}: barcode={} lot={} already taken",
            id,
            dto.barcode,
            dto.lot
        );
        return Err(ProductError::Duplicate {
            barcode: dto.barcode,
            lot: dto.lot,
        });
    }

    let updated = current
        .updated_with(&dto)
        .map_err(ProductError::Validation)?;
    let saved = repository::save(&txn, &updated)
        .await
        .map_err(|e| ProductError::from_write(e, &dto.barcode, &dto.lot))?;
    txn.commit().await?;

    tracing::info!("Updated product {} (version {})", saved.id, saved.metadata.version);
    Ok(saved)
}

/// Мягкое удаление: перевод в DISCARDED.
/// Повторное удаление уже списанной партии проходит без ошибки.
pub async fn delete(db: &DatabaseConnection, id: ProductId) -> Result<(), ProductError> {
    let txn = db.begin().await?;

    let current = repository::find_any_by_id(&txn, &id)
        .await?
        .ok_or(ProductError::NotFound(id))?;

    if current.status == ProductStatus::Discarded {
        tracing::debug!("Product {} is already discarded", id);
        return Ok(());
    }

    current
        .status
        .transition_to(ProductStatus::Discarded)
        .map_err(|_| ProductError::InvalidState {
            status: current.status,
        })?;

    if !repository::soft_delete(&txn, &id).await? {
        return Err(ProductError::NotFound(id));
    }
    txn.commit().await?;

    tracing::info!("Discarded product {}", id);
    Ok(())
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: ProductId,
) -> Result<Option<Product>, ProductError> {
    Ok(repository::find_by_id(db, &id).await?)
}

pub async fn find_by_barcode(
    db: &DatabaseConnection,
    barcode: &str,
) -> Result<Option<Product>, ProductError> {
    Ok(repository::find_by_barcode(db, barcode.trim()).await?)
}

/// Постраничный список без фильтра по статусу
pub async fn find_all(
    db: &DatabaseConnection,
    page: Option<i64>,
    size: Option<i64>,
) -> Result<PaginatedResult<Product>, ProductError> {
    let request = PageRequest::clamped(page, size);
    Ok(repository::find_paginated(db, request).await?)
}

/// Первая страница активных партий
pub async fn find_active(db: &DatabaseConnection) -> Result<PaginatedResult<Product>, ProductError> {
    search(db, ProductSearchCriteria::empty()).await
}

/// Поиск по критериям относительно текущей даты
pub async fn search(
    db: &DatabaseConnection,
    criteria: ProductSearchCriteria,
) -> Result<PaginatedResult<Product>, ProductError> {
    search_on(db, criteria, Local::now().date_naive()).await
}

/// Поиск по критериям на заданную дату.
/// Критерии без единого фильтра заменяются пустыми с той же пагинацией.
pub async fn search_on(
    db: &DatabaseConnection,
    criteria: ProductSearchCriteria,
    today: chrono::NaiveDate,
) -> Result<PaginatedResult<Product>, ProductError> {
    let criteria = if criteria.is_invalid() {
        criteria.empty_like()
    } else {
        criteria
    };

    let result = repository::find_by_criteria(db, &criteria, today).await?;

    let request = criteria.page_request();
    tracing::info!(
        "Product search: status={} page={} size={} total={}",
        visibility::effective_status(&criteria),
        request.page,
        request.size,
        result.total_elements
    );
    Ok(result)
}
