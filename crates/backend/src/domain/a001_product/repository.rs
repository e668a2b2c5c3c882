use chrono::{NaiveDate, Utc};
use contracts::domain::a001_product::{Product, ProductId, ProductSearchCriteria, ProductStatus};
use contracts::domain::common::{AggregateId, EntityMetadata};
use contracts::shared::pagination::{PageRequest, PaginatedResult};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, ItemsAndPagesNumber, QueryOrder, Select, Set};
use serde::{Deserialize, Serialize};

use super::{filters, visibility};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub barcode: String,
    pub name: String,
    pub lot: String,
    pub expiry_date: NaiveDate,
    pub quantity: i32,
    pub category: String,
    pub status: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = DbErr;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let id = ProductId::from_string(&m.id).map_err(DbErr::Custom)?;
        let status = m.status.parse::<ProductStatus>().map_err(DbErr::Custom)?;
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };

        Ok(Product {
            id,
            barcode: m.barcode,
            name: m.name,
            lot: m.lot,
            expiry_date: m.expiry_date,
            quantity: m.quantity,
            category: m.category,
            status,
            metadata,
        })
    }
}

fn to_active_model(product: &Product) -> ActiveModel {
    ActiveModel {
        id: Set(product.to_string_id()),
        barcode: Set(product.barcode.clone()),
        name: Set(product.name.clone()),
        lot: Set(product.lot.clone()),
        expiry_date: Set(product.expiry_date),
        quantity: Set(product.quantity),
        category: Set(product.category.clone()),
        status: Set(product.status.as_str().to_string()),
        created_at: Set(Some(product.metadata.created_at)),
        updated_at: Set(Some(product.metadata.updated_at)),
        version: Set(product.metadata.version),
    }
}

fn convert(models: Vec<Model>) -> Result<Vec<Product>, DbErr> {
    models.into_iter().map(Product::try_from).collect()
}

/// Выполнить запрос постранично. Метаданные страницы берутся из пагинатора,
/// а не пересчитываются вручную.
async fn fetch_page<C: ConnectionTrait>(
    db: &C,
    query: Select<Entity>,
    request: PageRequest,
) -> Result<PaginatedResult<Product>, DbErr> {
    let paginator = query
        .order_by_asc(Column::ExpiryDate)
        .order_by_asc(Column::Id)
        .paginate(db, request.size);

    let ItemsAndPagesNumber {
        number_of_items,
        number_of_pages,
    } = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(request.page).await?;

    Ok(PaginatedResult::from_page(
        convert(models)?,
        number_of_items,
        number_of_pages,
        request.page,
    ))
}

// ============================================================================
// Repository functions
// ============================================================================

/// Вставка новой записи или полная перезапись существующей
pub async fn save<C: ConnectionTrait>(db: &C, product: &Product) -> Result<Product, DbErr> {
    let id = product.to_string_id();
    let active = to_active_model(product);

    if Entity::find_by_id(id).one(db).await?.is_some() {
        Entity::update(active).exec(db).await?;
    } else {
        Entity::insert(active).exec(db).await?;
    }
    Ok(product.clone())
}

/// Активная партия по ID
pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: &ProductId,
) -> Result<Option<Product>, DbErr> {
    Entity::find_by_id(id.as_string())
        .filter(visibility::active_only())
        .one(db)
        .await?
        .map(Product::try_from)
        .transpose()
}

/// Запись по ID в любом статусе (для сценариев изменения)
pub async fn find_any_by_id<C: ConnectionTrait>(
    db: &C,
    id: &ProductId,
) -> Result<Option<Product>, DbErr> {
    Entity::find_by_id(id.as_string())
        .one(db)
        .await?
        .map(Product::try_from)
        .transpose()
}

/// Активная партия по штрихкоду. Если активных лотов несколько,
/// возвращается тот, что истекает раньше.
pub async fn find_by_barcode<C: ConnectionTrait>(
    db: &C,
    barcode: &str,
) -> Result<Option<Product>, DbErr> {
    Entity::find()
        .filter(Column::Barcode.eq(barcode))
        .filter(visibility::active_only())
        .order_by_asc(Column::ExpiryDate)
        .order_by_asc(Column::Id)
        .one(db)
        .await?
        .map(Product::try_from)
        .transpose()
}

/// Проверка пары (barcode, lot) среди всех записей, независимо от статуса
pub async fn exists_by_barcode_and_lot<C: ConnectionTrait>(
    db: &C,
    barcode: &str,
    lot: &str,
) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::Barcode.eq(barcode))
        .filter(Column::Lot.eq(lot))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn exists_by_id<C: ConnectionTrait>(db: &C, id: &ProductId) -> Result<bool, DbErr> {
    let count = Entity::find_by_id(id.as_string()).count(db).await?;
    Ok(count > 0)
}

/// Все записи постранично, без фильтра по статусу
pub async fn find_paginated<C: ConnectionTrait>(
    db: &C,
    request: PageRequest,
) -> Result<PaginatedResult<Product>, DbErr> {
    fetch_page(db, Entity::find(), request).await
}

/// Поиск по критериям с политикой видимости и пагинацией
pub async fn find_by_criteria<C: ConnectionTrait>(
    db: &C,
    criteria: &ProductSearchCriteria,
    today: NaiveDate,
) -> Result<PaginatedResult<Product>, DbErr> {
    let status = visibility::effective_status(criteria);
    let condition = filters::compose(criteria, today).add(visibility::status_filter(status));

    fetch_page(db, Entity::find().filter(condition), criteria.page_request()).await
}

/// Мягкое удаление: статус DISCARDED, строка остаётся.
/// Возвращает `false`, если записи с таким ID нет.
pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: &ProductId) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(ProductStatus::Discarded.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.as_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
