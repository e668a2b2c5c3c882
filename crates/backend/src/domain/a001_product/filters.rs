//! Построение условия поиска по критериям.
//!
//! Каждый фильтр независим и возвращает `None`, если его поле в критериях
//! не задано. Включённые фильтры объединяются через AND.

use chrono::{Duration, NaiveDate};
use contracts::domain::a001_product::ProductSearchCriteria;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

use super::repository::Column;

type Filter = fn(&ProductSearchCriteria, NaiveDate) -> Option<SimpleExpr>;

const FILTERS: [Filter; 6] = [
    name_filter,
    barcode_filter,
    lot_filter,
    is_expired_filter,
    expired_before_filter,
    about_to_expire_filter,
];

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Экранирование спецсимволов LIKE (`\` используется как ESCAPE)
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Подстрока названия без учёта регистра
fn name_filter(criteria: &ProductSearchCriteria, _today: NaiveDate) -> Option<SimpleExpr> {
    let name = non_blank(&criteria.name)?;
    let pattern = format!("%{}%", escape_like(&name.to_lowercase()));
    Some(Expr::expr(Func::lower(Expr::col(Column::Name))).like(LikeExpr::new(pattern).escape('\\')))
}

fn barcode_filter(criteria: &ProductSearchCriteria, _today: NaiveDate) -> Option<SimpleExpr> {
    non_blank(&criteria.barcode).map(|barcode| Column::Barcode.eq(barcode))
}

fn lot_filter(criteria: &ProductSearchCriteria, _today: NaiveDate) -> Option<SimpleExpr> {
    non_blank(&criteria.lot).map(|lot| Column::Lot.eq(lot))
}

/// true: срок истёк до сегодняшнего дня; false: срок сегодня или позже
fn is_expired_filter(criteria: &ProductSearchCriteria, today: NaiveDate) -> Option<SimpleExpr> {
    criteria.is_expired.map(|expired| {
        if expired {
            Column::ExpiryDate.lt(today)
        } else {
            Column::ExpiryDate.gte(today)
        }
    })
}

fn expired_before_filter(
    criteria: &ProductSearchCriteria,
    _today: NaiveDate,
) -> Option<SimpleExpr> {
    criteria
        .expired_before
        .map(|bound| Column::ExpiryDate.lte(bound))
}

/// Срок истекает в окне `[today, today + days)`
fn about_to_expire_filter(
    criteria: &ProductSearchCriteria,
    today: NaiveDate,
) -> Option<SimpleExpr> {
    let days = criteria.days_threshold.filter(|d| *d >= 0)?;
    let from_today = Column::ExpiryDate.gte(today);
    // Граница за пределами календаря: окно не ограничено сверху
    match today.checked_add_signed(Duration::days(i64::from(days))) {
        Some(limit) => Some(from_today.and(Column::ExpiryDate.lt(limit))),
        None => Some(from_today),
    }
}

/// Выражения включённых фильтров, в порядке объявления
pub fn enabled_filters(criteria: &ProductSearchCriteria, today: NaiveDate) -> Vec<SimpleExpr> {
    FILTERS
        .iter()
        .filter_map(|filter| filter(criteria, today))
        .collect()
}

/// Конъюнкция всех включённых фильтров. Статус сюда не входит,
/// его добавляет политика видимости.
pub fn compose(criteria: &ProductSearchCriteria, today: NaiveDate) -> Condition {
    enabled_filters(criteria, today)
        .into_iter()
        .fold(Condition::all(), |condition, expr| condition.add(expr))
}
