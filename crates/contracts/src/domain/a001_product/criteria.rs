use super::aggregate::ProductStatus;
use crate::shared::pagination::PageRequest;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Критерии поиска товаров.
///
/// Все фильтры необязательны. Пустая строка считается отсутствующим фильтром.
/// Создаётся на каждый запрос и после этого не меняется.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchCriteria {
    /// Подстрока названия, без учёта регистра
    pub name: Option<String>,
    pub barcode: Option<String>,
    pub lot: Option<String>,
    /// Срок годности <= даты
    pub expired_before: Option<NaiveDate>,
    pub is_expired: Option<bool>,
    /// Срок истекает в ближайшие N дней
    pub days_threshold: Option<i32>,
    /// Явный статус. Без него поиск видит только активные записи
    pub status: Option<ProductStatus>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

impl ProductSearchCriteria {
    /// Критерии без фильтров и без пагинации
    pub fn empty() -> Self {
        Self::default()
    }

    /// Пустые критерии с той же пагинацией
    pub fn empty_like(&self) -> Self {
        Self {
            page: self.page,
            size: self.size,
            ..Self::default()
        }
    }

    /// `true`, если ни один фильтр не задан (пагинация не учитывается)
    pub fn is_invalid(&self) -> bool {
        is_blank(&self.name)
            && is_blank(&self.barcode)
            && is_blank(&self.lot)
            && self.expired_before.is_none()
            && self.is_expired.is_none()
            && self.days_threshold.map_or(true, |d| d < 0)
            && self.status.is_none()
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::clamped(self.page, self.size)
    }
}
