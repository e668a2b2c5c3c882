use serde::{Deserialize, Serialize};

/// Размер страницы, если клиент не передал корректный
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Верхняя граница размера страницы
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Нормализованные параметры страницы (индекс с нуля)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Отрицательный индекс превращается в 0, неположительный размер в [`DEFAULT_PAGE_SIZE`],
    /// размер больше [`MAX_PAGE_SIZE`] урезается.
    ///
    /// Индекс ограничен так, что смещение `page * size` всегда помещается в `i64`
    /// (такая страница просто окажется пустой).
    pub fn clamped(page: Option<i64>, size: Option<i64>) -> Self {
        let size = size
            .filter(|s| *s > 0)
            .map(|s| (s as u64).min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let max_page = i64::MAX as u64 / size;
        let page = (page.filter(|p| *p >= 0).unwrap_or(0) as u64).min(max_page);
        Self { page, size }
    }

}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Конверт постраничного результата.
///
/// Строится только из метаданных страницы, которые вернуло хранилище,
/// поэтому `has_next`/`has_previous` всегда согласованы с `total_pages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PaginatedResult<T> {
    pub fn from_page(data: Vec<T>, total_elements: u64, total_pages: u64, current_page: u64) -> Self {
        Self {
            data,
            total_elements,
            total_pages,
            current_page,
            has_next: current_page + 1 < total_pages,
            has_previous: current_page > 0,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResult<U> {
        PaginatedResult {
            data: self.data.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            current_page: self.current_page,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}
