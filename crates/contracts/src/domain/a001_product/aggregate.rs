use crate::domain::common::{AggregateId, EntityMetadata};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Длина штрихкода EAN-13
pub const BARCODE_LENGTH: usize = 13;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    /// Новый идентификатор, упорядоченный по времени создания (UUID v7)
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Status
// ============================================================================

/// Жизненный цикл товарной партии.
///
/// Допустимые переходы: `Active -> Sold`, `Active -> Discarded`.
/// Из `Sold` и `Discarded` выхода нет.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// В наличии
    Active,
    /// Продано или передано
    Sold,
    /// Списано (просрочка, повреждение, мягкое удаление)
    Discarded,
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ProductStatus::Active),
            "SOLD" => Ok(ProductStatus::Sold),
            "DISCARDED" => Ok(ProductStatus::Discarded),
            _ => Err(format!("Unknown product status: {}", s)),
        }
    }
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "ACTIVE",
            ProductStatus::Sold => "SOLD",
            ProductStatus::Discarded => "DISCARDED",
        }
    }

    pub fn can_transition_to(self, next: ProductStatus) -> bool {
        matches!(
            (self, next),
            (ProductStatus::Active, ProductStatus::Sold)
                | (ProductStatus::Active, ProductStatus::Discarded)
        )
    }

    pub fn transition_to(self, next: ProductStatus) -> Result<ProductStatus, String> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(format!(
                "Transition {} -> {} is not allowed",
                self.as_str(),
                next.as_str()
            ))
        }
    }

    /// Только активные записи можно редактировать
    pub fn is_mutable(self) -> bool {
        self == ProductStatus::Active
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// EAN-13, ровно 13 цифр
    pub barcode: String,

    pub name: String,

    /// Номер партии (лот). Пара (barcode, lot) уникальна среди всех записей
    pub lot: String,

    #[serde(rename = "expiryDate")]
    pub expiry_date: NaiveDate,

    pub quantity: i32,

    pub category: String,

    pub status: ProductStatus,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Product {
    /// Новая активная партия. Идентификатор генерируется здесь,
    /// поэтому проверку дубликатов нужно делать до вызова.
    pub fn new_for_insert(dto: &ProductDto) -> Result<Self, String> {
        let product = Self {
            id: ProductId::new_v7(),
            barcode: dto.barcode.clone(),
            name: dto.name.clone(),
            lot: dto.lot.clone(),
            expiry_date: dto.expiry_date,
            quantity: dto.quantity,
            category: dto.category.clone(),
            status: ProductStatus::Active,
            metadata: EntityMetadata::new(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Новая версия записи с данными из DTO.
    /// ID, статус и дата создания сохраняются.
    pub fn updated_with(&self, dto: &ProductDto) -> Result<Self, String> {
        if !self.status.is_mutable() {
            return Err(format!(
                "Product {} is {} and cannot be edited",
                self.id, self.status
            ));
        }

        let mut metadata = self.metadata.clone();
        metadata.touch();
        metadata.increment_version();

        let product = Self {
            id: self.id,
            barcode: dto.barcode.clone(),
            name: dto.name.clone(),
            lot: dto.lot.clone(),
            expiry_date: dto.expiry_date,
            quantity: dto.quantity,
            category: dto.category.clone(),
            status: self.status,
            metadata,
        };
        product.validate()?;
        Ok(product)
    }

    /// Изменилась ли ключевая пара (barcode, lot)
    pub fn key_differs(&self, dto: &ProductDto) -> bool {
        self.barcode != dto.barcode || self.lot != dto.lot
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.barcode.len() != BARCODE_LENGTH
            || !self.barcode.chars().all(|c| c.is_ascii_digit())
        {
            return Err("Barcode must contain exactly 13 digits".into());
        }
        if self.name.trim().is_empty() {
            return Err("Name cannot be blank".into());
        }
        if self.lot.trim().is_empty() {
            return Err("Lot cannot be blank".into());
        }
        if self.category.trim().is_empty() {
            return Err("Category cannot be blank".into());
        }
        if self.quantity < 0 {
            return Err("Quantity cannot be negative".into());
        }
        Ok(())
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Срок годности истёк строго до `today`
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// Активная партия, срок которой истекает в окне `[today, today + days)`
    pub fn is_about_to_expire_on(&self, days: i32, today: NaiveDate) -> bool {
        if self.status != ProductStatus::Active || days < 0 {
            return false;
        }
        // За пределами календаря окно не ограничено сверху
        let limit = today.checked_add_signed(Duration::days(i64::from(days)));
        today <= self.expiry_date && limit.map_or(true, |limit| self.expiry_date < limit)
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Данные, которые клиент передаёт при создании и обновлении.
/// ID и статус сюда намеренно не входят.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub barcode: String,
    pub name: String,
    pub lot: String,
    #[serde(rename = "expiryDate")]
    pub expiry_date: NaiveDate,
    pub quantity: i32,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn dto() -> ProductDto {
        ProductDto {
            barcode: "7701234567890".into(),
            name: "Spaghetti N5".into(),
            lot: "L1".into(),
            expiry_date: today() + Duration::days(5),
            quantity: 10,
            category: "Pastas".into(),
        }
    }

    #[test]
    fn new_product_is_active_and_valid() {
        let product = Product::new_for_insert(&dto()).unwrap();
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.metadata.version, 0);
        assert_eq!(product.barcode, "7701234567890");
    }

    #[test]
    fn rejects_malformed_barcode() {
        for barcode in ["770123456789", "77012345678901", "77012345678a0", ""] {
            let mut d = dto();
            d.barcode = barcode.into();
            let err = Product::new_for_insert(&d).unwrap_err();
            assert!(err.contains("13 digits"), "barcode {:?}: {}", barcode, err);
        }
    }

    #[test]
    fn rejects_blank_fields_and_negative_quantity() {
        let mut d = dto();
        d.name = "   ".into();
        assert!(Product::new_for_insert(&d).is_err());

        let mut d = dto();
        d.lot = "".into();
        assert!(Product::new_for_insert(&d).is_err());

        let mut d = dto();
        d.category = "\t".into();
        assert!(Product::new_for_insert(&d).is_err());

        let mut d = dto();
        d.quantity = -1;
        assert_eq!(
            Product::new_for_insert(&d).unwrap_err(),
            "Quantity cannot be negative"
        );

        let mut d = dto();
        d.quantity = 0;
        assert!(Product::new_for_insert(&d).is_ok());
    }

    #[test]
    fn update_keeps_identity_and_status() {
        let product = Product::new_for_insert(&dto()).unwrap();
        let mut changed = dto();
        changed.name = "Spaghetti N7".into();
        changed.quantity = 3;

        let updated = product.updated_with(&changed).unwrap();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.status, ProductStatus::Active);
        assert_eq!(updated.metadata.created_at, product.metadata.created_at);
        assert_eq!(updated.metadata.version, 1);
        assert_eq!(updated.name, "Spaghetti N7");
        assert!(!product.key_differs(&changed));
    }

    #[test]
    fn update_refused_once_not_active() {
        let mut product = Product::new_for_insert(&dto()).unwrap();
        product.status = ProductStatus::Discarded;
        let err = product.updated_with(&dto()).unwrap_err();
        assert!(err.contains("DISCARDED"));
    }

    #[test]
    fn status_transitions() {
        use ProductStatus::*;
        assert!(Active.can_transition_to(Sold));
        assert!(Active.can_transition_to(Discarded));
        for from in [Sold, Discarded] {
            for to in [Active, Sold, Discarded] {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
        assert!(!Active.can_transition_to(Active));
        assert_eq!(Active.transition_to(Discarded), Ok(Discarded));
        assert!(Discarded.transition_to(Active).is_err());
    }

    #[test]
    fn status_string_round_trip() {
        for status in [ProductStatus::Active, ProductStatus::Sold, ProductStatus::Discarded] {
            assert_eq!(status.as_str().parse::<ProductStatus>(), Ok(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert!("active".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn expiry_checks() {
        let mut d = dto();
        d.expiry_date = today();
        let product = Product::new_for_insert(&d).unwrap();
        assert!(!product.is_expired_on(today()));
        assert!(product.is_expired_on(today() + Duration::days(1)));
    }

    #[test]
    fn about_to_expire_window_is_half_open() {
        let product = Product::new_for_insert(&dto()).unwrap(); // expires today + 5
        assert!(product.is_about_to_expire_on(6, today()));
        assert!(!product.is_about_to_expire_on(5, today()));
        assert!(!product.is_about_to_expire_on(-1, today()));
        // already expired
        assert!(!product.is_about_to_expire_on(30, today() + Duration::days(6)));
        // expiring today counts
        assert!(product.is_about_to_expire_on(1, today() + Duration::days(5)));
    }

    #[test]
    fn huge_threshold_means_no_upper_bound() {
        let product = Product::new_for_insert(&dto()).unwrap();
        assert!(product.is_about_to_expire_on(i32::MAX, today()));
        // уже истёкшая партия не попадает в окно даже без верхней границы
        assert!(!product.is_about_to_expire_on(i32::MAX, NaiveDate::MAX));
    }

    #[test]
    fn about_to_expire_is_false_for_inactive_products() {
        let mut product = Product::new_for_insert(&dto()).unwrap();
        for status in [ProductStatus::Sold, ProductStatus::Discarded] {
            product.status = status;
            assert!(!product.is_about_to_expire_on(30, today()));
        }
    }

    #[test]
    fn dto_uses_camel_case_dates() {
        let json = serde_json::to_value(dto()).unwrap();
        assert_eq!(json["expiryDate"], "2026-03-15");
    }
}
