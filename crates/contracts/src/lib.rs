//! Общие типы системы учёта сроков годности.
//!
//! Крейт не зависит от хранилища и транспорта: здесь живут агрегаты, DTO,
//! критерии поиска и конверт постраничного результата.

pub mod domain;
pub mod shared;
pub mod system;
