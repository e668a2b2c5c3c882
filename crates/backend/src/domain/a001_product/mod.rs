//! Товарные партии: хранение, поиск и сценарии изменения

pub mod error;
pub mod filters;
pub mod repository;
pub mod service;
pub mod visibility;

pub use error::ProductError;
