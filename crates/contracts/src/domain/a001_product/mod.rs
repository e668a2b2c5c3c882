pub mod aggregate;
pub mod criteria;

pub use aggregate::{Product, ProductDto, ProductId, ProductStatus};
pub use criteria::ProductSearchCriteria;
