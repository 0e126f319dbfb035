use async_trait::async_trait;

use crate::domain::{DomainError, FilterSpec, Product};

/// Product persistence and filter-based lookup.
///
/// The store is the final authority on what a [`FilterSpec`] matches: fields it
/// does not know simply match nothing, and operators it cannot evaluate are
/// reported as [`DomainError::InvalidInput`].
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find(&self, filter: &FilterSpec) -> Result<Vec<Product>, DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, DomainError>;

    async fn insert(&self, product: &Product) -> Result<(), DomainError>;

    /// Replace a stored product. Returns `false` when the id is unknown.
    async fn update(&self, product: &Product) -> Result<bool, DomainError>;

    /// Returns `false` when the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
