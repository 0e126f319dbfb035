use std::sync::Arc;

use tracing::info;

use crate::application::CatalogRepository;
use crate::domain::{DomainError, FilterSpec, Product, ProductInput};

pub struct ManageProductsUseCase {
    catalog_repo: Arc<dyn CatalogRepository>,
}

impl ManageProductsUseCase {
    pub fn new(catalog_repo: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog_repo }
    }

    pub async fn create(&self, input: ProductInput) -> Result<Product, DomainError> {
        let product = input.into_product()?;
        self.catalog_repo.insert(&product).await?;
        info!("Created product {} ({})", product.name, product.id);
        Ok(product)
    }

    /// Create every product, stopping at the first invalid one.
    pub async fn import(&self, inputs: Vec<ProductInput>) -> Result<Vec<Product>, DomainError> {
        let mut created = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.into_iter().enumerate() {
            let product = input.into_product().map_err(|e| {
                DomainError::invalid_input(format!("Product #{} is invalid: {}", i + 1, e))
            })?;
            self.catalog_repo.insert(&product).await?;
            created.push(product);
        }
        info!("Imported {} products", created.len());
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.catalog_repo.find(&FilterSpec::all()).await
    }

    pub async fn get(&self, id: &str) -> Result<Product, DomainError> {
        self.catalog_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Product not found: {}", id)))
    }

    pub async fn update(&self, id: &str, input: ProductInput) -> Result<Product, DomainError> {
        input.validate_for_update()?;

        let mut product = self.get(id).await?;
        input.apply_to(&mut product)?;

        if !self.catalog_repo.update(&product).await? {
            return Err(DomainError::not_found(format!("Product not found: {}", id)));
        }
        info!("Updated product {}", id);
        Ok(product)
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        if !self.catalog_repo.delete(id).await? {
            return Err(DomainError::not_found(format!("Product not found: {}", id)));
        }
        info!("Deleted product {}", id);
        Ok(())
    }
}
