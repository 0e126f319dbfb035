use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::DocumentFilter;
use crate::application::CatalogRepository;
use crate::domain::{DomainError, FilterSpec, Product};

pub struct InMemoryCatalogRepository {
    products: Arc<Mutex<HashMap<String, Product>>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            products: Arc::new(Mutex::new(map)),
        }
    }
}

impl Default for InMemoryCatalogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn find(&self, filter: &FilterSpec) -> Result<Vec<Product>, DomainError> {
        let compiled = DocumentFilter::compile(filter)?;
        let store = self.products.lock().await;

        let mut results: Vec<Product> = store
            .values()
            .filter(|product| compiled.matches(&product.to_document()))
            .cloned()
            .collect();
        // Insertion order, like the document store's natural order.
        results.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        debug!("Filter matched {} of {} products", results.len(), store.len());
        Ok(results)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, DomainError> {
        let store = self.products.lock().await;
        Ok(store.get(id).cloned())
    }

    async fn insert(&self, product: &Product) -> Result<(), DomainError> {
        let mut store = self.products.lock().await;
        if store.contains_key(&product.id) {
            return Err(DomainError::already_exists(format!(
                "Product already exists: {}",
                product.id
            )));
        }
        store.insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, DomainError> {
        let mut store = self.products.lock().await;
        match store.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut store = self.products.lock().await;
        Ok(store.remove(id).is_some())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let store = self.products.lock().await;
        Ok(store.len() as u64)
    }
}
