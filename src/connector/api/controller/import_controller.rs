use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::ProductInput;

use super::super::Container;

pub struct ImportController<'a> {
    container: &'a Container,
}

impl<'a> ImportController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Bulk-create products from a JSON array of product documents.
    pub async fn import(&self, path: String) -> Result<String> {
        let raw = std::fs::read_to_string(Path::new(&path))
            .with_context(|| format!("Failed to read {}", path))?;
        let inputs: Vec<ProductInput> = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a JSON array of products", path))?;

        info!("Importing {} products from {}", inputs.len(), path);
        let created = self.container.products_use_case().import(inputs).await?;
        Ok(format!("Imported {} products.", created.len()))
    }
}
