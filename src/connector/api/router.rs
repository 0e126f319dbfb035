use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{ImportController, ProductsController, SearchController};

/// Routes one-shot CLI commands to their controllers.
pub struct Router<'a> {
    search_controller: SearchController<'a>,
    products_controller: ProductsController<'a>,
    import_controller: ImportController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            search_controller: SearchController::new(container),
            products_controller: ProductsController::new(container),
            import_controller: ImportController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Search { message } => self.search_controller.search(message).await,
            Commands::Import { path } => self.import_controller.import(path).await,
            Commands::Products => self.products_controller.list().await,
            Commands::Serve { .. } => {
                anyhow::bail!("The serve command is handled by the binary entry point")
            }
        }
    }
}
