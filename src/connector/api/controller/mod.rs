pub mod import_controller;
pub mod products_controller;
pub mod search_controller;

pub use import_controller::ImportController;
pub use products_controller::ProductsController;
pub use search_controller::SearchController;
