mod catalog_repository;
mod chat_client;
mod user_repository;

pub use catalog_repository::*;
pub use chat_client::*;
pub use user_repository::*;
