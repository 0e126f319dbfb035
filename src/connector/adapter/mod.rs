mod anthropic_client;
mod document_filter;
mod duckdb_catalog_repository;
mod duckdb_user_repository;
mod in_memory_catalog_repository;
mod in_memory_user_repository;
mod openai_client;
mod scripted_chat_client;

pub use anthropic_client::AnthropicClient;
pub use document_filter::*;
pub use duckdb_catalog_repository::*;
pub use duckdb_user_repository::*;
pub use in_memory_catalog_repository::*;
pub use in_memory_user_repository::*;
pub use openai_client::OpenAiClient;
pub use scripted_chat_client::*;

pub mod anthropic {
    pub use super::anthropic_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
}

pub mod openai {
    pub use super::openai_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
}
