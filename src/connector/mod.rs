//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Catalog and user stores (in-memory, DuckDB)
//! - LLM chat clients (OpenAI, Anthropic, scripted)
//! - HTTP API and CLI routing

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
