pub mod container;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod http;
pub mod router;
pub mod session;
pub mod settings;

pub use container::{Container, ContainerConfig};
pub use error::ApiError;
pub use http::{create_router, serve};
pub use router::Router;
pub use session::JwtService;
pub use settings::{HttpSettings, LlmProvider, SearchSettings};
