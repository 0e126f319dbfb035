pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AuthenticateUseCase, CatalogRepository, ChatClient, FilterPromptBuilder,
    ManageProductsUseCase, ManageUsersUseCase, SearchProductsUseCase, UserMutation, UserRepository,
};

pub use cli::Commands;

pub use connector::{
    AnthropicClient, Container, ContainerConfig, DocumentFilter, DuckdbCatalogRepository,
    DuckdbUserRepository, InMemoryCatalogRepository, InMemoryUserRepository, OpenAiClient, Router,
    ScriptedChatClient,
};

pub use domain::{
    CatalogSchema, ChatCompletion, ChatRequest, DomainError, FilterSpec, Product, ProductInput,
    SamplingConfig, SearchOutcome, SearchRequest, User,
};
