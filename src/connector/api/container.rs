use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::session::JwtService;
use super::settings::{HttpSettings, LlmProvider, SearchSettings};
use crate::application::{
    AuthenticateUseCase, CatalogRepository, ChatClient, ManageProductsUseCase,
    ManageUsersUseCase, SearchProductsUseCase, UserRepository,
};
use crate::connector::adapter::{
    AnthropicClient, DuckdbCatalogRepository, DuckdbUserRepository, InMemoryCatalogRepository,
    InMemoryUserRepository, OpenAiClient, ScriptedChatClient,
};
use crate::domain::CatalogSchema;

const DATABASE_FILE: &str = "storefront.duckdb";

pub struct ContainerConfig {
    pub data_dir: String,
    pub memory_storage: bool,
    /// Use the offline scripted chat client instead of a real provider.
    pub mock_llm: bool,
    /// JSON file overriding the built-in catalog schema.
    pub schema_path: Option<String>,
}

pub struct Container {
    catalog_repo: Arc<dyn CatalogRepository>,
    user_repo: Arc<dyn UserRepository>,
    chat_client: Arc<dyn ChatClient>,
    schema: Arc<CatalogSchema>,
    search: SearchSettings,
    http: HttpSettings,
    jwt: JwtService,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let schema = match config.schema_path.as_deref() {
            Some(path) => {
                debug!("Loading catalog schema from {}", path);
                CatalogSchema::from_json_file(Path::new(path))
                    .with_context(|| format!("Failed to load catalog schema from {}", path))?
            }
            None => CatalogSchema::default(),
        };
        debug!(
            "Catalog schema: fields [{}], {} categories",
            schema.field_names().join(", "),
            schema.categories.len()
        );

        let (catalog_repo, user_repo) = Self::open_stores(&config).await?;

        let search = SearchSettings::from_env();
        let chat_client: Arc<dyn ChatClient> = if config.mock_llm {
            debug!("Using scripted chat client");
            Arc::new(ScriptedChatClient::match_all())
        } else {
            match search.provider {
                LlmProvider::OpenAi => Arc::new(OpenAiClient::from_env(search.timeout)),
                LlmProvider::Anthropic => Arc::new(AnthropicClient::from_env(search.timeout)),
            }
        };
        info!(
            "Search uses {} model {} (temperature {}, timeout {:?})",
            chat_client.provider(),
            search.sampling.model,
            search.sampling.temperature,
            search.timeout
        );

        Ok(Self::from_parts(
            catalog_repo,
            user_repo,
            chat_client,
            Arc::new(schema),
            search,
            HttpSettings::from_env(),
        ))
    }

    /// Assemble a container from already-built components.
    pub fn from_parts(
        catalog_repo: Arc<dyn CatalogRepository>,
        user_repo: Arc<dyn UserRepository>,
        chat_client: Arc<dyn ChatClient>,
        schema: Arc<CatalogSchema>,
        search: SearchSettings,
        http: HttpSettings,
    ) -> Self {
        let jwt = JwtService::new(&http.session_secret);
        Self {
            catalog_repo,
            user_repo,
            chat_client,
            schema,
            search,
            http,
            jwt,
        }
    }

    async fn open_stores(
        config: &ContainerConfig,
    ) -> Result<(Arc<dyn CatalogRepository>, Arc<dyn UserRepository>)> {
        if config.memory_storage {
            debug!("Using in-memory storage");
            return Ok(Self::in_memory_stores());
        }

        let db_path = PathBuf::from(&config.data_dir).join(DATABASE_FILE);
        match DuckdbCatalogRepository::new(&db_path) {
            Ok(catalog) => {
                debug!("Using DuckDB storage at {:?}", db_path);
                // Share the connection with the user store
                let users =
                    DuckdbUserRepository::with_connection(catalog.shared_connection()).await?;
                Ok((Arc::new(catalog), Arc::new(users)))
            }
            Err(e) => {
                warn!(
                    "Failed to initialize DuckDB ({}): {}. Falling back to in-memory storage.",
                    db_path.display(),
                    e
                );
                Ok(Self::in_memory_stores())
            }
        }
    }

    fn in_memory_stores() -> (Arc<dyn CatalogRepository>, Arc<dyn UserRepository>) {
        (
            Arc::new(InMemoryCatalogRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }

    pub fn search_use_case(&self) -> SearchProductsUseCase {
        SearchProductsUseCase::new(
            self.chat_client.clone(),
            self.catalog_repo.clone(),
            self.schema.clone(),
            self.search.sampling.clone(),
        )
        .with_timeout(self.search.timeout)
    }

    pub fn products_use_case(&self) -> ManageProductsUseCase {
        ManageProductsUseCase::new(self.catalog_repo.clone())
    }

    pub fn users_use_case(&self) -> ManageUsersUseCase {
        ManageUsersUseCase::new(self.user_repo.clone(), self.catalog_repo.clone())
    }

    pub fn auth_use_case(&self) -> AuthenticateUseCase {
        AuthenticateUseCase::new(self.user_repo.clone())
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.http.allowed_origins
    }
}
