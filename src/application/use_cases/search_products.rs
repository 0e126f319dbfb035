use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::filter_prompt::FilterPromptBuilder;
use super::sanitize_response::sanitize_response;
use super::validate_filter::validate_filter;
use crate::application::{CatalogRepository, ChatClient};
use crate::domain::{
    CatalogSchema, ChatCompletion, ChatRequest, DomainError, SamplingConfig, SearchOutcome,
    SearchRequest,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Natural-language product search.
///
/// One call runs `prompt -> model -> sanitize -> validate -> store query` exactly
/// once. Nothing is retried: an upstream failure is reported straight away and
/// the user can resubmit. The use case holds no per-call state, so it can be
/// shared freely between concurrent requests.
pub struct SearchProductsUseCase {
    chat_client: Arc<dyn ChatClient>,
    catalog_repo: Arc<dyn CatalogRepository>,
    prompt_builder: FilterPromptBuilder,
    sampling: SamplingConfig,
    timeout: Duration,
}

impl SearchProductsUseCase {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        catalog_repo: Arc<dyn CatalogRepository>,
        schema: Arc<CatalogSchema>,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            chat_client,
            catalog_repo,
            prompt_builder: FilterPromptBuilder::new(schema),
            sampling,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn execute(&self, request: &SearchRequest) -> SearchOutcome {
        let Some(message) = request.message() else {
            info!("Rejecting search without a message");
            return SearchOutcome::missing_input();
        };

        info!(
            "Searching catalog for: {:?} (provider={}, model={})",
            message,
            self.chat_client.provider(),
            self.sampling.model
        );
        let start_time = Instant::now();

        let prompt = self.prompt_builder.build(message);
        let chat_request = ChatRequest::new(prompt.into_messages(), &self.sampling);

        let completion = match self.complete(&chat_request).await {
            Ok(completion) => completion,
            Err(e) => {
                error!("Filter generation failed: {e}");
                return SearchOutcome::upstream_error();
            }
        };

        debug!("Raw model response: {}", completion.text);
        if completion.is_truncated() {
            warn!(
                "Model output hit the {} token limit; parsing it anyway",
                self.sampling.max_tokens
            );
        }

        let filter = match validate_filter(sanitize_response(&completion.text)) {
            Ok(filter) => filter,
            Err(rejection) => {
                warn!("Rejected model output: {rejection}");
                return rejection.into_outcome();
            }
        };

        info!("Querying catalog with filter {filter}");

        let products = match self.catalog_repo.find(&filter).await {
            Ok(products) => products,
            Err(e) => {
                error!("Catalog query failed for filter {filter}: {e}");
                return SearchOutcome::upstream_error();
            }
        };

        info!(
            "Found {} products in {:.2}s",
            products.len(),
            start_time.elapsed().as_secs_f64()
        );

        if products.is_empty() {
            SearchOutcome::no_match()
        } else {
            SearchOutcome::success(products)
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, DomainError> {
        match tokio::time::timeout(self.timeout, self.chat_client.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Timeout(self.timeout.as_secs())),
        }
    }
}
