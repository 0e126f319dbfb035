use anyhow::Result;
use serde_json::json;

use crate::connector::api::handlers::search::{outcome_body, outcome_status};
use crate::domain::SearchRequest;

use super::super::Container;

pub struct SearchController<'a> {
    container: &'a Container,
}

impl<'a> SearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Run one search and render the outcome as the HTTP API would answer it.
    pub async fn search(&self, message: String) -> Result<String> {
        let use_case = self.container.search_use_case();
        let outcome = use_case.execute(&SearchRequest::new(message)).await;

        let rendered = json!({
            "status": outcome_status(&outcome).as_u16(),
            "body": outcome_body(&outcome),
        });
        Ok(serde_json::to_string_pretty(&rendered)?)
    }
}
