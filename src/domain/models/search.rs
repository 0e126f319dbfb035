use serde::{Deserialize, Serialize};

use super::Product;

pub const MISSING_MESSAGE: &str = "Please provide a search message.";
pub const INVALID_FILTER_MESSAGE: &str = "Invalid filter generated. Please provide more details.";
pub const NO_MATCH_MESSAGE: &str = "No matching products found.";
pub const UPSTREAM_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// Shown when the request could not be turned into a usable filter.
pub const INVALID_FILTER_SUGGESTIONS: [&str; 5] = [
    "Name a product category, for example 'chairs', 'tables' or 'lamps'",
    "Include a price range, for example 'under $200' or 'between $50 and $150'",
    "Mention a color, for example 'black', 'white' or 'oak'",
    "Mention a brand you are interested in",
    "Describe specific features, for example 'ergonomic', 'foldable' or 'on sale'",
];

/// Shown when the filter was understood but nothing in the catalog matched.
pub const NO_MATCH_SUGGESTIONS: [&str; 4] = [
    "Try a wider price range",
    "Use a broader category, for example 'furniture' instead of 'office chairs'",
    "Remove the color or brand from your search",
    "Check the spelling of product names and brands",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl SearchRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The message, if present and not blank.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Result of one natural-language search. Exactly one variant holds.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success {
        count: usize,
        products: Vec<Product>,
    },
    MissingInput {
        message: String,
    },
    InvalidFilter {
        message: String,
        suggestions: Vec<String>,
    },
    NoMatch {
        message: String,
        suggestions: Vec<String>,
    },
    UpstreamError {
        message: String,
    },
}

impl SearchOutcome {
    pub fn success(products: Vec<Product>) -> Self {
        SearchOutcome::Success {
            count: products.len(),
            products,
        }
    }

    pub fn missing_input() -> Self {
        SearchOutcome::MissingInput {
            message: MISSING_MESSAGE.to_string(),
        }
    }

    pub fn invalid_filter() -> Self {
        SearchOutcome::InvalidFilter {
            message: INVALID_FILTER_MESSAGE.to_string(),
            suggestions: INVALID_FILTER_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn no_match() -> Self {
        SearchOutcome::NoMatch {
            message: NO_MATCH_MESSAGE.to_string(),
            suggestions: NO_MATCH_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn upstream_error() -> Self {
        SearchOutcome::UpstreamError {
            message: UPSTREAM_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchOutcome::Success { .. } => "success",
            SearchOutcome::MissingInput { .. } => "missing_input",
            SearchOutcome::InvalidFilter { .. } => "invalid_filter",
            SearchOutcome::NoMatch { .. } => "no_match",
            SearchOutcome::UpstreamError { .. } => "upstream_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success { .. })
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            SearchOutcome::InvalidFilter { suggestions, .. }
            | SearchOutcome::NoMatch { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}
