use std::fmt::Write;
use std::sync::Arc;

use crate::domain::{CatalogSchema, ChatMessage};

/// Last line of every user prompt.
pub const JSON_ONLY_DIRECTIVE: &str = "Respond with JSON only.";

const SYSTEM_PROMPT: &str = "\
You are an expert at converting natural-language shopping requests into MongoDB \
filter objects for an e-commerce product catalog. You only ever answer with a \
single JSON object that can be passed directly to a find() query.";

/// The two messages sent to the model for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPrompt {
    pub system: String,
    pub user: String,
}

impl FilterPrompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system), ChatMessage::user(self.user)]
    }
}

/// Builds the filter-generation prompt from the user's message and the
/// catalog schema. Pure: the same message and schema always give the same prompt.
#[derive(Debug, Clone)]
pub struct FilterPromptBuilder {
    schema: Arc<CatalogSchema>,
}

impl FilterPromptBuilder {
    pub fn new(schema: Arc<CatalogSchema>) -> Self {
        Self { schema }
    }

    pub fn build(&self, message: &str) -> FilterPrompt {
        FilterPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user: self.user_prompt(message),
        }
    }

    fn user_prompt(&self, message: &str) -> String {
        // Writing to a String cannot fail.
        let mut out = String::new();

        let _ = writeln!(out, "The user provided the following request: \"{message}\"");
        out.push('\n');
        out.push_str(
            "Create a MongoDB filter object that finds the matching products.\n\n",
        );

        out.push_str("Recognized product fields:\n");
        for field in &self.schema.fields {
            if field.description.is_empty() {
                let _ = writeln!(out, "- {} ({})", field.name, field.field_type);
            } else {
                let _ = writeln!(
                    out,
                    "- {} ({}): {}",
                    field.name, field.field_type, field.description
                );
            }
        }
        out.push('\n');

        if !self.schema.categories.is_empty() {
            out.push_str("Category taxonomy (category: subcategories):\n");
            for category in &self.schema.categories {
                if category.subcategories.is_empty() {
                    let _ = writeln!(out, "- {}", category.name);
                } else {
                    let _ = writeln!(
                        out,
                        "- {}: {}",
                        category.name,
                        category.subcategories.join(", ")
                    );
                }
            }
            out.push_str(
                "A request for a subcategory must be translated to its parent category \
                 in the \"category\" field; put the subcategory words in a \"name\" or \
                 \"description\" match instead.\n\n",
            );
        }

        out.push_str("Rules for building the filter:\n");
        out.push_str(
            "1. Only use the fields listed above. Include only the fields the request mentions.\n",
        );
        out.push_str(
            "2. category: case-insensitive match on the parent category, e.g. \
             {\"category\": {\"$regex\": \"Furniture\", \"$options\": \"i\"}}.\n",
        );
        out.push_str(
            "3. name, description, color, brand: case-insensitive partial match, e.g. \
             {\"color\": {\"$regex\": \"red\", \"$options\": \"i\"}}.\n",
        );
        out.push_str(
            "4. price and stock: numeric ranges with $gte / $lte / $gt / $lt, e.g. \
             {\"price\": {\"$lte\": 200}}. Exact values use plain equality.\n",
        );
        out.push_str(
            "5. dimensions: use dotted paths with numeric ranges, e.g. \
             {\"dimensions.width\": {\"$lte\": 80}}.\n",
        );
        out.push_str(
            "6. discount: boolean equality, {\"discount\": true} for products on sale.\n",
        );
        out.push_str(
            "7. Several alternatives for one field use $or or $in.\n\n",
        );

        out.push_str("Output format:\n");
        out.push_str("- Return only the JSON filter object. No explanations, no prose.\n");
        out.push_str("- Do not wrap the answer in markdown or code fences.\n");
        out.push_str("- The answer must start with { and end with }.\n");
        out.push_str(JSON_ONLY_DIRECTIVE);

        out
    }
}
