use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Value type of a product field, as described to the language model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Integer => "Integer",
            FieldType::Boolean => "Boolean",
            FieldType::Object => "Object",
            FieldType::Array => "Array",
            FieldType::Date => "Date",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub description: String,
}

impl FieldSpec {
    pub fn new(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl CategoryNode {
    pub fn new(name: &str, subcategories: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            subcategories: subcategories.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The recognized product fields and the category taxonomy that the search
/// prompt documents to the model.
///
/// Kept separate from the prompt text so the taxonomy can evolve (or be loaded
/// from a JSON file with `--schema`) without touching prompt formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSchema {
    pub fields: Vec<FieldSpec>,
    pub categories: Vec<CategoryNode>,
}

impl CatalogSchema {
    pub fn new(fields: Vec<FieldSpec>, categories: Vec<CategoryNode>) -> Self {
        Self { fields, categories }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path)?;
        let schema: CatalogSchema = serde_json::from_str(&raw).map_err(|e| {
            DomainError::invalid_input(format!(
                "Invalid catalog schema in {}: {}",
                path.display(),
                e
            ))
        })?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Resolve a subcategory to the category that owns it (case-insensitive).
    pub fn parent_category(&self, subcategory: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| {
                c.subcategories
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(subcategory))
            })
            .map(|c| c.name.as_str())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.fields.is_empty() {
            return Err(DomainError::invalid_input(
                "Catalog schema must declare at least one field",
            ));
        }

        let mut fields = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(DomainError::invalid_input("Field names must not be empty"));
            }
            if !fields.insert(field.name.as_str()) {
                return Err(DomainError::invalid_input(format!(
                    "Duplicate field: {}",
                    field.name
                )));
            }
        }

        let mut categories = HashSet::new();
        let mut subcategories = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(DomainError::invalid_input(
                    "Category names must not be empty",
                ));
            }
            if !categories.insert(category.name.to_lowercase()) {
                return Err(DomainError::invalid_input(format!(
                    "Duplicate category: {}",
                    category.name
                )));
            }
            for sub in &category.subcategories {
                if !subcategories.insert(sub.to_lowercase()) {
                    return Err(DomainError::invalid_input(format!(
                        "Subcategory '{}' belongs to more than one category",
                        sub
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for CatalogSchema {
    fn default() -> Self {
        use FieldType::*;

        let fields = vec![
            FieldSpec::new("name", String, "Product name"),
            FieldSpec::new("category", String, "Top-level category from the taxonomy"),
            FieldSpec::new("description", String, "Free-text product description"),
            FieldSpec::new("price", Number, "Unit price"),
            FieldSpec::new("currency", String, "ISO currency code, usually USD"),
            FieldSpec::new("stock", Integer, "Units available"),
            FieldSpec::new("color", String, "Main color"),
            FieldSpec::new(
                "dimensions",
                Object,
                "Size in cm: { width: Number, length: Number, height: Number }",
            ),
            FieldSpec::new("brand", String, "Manufacturer or brand name"),
            FieldSpec::new("discount", Boolean, "true when the product is on sale"),
            FieldSpec::new("createdAt", Date, "When the product was listed"),
            FieldSpec::new("updatedAt", Date, "When the product was last changed"),
        ];

        let categories = vec![
            CategoryNode::new(
                "Furniture",
                &["Chairs", "Office Chairs", "Tables", "Desks", "Sofas", "Beds", "Wardrobes"],
            ),
            CategoryNode::new("Storage", &["Shelves", "Bookcases", "Cabinets", "Drawers"]),
            CategoryNode::new(
                "Lighting",
                &["Floor Lamps", "Table Lamps", "Ceiling Lights", "Wall Lights"],
            ),
            CategoryNode::new("Decor", &["Rugs", "Mirrors", "Vases", "Cushions", "Wall Art"]),
            CategoryNode::new("Outdoor", &["Garden Furniture", "Parasols", "Planters"]),
            CategoryNode::new(
                "Kitchen",
                &["Dining Sets", "Bar Stools", "Kitchen Islands", "Cookware"],
            ),
        ];

        Self { fields, categories }
    }
}
