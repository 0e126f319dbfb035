use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

pub const DEFAULT_CURRENCY: &str = "USD";

const CREATE_REQUIRED: &str =
    "Please provide all required fields: name, category, price, stock, modelSrc, and iOSSrc.";
const UPDATE_REQUIRED: &str = "Please provide all required fields: name, category, price, stock.";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A 3D-viewer hotspot attached to the product model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A catalog document. Field names on the wire are the document store's
/// camelCase names, which are also the names filters refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub stock: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub model_src: String,
    #[serde(rename = "iOSSrc")]
    pub ios_src: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub discount: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The document as the store sees it, used for filter evaluation.
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Create / replace payload. Everything is optional so that missing required
/// fields produce a domain error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub stock: Option<i64>,
    pub color: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub model_src: Option<String>,
    #[serde(rename = "iOSSrc")]
    pub ios_src: Option<String>,
    pub annotations: Option<Vec<Annotation>>,
    pub brand: Option<String>,
    pub discount: Option<bool>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl ProductInput {
    fn has_core_fields(&self) -> bool {
        present(&self.name)
            && present(&self.category)
            && self.price.is_some_and(|p| p > 0.0)
            && self.stock.is_some()
    }

    pub fn validate_for_create(&self) -> Result<(), DomainError> {
        if self.has_core_fields() && present(&self.model_src) && present(&self.ios_src) {
            Ok(())
        } else {
            Err(DomainError::invalid_input(CREATE_REQUIRED))
        }
    }

    pub fn validate_for_update(&self) -> Result<(), DomainError> {
        if self.has_core_fields() {
            Ok(())
        } else {
            Err(DomainError::invalid_input(UPDATE_REQUIRED))
        }
    }

    pub fn into_product(self) -> Result<Product, DomainError> {
        self.validate_for_create()?;
        let now = Utc::now();
        Ok(Product {
            id: Uuid::new_v4().to_string(),
            name: self.name.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            description: self.description,
            price: self.price.unwrap_or_default(),
            currency: self.currency.unwrap_or_else(default_currency),
            stock: self.stock.unwrap_or_default(),
            color: self.color,
            dimensions: self.dimensions,
            model_src: self.model_src.unwrap_or_default(),
            ios_src: self.ios_src.unwrap_or_default(),
            annotations: self.annotations.unwrap_or_default(),
            brand: self.brand,
            discount: self.discount.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite the fields present in the payload, leaving the rest intact.
    pub fn apply_to(self, product: &mut Product) -> Result<(), DomainError> {
        self.validate_for_update()?;

        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if self.description.is_some() {
            product.description = self.description;
        }
        if let Some(currency) = self.currency {
            product.currency = currency;
        }
        if self.color.is_some() {
            product.color = self.color;
        }
        if self.dimensions.is_some() {
            product.dimensions = self.dimensions;
        }
        if let Some(model_src) = self.model_src {
            product.model_src = model_src;
        }
        if let Some(ios_src) = self.ios_src {
            product.ios_src = ios_src;
        }
        if let Some(annotations) = self.annotations {
            product.annotations = annotations;
        }
        if self.brand.is_some() {
            product.brand = self.brand;
        }
        if let Some(discount) = self.discount {
            product.discount = discount;
        }

        product.touch();
        Ok(())
    }
}
