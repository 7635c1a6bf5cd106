//! Product API wire types

use crate::cart::{ProductId, ProductSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The fields the cart copies when this product is added
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            title: self.title.clone(),
            price: self.price,
            images: self.images.clone(),
        }
    }

    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("-")
    }
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: u64,
    pub images: Vec<String>,
}

/// Result of a file upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub originalname: String,
    pub filename: String,
    pub location: String,
}

/// The product list endpoint answers either with a bare array or wrapped in
/// a `products` field depending on the backend.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProductList {
    Bare(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl From<ProductList> for Vec<Product> {
    fn from(list: ProductList) -> Self {
        match list {
            ProductList::Bare(products) | ProductList::Wrapped { products } => products,
        }
    }
}
