//! Product form state and validation

use crate::catalog::{Product, ProductDraft};
use thiserror::Error;
use url::Url;

/// Category used when none is chosen
pub const DEFAULT_CATEGORY_ID: u64 = 36;

/// Image seeded when editing a product that has none
pub const DEFAULT_IMAGE_URL: &str = "https://placehold.co/600x400";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Price must be positive")]
    InvalidPrice,

    #[error("Category ID is required")]
    CategoryRequired,

    #[error("At least one image URL is required")]
    ImagesRequired,

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: u64,
    pub images: Vec<String>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            price: 0.0,
            description: String::new(),
            category_id: DEFAULT_CATEGORY_ID,
            images: Vec::new(),
        }
    }
}

impl ProductForm {
    /// Pre-fill the form for editing an existing product
    pub fn from_product(product: &Product) -> Self {
        let images = if product.images.is_empty() {
            vec![DEFAULT_IMAGE_URL.to_string()]
        } else {
            product.images.clone()
        };

        Self {
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            category_id: product
                .category
                .as_ref()
                .map(|c| c.id)
                .filter(|id| *id > 0)
                .unwrap_or(DEFAULT_CATEGORY_ID),
            images,
        }
    }

    /// Set the price from free text; anything unparseable becomes 0
    pub fn set_price_text(&mut self, text: &str) {
        self.price = parse_price(text);
    }

    /// Append an image if `url` is a non-blank absolute URL
    pub fn add_image(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || !is_valid_url(url) {
            return false;
        }
        self.images.push(url.to_string());
        true
    }

    /// Remove the image at `index`; out of range is a no-op
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Check every field and produce the request body
    pub fn validate(&self) -> Result<ProductDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::TitleRequired);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(FormError::InvalidPrice);
        }
        if self.category_id < 1 {
            return Err(FormError::CategoryRequired);
        }
        if self.images.is_empty() {
            return Err(FormError::ImagesRequired);
        }
        if let Some(bad) = self.images.iter().find(|url| !is_valid_url(url)) {
            return Err(FormError::InvalidImageUrl(bad.clone()));
        }

        Ok(ProductDraft {
            title: title.to_string(),
            price: self.price,
            description: self.description.clone(),
            category_id: self.category_id,
            images: self.images.clone(),
        })
    }
}

pub fn parse_price(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .unwrap_or(0.0)
}

fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}
