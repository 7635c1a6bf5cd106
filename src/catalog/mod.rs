//! Product catalog access
//!
//! [`ProductSource`] is the seam between the storefront and the remote product
//! API. [`ProductApi`] talks HTTP; [`CachedCatalog`] wraps any source with a
//! query cache that mutations invalidate by tag.

mod cache;
mod client;
mod error;
mod types;

pub use cache::{CacheTag, CachedCatalog};
pub use client::ProductApi;
pub use error::ApiError;
pub use types::{Category, Product, ProductDraft, UploadedFile};

use crate::cart::ProductId;
use async_trait::async_trait;
use std::path::Path;

/// Read and write access to the product catalog
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError>;

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError>;

    async fn update_product(&self, id: ProductId, draft: &ProductDraft)
        -> Result<Product, ApiError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError>;

    /// Upload a local file; the returned location can be used as an image URL
    async fn upload_file(&self, path: &Path) -> Result<UploadedFile, ApiError>;
}
