//! In-memory product source for unit tests

use crate::cart::ProductId;
use crate::catalog::{ApiError, Category, Product, ProductDraft, ProductSource, UploadedFile};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) struct MemorySource {
    products: Mutex<Vec<Product>>,
    reads: AtomicUsize,
    fail_writes: bool,
}

impl MemorySource {
    /// Products 1..=count titled "Product N" priced N * 10
    pub(crate) fn with_products(count: u64) -> Self {
        let products = (1..=count)
            .map(|id| Product {
                id,
                title: format!("Product {}", id),
                price: id as f64 * 10.0,
                description: format!("Description of product {}", id),
                images: vec![format!("https://img.example/{}.jpg", id)],
                category: Some(Category {
                    id: 36,
                    name: "Misc".to_string(),
                    image: String::new(),
                }),
                creation_at: None,
                updated_at: None,
            })
            .collect();

        Self {
            products: Mutex::new(products),
            reads: AtomicUsize::new(0),
            fail_writes: false,
        }
    }

    /// Every create, update and delete answers with a service error
    pub(crate) fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub(crate) fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), ApiError> {
        if self.fail_writes {
            Err(ApiError::ServiceError("writes disabled".to_string()))
        } else {
            Ok(())
        }
    }

    fn from_draft(id: ProductId, draft: &ProductDraft) -> Product {
        Product {
            id,
            title: draft.title.clone(),
            price: draft.price,
            description: draft.description.clone(),
            images: draft.images.clone(),
            category: Some(Category {
                id: draft.category_id,
                name: "Misc".to_string(),
                image: String::new(),
            }),
            creation_at: None,
            updated_at: None,
        }
    }
}

#[async_trait]
impl ProductSource for MemorySource {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::ProductNotFound(id))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.check_writable()?;
        let mut products = self.products.lock().unwrap();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = Self::from_draft(id, draft);
        products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        self.check_writable()?;
        let mut products = self.products.lock().unwrap();
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::ProductNotFound(id))?;
        *slot = Self::from_draft(id, draft);
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.check_writable()?;
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(ApiError::ProductNotFound(id));
        }
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<UploadedFile, ApiError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(UploadedFile {
            originalname: name.clone(),
            filename: format!("stored-{}", name),
            location: format!("https://files.example/stored-{}", name),
        })
    }
}
