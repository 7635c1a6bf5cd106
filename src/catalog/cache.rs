//! Query cache with tag-based invalidation
//!
//! Each cached query provides one or more tags. Mutations name the tags they
//! make stale and every entry carrying one of them is dropped, so the next
//! read goes back to the source. Entries expire after a TTL and the cache
//! holds at most `max_entries` queries.

use super::{ApiError, Product, ProductDraft, ProductSource, UploadedFile};
use crate::cart::ProductId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    ProductList,
    Product(ProductId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum QueryKey {
    List,
    Product(ProductId),
}

impl QueryKey {
    fn tags(self) -> Vec<CacheTag> {
        match self {
            QueryKey::List => vec![CacheTag::ProductList],
            QueryKey::Product(id) => vec![CacheTag::Product(id)],
        }
    }
}

#[derive(Clone)]
enum CachedValue {
    List(Vec<Product>),
    Product(Product),
}

struct CacheEntry {
    value: CachedValue,
    tags: Vec<CacheTag>,
    created_at: Instant,
}

const DEFAULT_MAX_ENTRIES: usize = 256;

pub struct CachedCatalog<S> {
    source: S,
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    max_entries: usize,
    ttl: Duration,
}

impl<S: ProductSource> CachedCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: RwLock::new(HashMap::new()),
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: Duration::from_secs(60),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop every entry that provides any of `tags`
    pub fn invalidate(&self, tags: &[CacheTag]) {
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|tag| tags.contains(tag)));
        tracing::debug!(?tags, dropped = before - entries.len(), "cache invalidated");
    }

    pub fn clear(&self) {
        self.write_entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every write leaves the map consistent, so poisoning is ignored
    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, key: QueryKey) -> Option<CachedValue> {
        let mut entries = self.write_entries();

        if let Some(entry) = entries.get(&key) {
            if entry.created_at.elapsed() < self.ttl {
                tracing::debug!(?key, "cache hit");
                return Some(entry.value.clone());
            }
            entries.remove(&key);
        }

        tracing::debug!(?key, "cache miss");
        None
    }

    fn store(&self, key: QueryKey, value: CachedValue) {
        let mut entries = self.write_entries();
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            self.evict(&mut entries);
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                tags: key.tags(),
                created_at: Instant::now(),
            },
        );
    }

    fn evict(&self, entries: &mut HashMap<QueryKey, CacheEntry>) {
        // Expired entries go first
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.created_at.elapsed() < ttl);

        // Still full: drop the oldest
        if entries.len() >= self.max_entries {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| *key)
            {
                entries.remove(&oldest);
            }
        }
    }
}

#[async_trait]
impl<S: ProductSource> ProductSource for CachedCatalog<S> {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CachedValue::List(products)) = self.lookup(QueryKey::List) {
            return Ok(products);
        }

        let products = self.source.list_products().await?;
        self.store(QueryKey::List, CachedValue::List(products.clone()));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(CachedValue::Product(product)) = self.lookup(QueryKey::Product(id)) {
            return Ok(product);
        }

        let product = self.source.get_product(id).await?;
        self.store(QueryKey::Product(id), CachedValue::Product(product.clone()));
        Ok(product)
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let product = self.source.create_product(draft).await?;
        self.invalidate(&[CacheTag::ProductList]);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let product = self.source.update_product(id, draft).await?;
        self.invalidate(&[CacheTag::ProductList, CacheTag::Product(id)]);
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.source.delete_product(id).await?;
        self.invalidate(&[CacheTag::ProductList, CacheTag::Product(id)]);
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<UploadedFile, ApiError> {
        self.source.upload_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySource;

    fn draft(title: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            price: 12.0,
            description: String::new(),
            category_id: 36,
            images: vec!["https://placehold.co/600x400".to_string()],
        }
    }

    #[tokio::test]
    async fn test_repeated_reads_hit_cache() {
        let catalog = CachedCatalog::new(MemorySource::with_products(2));

        catalog.list_products().await.unwrap();
        catalog.list_products().await.unwrap();
        catalog.get_product(1).await.unwrap();
        catalog.get_product(1).await.unwrap();

        assert_eq!(catalog.source().read_count(), 2);
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_create_invalidates_list_only() {
        let catalog = CachedCatalog::new(MemorySource::with_products(1));
        catalog.list_products().await.unwrap();
        catalog.get_product(1).await.unwrap();

        catalog.create_product(&draft("New")).await.unwrap();

        assert_eq!(catalog.len(), 1);
        let products = catalog.list_products().await.unwrap();
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_update_invalidates_product_and_list() {
        let catalog = CachedCatalog::new(MemorySource::with_products(2));
        catalog.list_products().await.unwrap();
        catalog.get_product(1).await.unwrap();
        catalog.get_product(2).await.unwrap();

        catalog.update_product(1, &draft("Renamed")).await.unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_product(1).await.unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_invalidates() {
        let catalog = CachedCatalog::new(MemorySource::with_products(2));
        catalog.get_product(2).await.unwrap();

        catalog.delete_product(2).await.unwrap();

        assert!(catalog.get_product(2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let catalog = CachedCatalog::new(MemorySource::with_products(1));
        catalog.list_products().await.unwrap();

        assert!(catalog.delete_product(42).await.is_err());
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_refetched() {
        let catalog =
            CachedCatalog::new(MemorySource::with_products(1)).with_ttl(Duration::from_millis(0));

        catalog.get_product(1).await.unwrap();
        catalog.get_product(1).await.unwrap();

        assert_eq!(catalog.source().read_count(), 2);
    }

    #[tokio::test]
    async fn test_store_evicts_beyond_capacity() {
        let catalog = CachedCatalog::new(MemorySource::with_products(5)).with_max_entries(3);

        for id in 1..=5 {
            catalog.get_product(id).await.unwrap();
        }
        assert_eq!(catalog.len(), 3);

        // The newest entries survive
        catalog.get_product(5).await.unwrap();
        assert_eq!(catalog.source().read_count(), 5);
        catalog.get_product(1).await.unwrap();
        assert_eq!(catalog.source().read_count(), 6);
    }

    #[tokio::test]
    async fn test_store_sweeps_expired_entries_first() {
        let catalog = CachedCatalog::new(MemorySource::with_products(3))
            .with_ttl(Duration::from_millis(0))
            .with_max_entries(2);

        for id in 1..=3 {
            catalog.get_product(id).await.unwrap();
        }

        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_after_poisoned_lock() {
        let catalog = CachedCatalog::new(MemorySource::with_products(1));
        catalog.get_product(1).await.unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = catalog.entries.write().unwrap();
            panic!("writer panicked");
        }));
        assert!(result.is_err());
        assert!(catalog.entries.is_poisoned());

        catalog.update_product(1, &draft("Renamed")).await.unwrap();

        assert!(catalog.is_empty());
        assert_eq!(catalog.get_product(1).await.unwrap().title, "Renamed");
        assert_eq!(catalog.len(), 1);
    }
}
