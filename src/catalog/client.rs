//! HTTP client for the remote product API

use super::error::ApiError;
use super::types::{Product, ProductDraft, ProductList, UploadedFile};
use super::ProductSource;
use crate::cart::ProductId;
use crate::config::ApiConfig;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub struct ProductApi {
    client: reqwest::Client,
    base_url: Url,
}

impl ProductApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {}", path))
            .map_err(ApiError::from)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(ApiError::from_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!(%status, body = %error_text, "product API request failed");
            return Err(ApiError::from_http_status(status, error_text));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProductSource for ProductApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("products")?;
        tracing::debug!(%url, "GET products");
        let list: ProductList = self.send_json(self.client.get(url)).await?;
        Ok(list.into())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{}", id))?;
        tracing::debug!(%url, "GET product");
        // The API answers 400 rather than 404 for unknown ids
        match self.send_json(self.client.get(url)).await {
            Err(ApiError::NotFound(_)) | Err(ApiError::BadRequest(_)) => {
                Err(ApiError::ProductNotFound(id))
            }
            other => other,
        }
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let url = self.endpoint("products")?;
        tracing::debug!(%url, title = %draft.title, "POST product");
        self.send_json(self.client.post(url).json(draft)).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("products/{}", id))?;
        tracing::debug!(%url, "PUT product");
        match self.send_json(self.client.put(url).json(draft)).await {
            Err(ApiError::NotFound(_)) => Err(ApiError::ProductNotFound(id)),
            other => other,
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("products/{}", id))?;
        tracing::debug!(%url, "DELETE product");
        match self.send(self.client.delete(url)).await {
            Ok(_) => Ok(()),
            Err(ApiError::NotFound(_)) => Err(ApiError::ProductNotFound(id)),
            Err(e) => Err(e),
        }
    }

    async fn upload_file(&self, path: &Path) -> Result<UploadedFile, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let url = self.endpoint("files/upload")?;
        tracing::debug!(%url, file = %file_name, size = bytes.len(), "POST upload");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        self.send_json(self.client.post(url).multipart(form)).await
    }
}
