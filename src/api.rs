// Access to the car store JSON API.
// `Backend` is the seam the rest of the client talks to; `HttpBackend` is the
// reqwest implementation used by the binary.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Settings;
use crate::error::ApiError;
use crate::models::{CarDetailResponse, FilterOptions, PageResult, StatsSnapshot};
use crate::query::PageRequest;

#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/cars`
    async fn list_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError>;

    /// `GET /api/search`
    async fn search_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError>;

    /// `GET /api/cars/{id}`
    async fn car_details(&self, id: u64) -> Result<CarDetailResponse, ApiError>;

    /// `GET /api/filters`
    async fn filter_options(&self) -> Result<FilterOptions, ApiError>;

    /// `GET /api/search_suggestions?q=`
    async fn search_suggestions(&self, query: &str) -> Result<Vec<String>, ApiError>;

    /// `GET /admin/api/stats`
    async fn admin_stats(&self) -> Result<StatsSnapshot, ApiError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for std::sync::Arc<B> {
    async fn list_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError> {
        (**self).list_cars(request).await
    }

    async fn search_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError> {
        (**self).search_cars(request).await
    }

    async fn car_details(&self, id: u64) -> Result<CarDetailResponse, ApiError> {
        (**self).car_details(id).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        (**self).filter_options().await
    }

    async fn search_suggestions(&self, query: &str) -> Result<Vec<String>, ApiError> {
        (**self).search_suggestions(query).await
    }

    async fn admin_stats(&self) -> Result<StatsSnapshot, ApiError> {
        (**self).admin_stats().await
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Builds a backend for the configured base URL with its own client.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("car-store/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build reqwest client")?;
        Self::with_client(client, &settings.api_base_url)
    }

    /// Uses an existing client, e.g. one shared with other components.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL '{}'", base_url))?;
        if parsed.cannot_be_a_base() {
            anyhow::bail!("API base URL '{}' cannot have paths appended", base_url);
        }
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_value(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, ?query, "Sending request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = %status, "Backend returned error status");
            return Err(ApiError::Response {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let value = self.get_value(path, query).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError> {
        self.get_json("/api/cars", &request.query_pairs()).await
    }

    async fn search_cars(&self, request: &PageRequest) -> Result<PageResult, ApiError> {
        self.get_json("/api/search", &request.query_pairs()).await
    }

    async fn car_details(&self, id: u64) -> Result<CarDetailResponse, ApiError> {
        self.get_json(&format!("/api/cars/{}", id), &[]).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.get_json("/api/filters", &[]).await
    }

    async fn search_suggestions(&self, query: &str) -> Result<Vec<String>, ApiError> {
        self.get_json("/api/search_suggestions", &[("q", query.to_owned())])
            .await
    }

    async fn admin_stats(&self) -> Result<StatsSnapshot, ApiError> {
        let value = self.get_value("/admin/api/stats", &[]).await?;
        if !value.is_object() {
            return Err(ApiError::Decode("stats payload is not an object".into()));
        }
        Ok(StatsSnapshot::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_validated() {
        assert!(HttpBackend::with_client(Client::new(), "not a url").is_err());
        assert!(HttpBackend::with_client(Client::new(), "mailto:cars@example.com").is_err());
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let backend = HttpBackend::with_client(Client::new(), "http://127.0.0.1:5000/").unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:5000");
    }
}
