//! HTTP client for the instance management API.

mod cache;
mod error;

pub use cache::ResponseCache;
pub use error::{ClientError, Result};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use streams_core::host::{CacheDirective, InstanceApi, ListRequest, SizeLookup};
use streams_core::ServiceError;
use streams_models::{
    ChangeOwnerRequest, CreateInstanceRequest, ErrorResponse, Instance, InstanceList,
    InstanceSize, InstanceType, SupportedInstanceTypesList,
};

const INSTANCES_PATH: &str = "/api/kafkas_mgmt/v1/kafkas";
const INSTANCE_TYPES_PATH: &str = "/api/kafkas_mgmt/v1/instance_types";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    cache: Arc<ResponseCache>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|_| ClientError::InvalidUrl(config.base_url.clone()))?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
            cache: Arc::new(ResponseCache::new()),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    // ------------------------------------------------------------------------
    // Instances
    // ------------------------------------------------------------------------

    pub async fn fetch_instances(&self, request: &ListRequest) -> Result<InstanceList> {
        let mut url = self.url(INSTANCES_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &request.page.to_string())
                .append_pair("size", &request.per_page.to_string())
                .append_pair("orderBy", &request.order_by);
            if !request.search.is_empty() {
                query.append_pair("search", &request.search);
            }
        }

        self.get_cached(url, request.cache).await
    }

    pub async fn get_instance(&self, id: &str) -> Result<Instance> {
        let url = self.url(&format!("{}/{}", INSTANCES_PATH, id))?;
        self.get_json(url).await
    }

    pub async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Instance> {
        let mut url = self.url(INSTANCES_PATH)?;
        url.query_pairs_mut().append_pair("async", "true");

        tracing::info!(
            "Creating instance '{}' in {}/{}",
            request.name,
            request.cloud_provider,
            request.region
        );
        let response = self.request(Method::POST, url).json(request).send().await?;
        Self::decode(response).await
    }

    pub async fn change_owner(&self, id: &str, owner: &str) -> Result<Instance> {
        let url = self.url(&format!("{}/{}", INSTANCES_PATH, id))?;
        let body = ChangeOwnerRequest {
            owner: owner.to_string(),
        };

        tracing::info!("Transferring instance {} to {}", id, owner);
        let response = self.request(Method::PATCH, url).json(&body).send().await?;
        Self::decode(response).await
    }

    pub async fn remove_instance(&self, id: &str, async_delete: bool) -> Result<()> {
        let mut url = self.url(&format!("{}/{}", INSTANCES_PATH, id))?;
        url.query_pairs_mut()
            .append_pair("async", &async_delete.to_string());

        let response = self.request(Method::DELETE, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Sizes
    // ------------------------------------------------------------------------

    pub async fn instance_types(
        &self,
        provider: &str,
        region: &str,
    ) -> Result<SupportedInstanceTypesList> {
        let url = self.url(&format!("{}/{}/{}", INSTANCE_TYPES_PATH, provider, region))?;
        self.get_json(url).await
    }

    /// Trial sizes of `instance_type` offered in a region.
    pub async fn lookup_sizes(
        &self,
        instance_type: InstanceType,
        provider: &str,
        region: &str,
    ) -> Result<Vec<InstanceSize>> {
        let types = self.instance_types(provider, region).await?;

        Ok(types
            .instance_types
            .into_iter()
            .filter(|t| t.id == instance_type.as_str())
            .flat_map(|t| t.sizes)
            .filter_map(|size| {
                size.trial_duration_hours
                    .map(|trial_duration_hours| InstanceSize {
                        trial_duration_hours,
                    })
            })
            .collect())
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    fn url(&self, path: &str) -> Result<Url> {
        let full = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&full).map_err(|_| ClientError::InvalidUrl(full))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.request(Method::GET, url).send().await?;
        Self::decode(response).await
    }

    /// GET through the response cache. `Bypass` still refreshes the entry.
    async fn get_cached<T: DeserializeOwned>(&self, url: Url, cache: CacheDirective) -> Result<T> {
        let key = url.to_string();

        if let CacheDirective::MaxAge(max_age) = cache {
            if let Some(body) = self.cache.get(&key, max_age) {
                tracing::debug!("Cache hit for {}", key);
                return Ok(serde_json::from_str(&body)?);
            }
        }

        tracing::debug!("GET {}", key);
        let response = self.request(Method::GET, url).send().await?;
        let body = Self::check(response).await?;
        let value = serde_json::from_str(&body)?;
        self.cache.put(key, body);
        Ok(value)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let body = Self::check(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Return the body of a successful response, or the decoded API error.
    async fn check(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let error: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();
        tracing::debug!(
            "API returned {} (code {:?}, operation {:?})",
            status,
            error.code,
            error.operation_id
        );
        Err(ClientError::Api {
            status: status.as_u16(),
            code: error.code,
            reason: error
                .reason
                .or_else(|| status.canonical_reason().map(str::to_string)),
        })
    }
}

#[async_trait]
impl InstanceApi for Client {
    async fn list_instances(
        &self,
        request: &ListRequest,
    ) -> std::result::Result<InstanceList, ServiceError> {
        Ok(self.fetch_instances(request).await?)
    }

    async fn delete_instance(
        &self,
        id: &str,
        async_delete: bool,
    ) -> std::result::Result<(), ServiceError> {
        Ok(self.remove_instance(id, async_delete).await?)
    }
}

#[async_trait]
impl SizeLookup for Client {
    async fn get_sizes(
        &self,
        instance_type: InstanceType,
        provider: &str,
        region: &str,
    ) -> std::result::Result<Vec<InstanceSize>, ServiceError> {
        Ok(self.lookup_sizes(instance_type, provider, region).await?)
    }
}
