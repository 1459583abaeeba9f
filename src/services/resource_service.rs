//! Resource fetch services.
//!
//! The workspace asks a [`ResourceService`] for the resources attached to a
//! grouping (a task). The HTTP implementation talks to the dashboard backend;
//! the static one serves a fixed map and backs the demo and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::types::errors::ResourceError;
use crate::types::resource::ResourceDescriptor;

#[async_trait]
pub trait ResourceService: Send + Sync {
    async fn fetch_resources_for_grouping(
        &self,
        grouping_id: &str,
    ) -> Result<Vec<ResourceDescriptor>, ResourceError>;

    async fn fetch_file_url(&self, key: &str) -> Result<String, ResourceError>;
}

/// Decodes a batch one record at a time. A record that cannot be read as a
/// resource is logged and dropped; the rest of the batch survives.
pub fn decode_resources(records: Vec<Value>) -> Vec<ResourceDescriptor> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(resource) => Some(resource),
            Err(e) => {
                warn!("dropping resource record {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// JSON-over-HTTP resource service.
pub struct HttpResourceService {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct FileUrlResponse {
    url: String,
}

impl HttpResourceService {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(base_url: impl Into<String>) -> Result<Self, ResourceError> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ResourceError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `{base}/api/<segments...>` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ResourceError> {
        let mut url = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| ResourceError::Network(format!("invalid base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ResourceError::Network("base url cannot hold a path".to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ResourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResourceError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ResourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ResourceService for HttpResourceService {
    async fn fetch_resources_for_grouping(
        &self,
        grouping_id: &str,
    ) -> Result<Vec<ResourceDescriptor>, ResourceError> {
        let url = self.endpoint(&["tasks", grouping_id, "resources"])?;
        let records: Vec<Value> = self.get_json(url).await?;
        Ok(decode_resources(records))
    }

    async fn fetch_file_url(&self, key: &str) -> Result<String, ResourceError> {
        let url = self.endpoint(&["files", key, "url"])?;
        let body: FileUrlResponse = self.get_json(url).await?;
        Ok(body.url)
    }
}

/// In-memory resource service.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceService {
    groupings: HashMap<String, Vec<ResourceDescriptor>>,
    file_urls: HashMap<String, String>,
}

impl StaticResourceService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grouping(
        mut self,
        grouping_id: impl Into<String>,
        resources: Vec<ResourceDescriptor>,
    ) -> Self {
        self.groupings.insert(grouping_id.into(), resources);
        self
    }

    pub fn with_file_url(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.file_urls.insert(key.into(), url.into());
        self
    }
}

#[async_trait]
impl ResourceService for StaticResourceService {
    /// Unknown groupings have no resources.
    async fn fetch_resources_for_grouping(
        &self,
        grouping_id: &str,
    ) -> Result<Vec<ResourceDescriptor>, ResourceError> {
        Ok(self.groupings.get(grouping_id).cloned().unwrap_or_default())
    }

    async fn fetch_file_url(&self, key: &str) -> Result<String, ResourceError> {
        self.file_urls
            .get(key)
            .cloned()
            .ok_or(ResourceError::Status(404))
    }
}
