//! Storage key to URL resolution.

use reqwest::Url;

/// Turns a storage key into a URL a viewer can fetch. Pure: no I/O.
pub trait FileUrlResolver: Send + Sync {
    fn resolve_storage_key(&self, key: &str) -> String;
}

/// Resolves keys against the file endpoint of the dashboard backend:
/// `{base}/api/files/{key}`, with the key encoded as one path segment.
#[derive(Debug, Clone)]
pub struct StorageUrlResolver {
    base_url: String,
}

impl StorageUrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl FileUrlResolver for StorageUrlResolver {
    fn resolve_storage_key(&self, key: &str) -> String {
        let base = format!("{}/", self.base_url);
        match Url::parse(&base) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().extend(["api", "files", key]);
                }
                url.to_string()
            }
            // Relative bases (e.g. "/") stay relative.
            Err(_) => format!("{}/api/files/{}", self.base_url, key),
        }
    }
}
