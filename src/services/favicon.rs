//! Favicon lookup service.
//!
//! Given a site URL, derives the domain and builds a stable icon URL against
//! a favicon lookup endpoint. The resulting URL is stored on links exactly
//! like an uploaded icon URL, just without a deletion handle.

use crate::types::errors::FaviconError;

/// Default public favicon lookup endpoint.
pub const DEFAULT_FAVICON_ENDPOINT: &str = "https://favicon.vemetric.com";

/// Extracts the bare domain from a URL, tolerating a missing scheme and
/// stripping a leading `www.`. Returns `None` for unusable input.
pub fn extract_domain(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Drop the scheme if present, then cut at the first path/query/port separator.
    let rest = trimmed
        .split_once("://")
        .map(|(_, r)| r)
        .unwrap_or(trimmed);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("");

    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() || !host.contains('.') {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Favicon lookup client.
pub struct FaviconClient {
    endpoint: String,
    client: reqwest::Client,
}

impl FaviconClient {
    /// Creates a client against the given lookup endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Builds the stable favicon URL for a site URL or bare domain.
    pub fn favicon_url(&self, url: &str) -> Result<String, FaviconError> {
        let domain = extract_domain(url).ok_or_else(|| FaviconError::InvalidUrl(url.to_string()))?;
        Ok(format!("{}/{}", self.endpoint, domain))
    }

    /// Fetches the favicon bytes for a site URL.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FaviconError> {
        let favicon_url = self.favicon_url(url)?;

        let response = self
            .client
            .get(&favicon_url)
            .send()
            .await
            .map_err(|e| FaviconError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FaviconError::NetworkError(format!(
                "favicon fetch failed with status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FaviconError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl Default for FaviconClient {
    fn default() -> Self {
        Self::new(DEFAULT_FAVICON_ENDPOINT)
    }
}
