//! Boundary to the hosted icon storage service.
//!
//! The store layer never talks to the image host directly: it only keeps the
//! public URL and an opaque deletion handle this service returns. Uploads
//! and deletions happen here, out-of-band of the database transaction, so a
//! storage outage never blocks a link mutation.

use reqwest::multipart;
use serde::Deserialize;

use crate::types::errors::IconError;

/// Result of uploading an icon: a public URL plus the opaque handle needed
/// to delete it later.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedIcon {
    pub url: String,
    pub handle: String,
}

/// Thin HTTP client for the icon storage service.
///
/// Constructed from configuration; deployments without an endpoint get
/// `IconError::NotConfigured` from every call and rely on favicon URLs
/// instead of uploads.
pub struct IconStorage {
    endpoint: Option<String>,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl IconStorage {
    /// Creates a client for the given endpoint. `None` disables uploads.
    pub fn new(endpoint: Option<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Returns whether an endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Uploads image bytes and returns the public URL and deletion handle.
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<UploadedIcon, IconError> {
        let endpoint = self.endpoint.as_deref().ok_or(IconError::NotConfigured)?;

        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let mut request = self
            .client
            .post(format!("{}/upload", endpoint))
            .multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IconError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IconError::ServiceError(format!(
                "upload failed with status {}",
                response.status()
            )));
        }

        response
            .json::<UploadedIcon>()
            .await
            .map_err(|e| IconError::ServiceError(e.to_string()))
    }

    /// Deletes a previously uploaded icon by its opaque handle.
    pub async fn delete(&self, handle: &str) -> Result<(), IconError> {
        let endpoint = self.endpoint.as_deref().ok_or(IconError::NotConfigured)?;

        let mut request = self
            .client
            .delete(format!("{}/images/{}", endpoint, handle));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IconError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IconError::ServiceError(format!(
                "delete failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Best-effort cleanup of stored icons after a link deletion or icon
    /// replacement. Failures are logged, never surfaced — the database is
    /// already consistent and an orphaned image is harmless.
    pub async fn cleanup(&self, handles: &[String]) {
        for handle in handles {
            if let Err(e) = self.delete(handle).await {
                tracing::warn!(handle = %handle, error = %e, "icon cleanup failed");
            }
        }
    }
}
