// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! # Attachment Uploader
//!
//! Pushes a selected file to the pinning service and returns the assigned
//! content identifier. One multipart POST, no retry, no resumability, no
//! local size/type validation; the bytes are not retained locally after
//! upload. Rendering goes through a public read-only gateway keyed by
//! content id.
//!
//! Credentials are sourced from the environment at startup, never compiled
//! in.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::models::ContentId;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("pinning credentials missing: {0}")]
    MissingCredentials(&'static str),

    #[error("upload failed: {0}")]
    Failed(String),

    #[error("pinning response was invalid: {0}")]
    InvalidResponse(String),
}

/// Uploader seam: push bytes, get back an opaque content identifier.
pub trait AttachmentStore {
    /// Upload the file at `path`. `None` fails with `NoFileSelected`
    /// before any network call.
    fn upload(
        &self,
        path: Option<&Path>,
    ) -> impl Future<Output = Result<ContentId, UploadError>> + Send;

    /// Public gateway URL for rendering an uploaded attachment.
    fn gateway_url(&self, content_id: &ContentId) -> String;
}

/// Client for the Pinata pinning endpoint.
///
/// Credentials are optional at construction so the rest of the client
/// works without pinning configured; uploads then fail with
/// `MissingCredentials`.
#[derive(Debug, Clone)]
pub struct PinataClient {
    api_url: String,
    api_key: Option<String>,
    secret_key: Option<String>,
    gateway_base: String,
    http: Client,
}

impl PinataClient {
    pub fn new(
        api_url: &str,
        api_key: Option<String>,
        secret_key: Option<String>,
        gateway_base: &str,
    ) -> Result<Self, UploadError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| UploadError::Failed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: api_url.to_string(),
            api_key,
            secret_key,
            gateway_base: gateway_base.trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl AttachmentStore for PinataClient {
    async fn upload(&self, path: Option<&Path>) -> Result<ContentId, UploadError> {
        let path = path.ok_or(UploadError::NoFileSelected)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UploadError::MissingCredentials("PINATA_API_KEY"))?;
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or(UploadError::MissingCredentials("PINATA_SECRET_KEY"))?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::Failed(format!("read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(&self.api_url)
            .header("pinata_api_key", api_key)
            .header("pinata_secret_api_key", secret_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Failed(format!("upload request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Failed(format!(
                "upload returned {status}: {body}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(format!("invalid JSON: {e}")))?;

        extract_content_id(&body)
    }

    fn gateway_url(&self, content_id: &ContentId) -> String {
        format!("{}/{}", self.gateway_base, content_id)
    }
}

/// Pull the `IpfsHash` field out of the pinning response.
fn extract_content_id(body: &Value) -> Result<ContentId, UploadError> {
    body.get("IpfsHash")
        .and_then(Value::as_str)
        .and_then(ContentId::new)
        .ok_or_else(|| UploadError::InvalidResponse("missing IpfsHash in response".to_string()))
}
