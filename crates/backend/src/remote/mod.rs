//! Remote indexing/retrieval service.
//!
//! The service is a black box with two operations: accept a batch of blobs and
//! return their blob names, and answer a query scoped to a set of blob names.

mod http;
#[cfg(test)]
pub(crate) mod mock;
mod resilient;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use http::HttpBackend;
pub use resilient::{ResilientBackend, RetryConfig, is_retryable_error, with_retry};

use crate::domain::{blob::Blob, config::Config};

#[async_trait::async_trait]
pub trait RemoteBackend: Send + Sync {
  fn name(&self) -> &str;

  /// Upload one batch. Returns the blob names the service now holds for it.
  async fn upload_batch(&self, blobs: &[Blob]) -> Result<Vec<String>, RemoteError>;

  /// Run a retrieval query. `None` when the service returned no content.
  async fn retrieve(&self, request: &RetrievalRequest) -> Result<Option<String>, RemoteError>;
}

impl dyn RemoteBackend {
  pub fn from_config(config: &Config) -> Result<Arc<dyn RemoteBackend>, RemoteError> {
    let http = HttpBackend::new(config)?;

    // Wrap with retry logic (handles 429s, 5xx, timeouts, dropped connections)
    let resilient = ResilientBackend::with_configs(
      http,
      RetryConfig::for_upload(&config.retry),
      RetryConfig::for_retrieval(&config.retry),
    );
    Ok(Arc::new(resilient))
  }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
  #[error("No token configured for remote service")]
  NoToken,
  #[error("Connection error: {0}")]
  Connection(String),
  #[error("Request timed out")]
  Timeout,
  #[error("Remote service returned {status}: {body}")]
  Status { status: u16, body: String },
  #[error("Malformed response: {0}")]
  Malformed(String),
  #[error("Request failed: {0}")]
  Request(String),
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct UploadRequest<'a> {
  pub blobs: &'a [Blob],
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
  #[serde(default)]
  pub blob_names: Vec<String>,
}

/// Working set for a retrieval query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSet {
  pub checkpoint_id: Option<String>,
  pub added_blobs: Vec<String>,
  pub deleted_blobs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalRequest {
  pub information_request: String,
  pub blobs: BlobSet,
  pub dialog: Vec<serde_json::Value>,
  pub max_output_length: usize,
  pub disable_codebase_retrieval: bool,
  pub enable_commit_retrieval: bool,
}

impl RetrievalRequest {
  /// Query scoped to exactly `blob_names`, with no history and commit retrieval off
  pub fn new(query: impl Into<String>, blob_names: Vec<String>, max_output_length: usize) -> Self {
    Self {
      information_request: query.into(),
      blobs: BlobSet {
        checkpoint_id: None,
        added_blobs: blob_names,
        deleted_blobs: Vec::new(),
      },
      dialog: Vec::new(),
      max_output_length,
      disable_codebase_retrieval: false,
      enable_commit_retrieval: false,
    }
  }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RetrievalResponse {
  #[serde(default)]
  pub formatted_retrieval: Option<String>,
}
