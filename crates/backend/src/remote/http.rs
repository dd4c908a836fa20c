use std::time::Instant;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, info, trace, warn};

use super::{RemoteBackend, RemoteError, RetrievalRequest, RetrievalResponse, UploadRequest, UploadResponse};
use crate::domain::{blob::Blob, config::Config};

const UPLOAD_PATH: &str = "batch-upload";
const RETRIEVAL_PATH: &str = "agents/codebase-retrieval";

/// HTTP client for the remote service. No retries here, see `ResilientBackend`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
  client: reqwest::Client,
  base_url: String,
  token: String,
}

impl HttpBackend {
  pub fn new(config: &Config) -> Result<Self, RemoteError> {
    if config.token.trim().is_empty() {
      return Err(RemoteError::NoToken);
    }

    let client = reqwest::Client::builder()
      .build()
      .map_err(|e| RemoteError::Request(e.to_string()))?;
    let base_url = config.base_url.trim_end_matches('/').to_string();

    info!(base_url = %base_url, "Remote backend initialized");

    Ok(Self {
      client,
      base_url,
      token: config.token.clone(),
    })
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path)
  }

  /// POST `body` as JSON and decode the JSON response.
  async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, RemoteError>
  where
    B: Serialize + ?Sized + Sync,
    R: DeserializeOwned,
  {
    let url = self.endpoint(path);
    let start = Instant::now();
    trace!(url = %url, "Sending request to remote service");

    let response = match self.client.post(&url).bearer_auth(&self.token).json(body).send().await {
      Ok(resp) => resp,
      Err(e) => {
        warn!(url = %url, error = %e, "Network error sending request");
        return Err(classify_transport_error(e));
      }
    };

    let status = response.status();
    trace!(
      status = %status,
      elapsed_ms = start.elapsed().as_millis(),
      "Received response from remote service"
    );

    if !status.is_success() {
      let status_code = status.as_u16();
      let body = response.text().await.unwrap_or_default();

      if status_code == 401 || status_code == 403 {
        error!(status = %status, url = %url, "Remote service authentication failed");
      } else if status_code == 429 {
        warn!(status = %status, url = %url, "Remote service rate limit exceeded");
      } else if status_code >= 500 {
        warn!(status = %status, url = %url, "Remote service error");
      } else {
        warn!(status = %status, url = %url, "Remote service rejected request");
      }

      return Err(RemoteError::Status {
        status: status_code,
        body,
      });
    }

    let bytes = response.bytes().await.map_err(classify_transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| {
      error!(url = %url, err = %e, "Failed to decode response");
      RemoteError::Malformed(e.to_string())
    })
  }
}

/// Map a reqwest failure onto the retry taxonomy.
///
/// Timeouts and lost connections are transient; anything else is not. A peer
/// hanging up mid-exchange shows up as a send or body error, not an io error.
fn classify_transport_error(e: reqwest::Error) -> RemoteError {
  if e.is_timeout() {
    return RemoteError::Timeout;
  }
  if e.is_connect() || e.is_body() || (e.is_request() && !e.is_builder()) {
    return RemoteError::Connection(e.to_string());
  }
  RemoteError::Request(e.to_string())
}

#[async_trait]
impl RemoteBackend for HttpBackend {
  fn name(&self) -> &str {
    "http"
  }

  async fn upload_batch(&self, blobs: &[Blob]) -> Result<Vec<String>, RemoteError> {
    if blobs.is_empty() {
      return Ok(Vec::new());
    }

    debug!(batch_size = blobs.len(), "Uploading batch");
    let response: UploadResponse = self.post_json(UPLOAD_PATH, &UploadRequest { blobs }).await?;
    trace!(returned = response.blob_names.len(), "Batch upload response");
    Ok(response.blob_names)
  }

  async fn retrieve(&self, request: &RetrievalRequest) -> Result<Option<String>, RemoteError> {
    debug!(
      blobs = request.blobs.added_blobs.len(),
      query_len = request.information_request.len(),
      "Sending retrieval request"
    );
    let response: RetrievalResponse = self.post_json(RETRIEVAL_PATH, request).await?;
    Ok(response.formatted_retrieval.filter(|text| !text.trim().is_empty()))
  }
}
