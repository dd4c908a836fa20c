// Retry wrapper for the remote service
//
// - Exponential backoff: base, 2×base, 4×base, ...
// - Retries connection failures, timeouts, 429 and 5xx
// - Everything else fails on the first attempt
// - Per-request timeout, separate for uploads and retrieval

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use super::{RemoteBackend, RemoteError, RetrievalRequest};
use crate::domain::{blob::Blob, config::RetrySettings};

#[derive(Debug, Clone)]
pub struct RetryConfig {
  /// Total attempts, including the first
  pub max_attempts: u32,
  /// Delay before the first retry
  pub initial_backoff: Duration,
  /// Upper bound on any single delay
  pub max_backoff: Duration,
  pub backoff_multiplier: f64,
  pub request_timeout: Duration,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      initial_backoff: Duration::from_secs(1),
      max_backoff: Duration::from_secs(60),
      backoff_multiplier: 2.0,
      request_timeout: Duration::from_secs(30),
    }
  }
}

impl RetryConfig {
  pub fn for_upload(settings: &RetrySettings) -> Self {
    Self {
      max_attempts: settings.max_attempts.max(1),
      initial_backoff: Duration::from_millis(settings.base_delay_ms),
      request_timeout: Duration::from_secs(settings.upload_timeout_secs),
      ..Default::default()
    }
  }

  pub fn for_retrieval(settings: &RetrySettings) -> Self {
    Self {
      request_timeout: Duration::from_secs(settings.retrieval_timeout_secs),
      ..Self::for_upload(settings)
    }
  }

  /// Delay after the failed attempt with 0-based index `attempt`
  pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
    let base = self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);
    Duration::from_secs_f64(base.min(self.max_backoff.as_secs_f64()))
  }
}

/// Transient failures: the same request may succeed later
pub fn is_retryable_error(error: &RemoteError) -> bool {
  match error {
    RemoteError::Connection(_) | RemoteError::Timeout => true,
    RemoteError::Status { status, .. } => *status == 429 || (500..600).contains(status),
    _ => false,
  }
}

/// Run `f` until it succeeds, fails permanently, or runs out of attempts.
///
/// Each attempt is bounded by `config.request_timeout`; an elapsed timeout
/// counts as a transient failure.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, operation: &'static str, mut f: F) -> Result<T, RemoteError>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, RemoteError>>,
{
  let max_attempts = config.max_attempts.max(1);
  let mut attempt = 0;

  loop {
    let error = match tokio::time::timeout(config.request_timeout, f()).await {
      Ok(Ok(value)) => {
        if attempt > 0 {
          info!(operation, attempt = attempt + 1, "Request succeeded after retry");
        }
        return Ok(value);
      }
      Ok(Err(e)) => e,
      Err(_) => {
        warn!(
          operation,
          attempt = attempt + 1,
          timeout_ms = config.request_timeout.as_millis(),
          "Request timed out"
        );
        RemoteError::Timeout
      }
    };

    if !is_retryable_error(&error) {
      debug!(operation, err = %error, "Permanent error, not retrying");
      return Err(error);
    }

    if attempt + 1 >= max_attempts {
      warn!(operation, max_attempts, err = %error, "All retries exhausted");
      return Err(error);
    }

    let backoff = config.backoff_for_attempt(attempt);
    warn!(
      operation,
      attempt = attempt + 1,
      max_attempts,
      backoff_ms = backoff.as_millis(),
      err = %error,
      "Retryable error, will retry"
    );
    trace!(backoff_ms = backoff.as_millis(), "Applying backoff before retry");
    sleep(backoff).await;
    attempt += 1;
  }
}

/// A backend that retries transient failures of another backend
pub struct ResilientBackend<B: RemoteBackend> {
  inner: B,
  upload: RetryConfig,
  retrieval: RetryConfig,
}

impl<B: RemoteBackend> ResilientBackend<B> {
  pub fn with_configs(inner: B, upload: RetryConfig, retrieval: RetryConfig) -> Self {
    Self {
      inner,
      upload,
      retrieval,
    }
  }

  pub fn inner(&self) -> &B {
    &self.inner
  }
}

#[async_trait]
impl<B: RemoteBackend> RemoteBackend for ResilientBackend<B> {
  fn name(&self) -> &str {
    self.inner.name()
  }

  async fn upload_batch(&self, blobs: &[Blob]) -> Result<Vec<String>, RemoteError> {
    with_retry(&self.upload, "upload_batch", move || self.inner.upload_batch(blobs)).await
  }

  async fn retrieve(&self, request: &RetrievalRequest) -> Result<Option<String>, RemoteError> {
    with_retry(&self.retrieval, "retrieve", move || self.inner.retrieve(request)).await
  }
}
