//! In-memory remote backend for tests.

use std::{
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use async_trait::async_trait;

use super::{RemoteBackend, RemoteError, RetrievalRequest};
use crate::domain::blob::Blob;

/// Accepts every blob and names it by its content hash unless told otherwise.
#[derive(Default)]
pub(crate) struct MockBackend {
  upload_calls: AtomicUsize,
  retrieve_calls: AtomicUsize,
  uploaded: Mutex<Vec<Blob>>,
  last_request: Mutex<Option<RetrievalRequest>>,

  /// Batches containing a path with this marker fail with 503
  fail_on_path: Option<String>,
  /// Batches containing a path with this marker get an empty name list
  empty_on_path: Option<String>,
  /// Every upload fails with this error
  fail_with: Option<RemoteError>,
  /// The first N upload calls fail with 503
  fail_first: usize,
  delay: Option<Duration>,

  retrieval: Option<String>,
  retrieval_error: Option<RemoteError>,
}

impl MockBackend {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing_with(error: RemoteError) -> Self {
    Self {
      fail_with: Some(error),
      ..Default::default()
    }
  }

  pub fn failing_first(attempts: usize) -> Self {
    Self {
      fail_first: attempts,
      ..Default::default()
    }
  }

  pub fn failing_on_path(marker: &str) -> Self {
    Self {
      fail_on_path: Some(marker.to_string()),
      ..Default::default()
    }
  }

  pub fn empty_on_path(marker: &str) -> Self {
    Self {
      empty_on_path: Some(marker.to_string()),
      ..Default::default()
    }
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  pub fn with_retrieval(mut self, text: &str) -> Self {
    self.retrieval = Some(text.to_string());
    self
  }

  pub fn with_retrieval_error(mut self, error: RemoteError) -> Self {
    self.retrieval_error = Some(error);
    self
  }

  pub fn upload_calls(&self) -> usize {
    self.upload_calls.load(Ordering::SeqCst)
  }

  pub fn retrieve_calls(&self) -> usize {
    self.retrieve_calls.load(Ordering::SeqCst)
  }

  /// Paths of every blob the backend accepted, in upload order
  pub fn uploaded_paths(&self) -> Vec<String> {
    self.uploaded.lock().unwrap().iter().map(|b| b.path.clone()).collect()
  }

  pub fn last_request(&self) -> Option<RetrievalRequest> {
    self.last_request.lock().unwrap().clone()
  }

  fn batch_has(blobs: &[Blob], marker: &Option<String>) -> bool {
    marker
      .as_deref()
      .is_some_and(|m| blobs.iter().any(|b| b.path.contains(m)))
  }
}

#[async_trait]
impl RemoteBackend for MockBackend {
  fn name(&self) -> &str {
    "mock"
  }

  async fn upload_batch(&self, blobs: &[Blob]) -> Result<Vec<String>, RemoteError> {
    let call = self.upload_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    if let Some(ref err) = self.fail_with {
      return Err(err.clone());
    }
    if call < self.fail_first || Self::batch_has(blobs, &self.fail_on_path) {
      return Err(RemoteError::Status {
        status: 503,
        body: "unavailable".to_string(),
      });
    }
    if Self::batch_has(blobs, &self.empty_on_path) {
      return Ok(Vec::new());
    }

    self.uploaded.lock().unwrap().extend_from_slice(blobs);
    Ok(blobs.iter().map(|b| b.hash.clone()).collect())
  }

  async fn retrieve(&self, request: &RetrievalRequest) -> Result<Option<String>, RemoteError> {
    self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
    *self.last_request.lock().unwrap() = Some(request.clone());

    if let Some(ref err) = self.retrieval_error {
      return Err(err.clone());
    }
    Ok(self.retrieval.clone())
  }
}
