//! Unified error type for service operations.
//!
//! Services are built on fallible `try_*` functions returning `ServiceError`;
//! the caller-facing operations render it into an `IndexResult` or an
//! `Error:`-prefixed string.

use crate::{
  context::files::CollectError,
  db::DbError,
  domain::config::ConfigError,
  remote::RemoteError,
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
  /// The project tree could not be walked.
  #[error(transparent)]
  Collect(#[from] CollectError),
  /// The project index could not be persisted.
  #[error("Failed to save project index: {0}")]
  Store(#[from] DbError),
  /// The remote service rejected or failed a request.
  #[error("Remote service error: {0}")]
  Remote(#[from] RemoteError),
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),
  /// Indexing finished with `error` status, so there is nothing to query.
  #[error("Failed to index project. {0}")]
  Indexing(String),
  /// Project has no recorded blobs after indexing.
  #[error("No indexed content for project: {0}")]
  EmptyIndex(String),
}

impl ServiceError {
  /// Text form for callers that only accept strings.
  pub fn render(&self) -> String {
    format!("Error: {}", self)
  }
}
