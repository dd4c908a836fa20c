//! Search orchestration.
//!
//! Every query re-indexes the project first, then asks the remote service to
//! answer it against exactly the blob set that pass persisted.

use std::{path::Path, sync::Arc, time::Instant};

use tracing::{debug, info, warn};

use crate::{
  domain::{index::IndexStatus, project::normalize_project_path},
  remote::RetrievalRequest,
  service::{index::IndexService, util::ServiceError},
};

pub const NO_RESULTS_MESSAGE: &str = "No relevant code context found for your query.";

pub struct SearchService {
  index: Arc<IndexService>,
}

impl SearchService {
  pub fn new(index: Arc<IndexService>) -> Self {
    Self { index }
  }

  /// Answer `query` for the project at `root`.
  ///
  /// Always returns text; failures come back prefixed with `Error:`.
  pub async fn search_context(&self, root: &Path, query: &str) -> String {
    match self.try_search(root, query).await {
      Ok(text) => text,
      Err(e) => {
        warn!(project = %root.display(), err = %e, "Search failed");
        e.render()
      }
    }
  }

  pub(crate) async fn try_search(&self, root: &Path, query: &str) -> Result<String, ServiceError> {
    let start = Instant::now();

    let result = self.index.index_project(root).await;
    match result.status {
      IndexStatus::Error => return Err(ServiceError::Indexing(result.message)),
      IndexStatus::PartialSuccess => {
        warn!(
          failed_batches = ?result.failed_batches,
          skipped = result.stats.skipped_blobs,
          "Index partially updated, searching what was confirmed"
        );
      }
      IndexStatus::Success => {}
    }

    let project = result
      .project_path
      .unwrap_or_else(|| normalize_project_path(root));
    let blob_names = self.index.store().hashes_for(&project).await;
    if blob_names.is_empty() {
      return Err(ServiceError::EmptyIndex(project));
    }

    debug!(project = %project, blobs = blob_names.len(), "Querying remote service");
    let request = RetrievalRequest::new(query, blob_names, self.index.config().max_output_length);
    let response = self.index.backend().retrieve(&request).await?;

    info!(
      project = %project,
      found = response.is_some(),
      elapsed_ms = start.elapsed().as_millis(),
      "Search complete"
    );

    Ok(response.unwrap_or_else(|| NO_RESULTS_MESSAGE.to_string()))
  }
}
