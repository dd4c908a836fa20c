//! Sequential batch upload with per-batch failure isolation.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{domain::blob::Blob, remote::RemoteBackend};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOutcome {
  /// Blob names confirmed by the remote service, in batch order
  pub uploaded: Vec<String>,
  /// 1-based ordinals of batches that failed
  pub failed_batches: Vec<usize>,
  /// Blobs in failed batches
  pub skipped: usize,
  /// Batches attempted
  pub batches: usize,
}

impl UploadOutcome {
  pub fn has_failures(&self) -> bool {
    !self.failed_batches.is_empty()
  }
}

/// Upload `blobs` in order, at most `batch_size` per request.
///
/// A batch that fails after retries, or whose response names no blobs, is
/// recorded as failed and the next batch is still attempted.
pub async fn upload_in_batches(backend: &dyn RemoteBackend, blobs: &[Blob], batch_size: usize) -> UploadOutcome {
  let batch_size = batch_size.max(1);
  let total_batches = blobs.len().div_ceil(batch_size);
  let start = Instant::now();
  let mut outcome = UploadOutcome::default();

  for (index, batch) in blobs.chunks(batch_size).enumerate() {
    let ordinal = index + 1;
    outcome.batches += 1;

    match backend.upload_batch(batch).await {
      Ok(names) if !names.is_empty() => {
        debug!(batch = ordinal, total_batches, blobs = batch.len(), names = names.len(), "Batch uploaded");
        outcome.uploaded.extend(names);
      }
      Ok(_) => {
        warn!(batch = ordinal, total_batches, blobs = batch.len(), "Batch upload returned no blob names");
        outcome.failed_batches.push(ordinal);
        outcome.skipped += batch.len();
      }
      Err(e) => {
        warn!(batch = ordinal, total_batches, blobs = batch.len(), err = %e, "Batch upload failed");
        outcome.failed_batches.push(ordinal);
        outcome.skipped += batch.len();
      }
    }
  }

  info!(
    backend = backend.name(),
    batches = outcome.batches,
    uploaded = outcome.uploaded.len(),
    failed = outcome.failed_batches.len(),
    elapsed_ms = start.elapsed().as_millis(),
    "Upload complete"
  );

  outcome
}
