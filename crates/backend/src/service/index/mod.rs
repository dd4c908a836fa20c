//! Incremental indexing.
//!
//! One pass: collect blobs, diff their hashes against the stored record,
//! upload what is new, then overwrite the record with `unchanged ∪ uploaded`.
//!
//! - [`diff`] - Hash-set partition into unchanged and new
//! - [`upload`] - Sequential batch upload

pub mod diff;
pub mod upload;

use std::{
  collections::HashSet,
  path::Path,
  sync::Arc,
  time::Instant,
};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use self::{
  diff::diff_hashes,
  upload::{UploadOutcome, upload_in_batches},
};
use crate::{
  context::files::collect_blobs,
  db::ProjectStore,
  domain::{
    blob::Blob,
    config::Config,
    index::{IndexResult, IndexStats, IndexStatus},
    project::normalize_project_path,
  },
  remote::RemoteBackend,
  service::util::ServiceError,
};

/// Runs indexing passes against one remote backend and one store.
///
/// Passes for the same project are serialized inside this process; the store
/// file itself is still last-writer-wins across processes.
pub struct IndexService {
  config: Arc<Config>,
  backend: Arc<dyn RemoteBackend>,
  store: ProjectStore,
  /// Normalized project path → lock held for load-diff-upload-save, removed when idle
  locks: DashMap<String, Arc<Mutex<()>>>,
}

impl IndexService {
  pub fn new(config: Arc<Config>, backend: Arc<dyn RemoteBackend>) -> Self {
    let store = ProjectStore::new(config.projects_file());
    Self {
      config,
      backend,
      store,
      locks: DashMap::new(),
    }
  }

  /// Validate `config` and connect to the configured remote service.
  pub fn from_config(config: Config) -> Result<Self, ServiceError> {
    config.validate()?;
    let backend = <dyn RemoteBackend>::from_config(&config)?;
    Ok(Self::new(Arc::new(config), backend))
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn store(&self) -> &ProjectStore {
    &self.store
  }

  pub fn backend(&self) -> &dyn RemoteBackend {
    self.backend.as_ref()
  }

  /// Index the project at `root`. Never fails; problems become an `error` result.
  pub async fn index_project(&self, root: &Path) -> IndexResult {
    let project = normalize_project_path(root);
    match self.try_index_project(root, &project).await {
      Ok(result) => result,
      Err(e) => {
        warn!(project = %project, err = %e, "Indexing failed");
        IndexResult::error(e.to_string(), Some(project))
      }
    }
  }

  pub(crate) async fn try_index_project(&self, root: &Path, project: &str) -> Result<IndexResult, ServiceError> {
    let lock = self.locks.entry(project.to_string()).or_default().value().clone();
    let result = {
      let _guard = lock.lock().await;
      self.run_pass(root, project).await
    };

    // Forget the lock once no other pass holds or waits on it
    drop(lock);
    self.locks.remove_if(project, |_, lock| Arc::strong_count(lock) == 1);

    result
  }

  #[cfg(test)]
  pub(crate) fn tracked_locks(&self) -> usize {
    self.locks.len()
  }

  async fn run_pass(&self, root: &Path, project: &str) -> Result<IndexResult, ServiceError> {
    let start = Instant::now();
    let collected = collect_blobs(root, &self.config).await?;
    let blobs = dedupe_blobs(collected.blobs);
    if blobs.is_empty() {
      info!(project = %project, excluded = collected.excluded, "No indexable files found");
      return Ok(IndexResult::error(
        "No indexable text files found in project",
        Some(project.to_string()),
      ));
    }

    let mut records = self.store.load().await;
    let stored = records.get(project).cloned().unwrap_or_default();

    let current: Vec<String> = blobs.iter().map(|b| b.hash.clone()).collect();
    let diff = diff_hashes(&current, &stored);
    debug!(
      project = %project,
      total = current.len(),
      unchanged = diff.unchanged.len(),
      new = diff.new.len(),
      dropped = stored.len().saturating_sub(diff.unchanged.len()),
      "Diffed against stored index"
    );

    let new_set: HashSet<&str> = diff.new.iter().map(String::as_str).collect();
    let pending: Vec<Blob> = blobs.into_iter().filter(|b| new_set.contains(b.hash.as_str())).collect();

    let outcome = if pending.is_empty() {
      UploadOutcome::default()
    } else {
      upload_in_batches(self.backend.as_ref(), &pending, self.config.batch_size).await
    };

    let persisted = merge_confirmed(&diff.unchanged, &outcome.uploaded);
    records.insert(project.to_string(), persisted);
    self.store.save(&records).await?;

    let stats = IndexStats {
      total_blobs: current.len(),
      existing_blobs: diff.unchanged.len(),
      new_blobs: diff.new.len(),
      skipped_blobs: outcome.skipped,
    };
    let result = build_result(project, stats, &outcome);

    info!(
      project = %project,
      status = %result.status,
      total = stats.total_blobs,
      existing = stats.existing_blobs,
      new = stats.new_blobs,
      skipped = stats.skipped_blobs,
      elapsed_ms = start.elapsed().as_millis(),
      "Indexing pass complete"
    );

    Ok(result)
  }
}

/// Drop blobs whose hash was already seen, keeping the first.
fn dedupe_blobs(blobs: Vec<Blob>) -> Vec<Blob> {
  let mut seen = HashSet::with_capacity(blobs.len());
  blobs.into_iter().filter(|b| seen.insert(b.hash.clone())).collect()
}

/// `unchanged ∪ uploaded`, unchanged first, without duplicates
fn merge_confirmed(unchanged: &[String], uploaded: &[String]) -> Vec<String> {
  let mut seen = HashSet::with_capacity(unchanged.len() + uploaded.len());
  unchanged
    .iter()
    .chain(uploaded)
    .filter(|h| seen.insert(h.as_str()))
    .cloned()
    .collect()
}

fn build_result(project: &str, stats: IndexStats, outcome: &UploadOutcome) -> IndexResult {
  let (status, message) = if outcome.has_failures() {
    (
      IndexStatus::PartialSuccess,
      format!(
        "Indexed with failures: {} of {} batches failed, {} blobs will be retried on the next pass",
        outcome.failed_batches.len(),
        outcome.batches,
        stats.skipped_blobs
      ),
    )
  } else if stats.new_blobs == 0 {
    (
      IndexStatus::Success,
      format!("Index is up to date ({} blobs unchanged)", stats.existing_blobs),
    )
  } else {
    (
      IndexStatus::Success,
      format!(
        "Indexed {} blobs ({} new, {} existing)",
        stats.total_blobs, stats.new_blobs, stats.existing_blobs
      ),
    )
  };

  IndexResult {
    status,
    message,
    project_path: Some(project.to_string()),
    failed_batches: outcome.failed_batches.clone(),
    stats,
  }
}
