//! Shared test helpers for service-level integration tests.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use tempfile::TempDir;

use crate::{
  config::Config,
  remote::{ResilientBackend, RetryConfig, mock::MockBackend},
  service::{index::IndexService, search::SearchService},
};

/// Test context owning a project tree, a data directory, and a mock remote.
///
/// Both temp directories are cleaned up when the context is dropped.
pub struct TestContext {
  /// Project tree under test
  pub project: TempDir,
  /// Holds the persisted project index
  pub data_dir: TempDir,
  pub backend: Arc<ResilientBackend<MockBackend>>,
  pub index: Arc<IndexService>,
  pub search: SearchService,
}

impl TestContext {
  pub fn new() -> Self {
    Self::with_backend(MockBackend::new(), |_| {})
  }

  /// Build a context around `backend`, letting `configure` adjust the config.
  ///
  /// Retries are fast (3 attempts, 5ms base delay) so failing batches don't slow tests down.
  pub fn with_backend(backend: MockBackend, configure: impl FnOnce(&mut Config)) -> Self {
    let project = TempDir::new().expect("create project dir");
    let data_dir = TempDir::new().expect("create data dir");

    let mut config = Config {
      base_url: "http://remote.test".to_string(),
      token: "test-token".to_string(),
      data_dir: data_dir.path().to_path_buf(),
      ..Default::default()
    };
    configure(&mut config);

    let retry = RetryConfig {
      max_attempts: 3,
      initial_backoff: Duration::from_millis(5),
      request_timeout: Duration::from_secs(5),
      ..Default::default()
    };
    let backend = Arc::new(ResilientBackend::with_configs(backend, retry.clone(), retry));
    let index = Arc::new(IndexService::new(Arc::new(config), backend.clone()));
    let search = SearchService::new(index.clone());

    Self {
      project,
      data_dir,
      backend,
      index,
      search,
    }
  }

  pub fn root(&self) -> &Path {
    self.project.path()
  }

  /// The mock behind the retry wrapper
  pub fn remote(&self) -> &MockBackend {
    self.backend.inner()
  }

  pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.root().join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(&path, content).expect("write test file");
    path
  }

  pub fn remove_file(&self, relative: &str) {
    std::fs::remove_file(self.root().join(relative)).expect("remove test file");
  }

  /// Hashes currently persisted for the project
  pub async fn stored_hashes(&self) -> Vec<String> {
    let key = crate::project::normalize_project_path(self.root());
    self.index.store().hashes_for(&key).await
  }
}

/// `count` numbered lines, each newline-terminated
pub fn lines(prefix: &str, count: usize) -> String {
  (1..=count).map(|i| format!("{prefix} line {i}\n")).collect()
}
