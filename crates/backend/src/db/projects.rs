//! Persisted project index: normalized project path → blob hashes believed present remotely.
//!
//! Stored as one JSON object. The store is the only writer of this file.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use tracing::{debug, trace, warn};

use super::Result;

/// Project path → ordered hash list
pub type ProjectIndexMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct ProjectStore {
  path: PathBuf,
}

impl ProjectStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Load the full mapping.
  ///
  /// A missing, unreadable, or corrupt file yields an empty mapping; the next
  /// successful save replaces it.
  pub async fn load(&self) -> ProjectIndexMap {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "No project index yet");
        return ProjectIndexMap::new();
      }
      Err(e) => {
        warn!(path = %self.path.display(), err = %e, "Failed to read project index, treating as empty");
        return ProjectIndexMap::new();
      }
    };

    match serde_json::from_slice::<ProjectIndexMap>(&bytes) {
      Ok(map) => {
        trace!(path = %self.path.display(), projects = map.len(), "Loaded project index");
        map
      }
      Err(e) => {
        warn!(path = %self.path.display(), err = %e, "Corrupt project index, treating as empty");
        ProjectIndexMap::new()
      }
    }
  }

  /// Hashes recorded for one project, empty when unknown
  pub async fn hashes_for(&self, project: &str) -> Vec<String> {
    self.load().await.remove(project).unwrap_or_default()
  }

  /// Persist the full mapping, creating the data directory if needed.
  ///
  /// Writes to a sibling temp file and renames it into place.
  pub async fn save(&self, map: &ProjectIndexMap) -> Result<()> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(map)?;
    let tmp = self.path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, &self.path).await?;

    debug!(path = %self.path.display(), projects = map.len(), "Saved project index");
    Ok(())
  }
}
