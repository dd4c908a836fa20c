//! Project file collection
//!
//! Walks a project tree and turns every indexable text file into blobs.
//!
//! ## Pipeline
//!
//! ```text
//! Project root
//!   ├── Walker (exclusion patterns, optional .gitignore) → candidate paths
//!   ├── Extension allow-list                              → text files
//!   ├── Reader (UTF-8 only, unreadable files skipped)     → (relative path, content)
//!   └── Chunker (max lines per blob)                      → blobs with hashes
//! ```

pub mod chunker;
pub mod exclude;

use std::{
  path::{Path, PathBuf},
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
  time::Instant,
};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

pub use self::{chunker::split_into_blobs, exclude::ExclusionMatcher};
use crate::domain::{blob::Blob, config::Config};

// ============================================================================
// Error Type
// ============================================================================

/// Errors that stop a collection pass. Individual unreadable files are not errors.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
  #[error("Project path does not exist: {0}")]
  ProjectNotFound(PathBuf),
  #[error("Project path is not a directory: {0}")]
  NotADirectory(PathBuf),
  #[error("File walk failed: {0}")]
  Walk(String),
}

// ============================================================================
// Collection
// ============================================================================

/// Blobs gathered from one walk of the project tree
#[derive(Debug, Default)]
pub struct CollectResult {
  /// Blobs in walk order, large files already chunked
  pub blobs: Vec<Blob>,
  /// Files read successfully
  pub files: usize,
  /// Entries pruned by exclusion patterns
  pub excluded: usize,
  /// Files skipped because they couldn't be read as text
  pub unreadable: usize,
}

/// A file accepted by the walker, not yet read
#[derive(Debug)]
struct Candidate {
  path: PathBuf,
  relative: String,
}

/// Collect every indexable file under `root` as blobs.
pub async fn collect_blobs(root: &Path, config: &Config) -> Result<CollectResult, CollectError> {
  match tokio::fs::metadata(root).await {
    Ok(meta) if meta.is_dir() => {}
    Ok(_) => return Err(CollectError::NotADirectory(root.to_path_buf())),
    Err(_) => return Err(CollectError::ProjectNotFound(root.to_path_buf())),
  }

  let start = Instant::now();
  let walk_root = root.to_path_buf();
  let walk_config = config.clone();
  let (candidates, excluded) = tokio::task::spawn_blocking(move || walk_candidates(&walk_root, &walk_config))
    .await
    .map_err(|e| CollectError::Walk(e.to_string()))?;

  debug!(
    candidates = candidates.len(),
    excluded,
    elapsed_ms = start.elapsed().as_millis(),
    "Walk complete"
  );

  let mut result = CollectResult {
    excluded,
    ..Default::default()
  };

  for candidate in candidates {
    let bytes = match tokio::fs::read(&candidate.path).await {
      Ok(bytes) => bytes,
      Err(e) => {
        warn!(path = %candidate.path.display(), err = %e, "Failed to read file, skipping");
        result.unreadable += 1;
        continue;
      }
    };

    let content = match String::from_utf8(bytes) {
      Ok(content) => content,
      Err(_) => {
        warn!(path = %candidate.path.display(), "File is not valid UTF-8 text, skipping");
        result.unreadable += 1;
        continue;
      }
    };

    result.files += 1;
    result
      .blobs
      .extend(split_into_blobs(&candidate.relative, &content, config.max_lines_per_blob));
  }

  info!(
    root = %root.display(),
    files = result.files,
    blobs = result.blobs.len(),
    excluded = result.excluded,
    unreadable = result.unreadable,
    elapsed_ms = start.elapsed().as_millis(),
    "Collected project files"
  );

  Ok(result)
}

/// Blocking directory walk. Returns accepted files and the number of pruned entries.
fn walk_candidates(root: &Path, config: &Config) -> (Vec<Candidate>, usize) {
  let excluded = Arc::new(AtomicUsize::new(0));
  let matcher = ExclusionMatcher::new(&config.exclude_patterns);

  let mut builder = WalkBuilder::new(root);
  builder
    .standard_filters(false)
    .git_ignore(config.respect_gitignore)
    .require_git(false)
    .follow_links(false)
    .sort_by_file_name(|a, b| a.cmp(b));

  let filter_root = root.to_path_buf();
  let filter_count = Arc::clone(&excluded);
  builder.filter_entry(move |entry| {
    if entry.depth() == 0 {
      return true;
    }
    if matcher.is_excluded(&filter_root, entry.path()) {
      filter_count.fetch_add(1, Ordering::Relaxed);
      return false;
    }
    true
  });

  let mut candidates = Vec::new();
  for entry in builder.build() {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        warn!(err = %e, "Walk error, skipping entry");
        continue;
      }
    };

    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
      continue;
    }

    let path = entry.path();
    let allowed = path
      .extension()
      .and_then(|e| e.to_str())
      .is_some_and(|ext| config.is_text_extension(ext));
    if !allowed {
      continue;
    }

    let Ok(relative) = path.strip_prefix(root) else {
      warn!(path = %path.display(), "File not under root, skipping");
      continue;
    };

    candidates.push(Candidate {
      path: path.to_path_buf(),
      relative: relative.to_string_lossy().replace('\\', "/"),
    });
  }

  (candidates, excluded.load(Ordering::Relaxed))
}
