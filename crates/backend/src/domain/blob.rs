//! Blobs: named units of text submitted for indexing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable identifier for a (path, content) pair.
///
/// SHA-256 over the path bytes followed by the content bytes, hex encoded.
/// Used as a deduplication key, so equal digests are treated as equal content.
pub fn content_hash(path: &str, content: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(path.as_bytes());
  hasher.update(content.as_bytes());
  hex::encode(hasher.finalize())
}

/// A whole file, or one chunk of a large file, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
  /// Project-relative path, possibly suffixed with `#chunk<i>of<n>`
  pub path: String,
  pub content: String,
  #[serde(skip)]
  pub hash: String,
}

impl Blob {
  pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
    let path = path.into();
    let content = content.into();
    let hash = content_hash(&path, &content);
    Self { path, content, hash }
  }
}
