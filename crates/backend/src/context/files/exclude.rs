//! Exclusion rules for the file collector.
//!
//! Patterns are glob-like (`*` matches any run of characters, `?` any single
//! character) and anchored to the whole string. A path is excluded when any
//! pattern matches one of its segments relative to the project root, or the
//! relative path as a whole.

use std::path::{Component, Path};

use wildmatch::WildMatch;

#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
  patterns: Vec<WildMatch>,
}

impl ExclusionMatcher {
  pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
    Self {
      patterns: patterns
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(WildMatch::new)
        .collect(),
    }
  }

  /// Decide whether `path` under `root` is left out of indexing.
  ///
  /// Paths that can't be made relative to `root` are never excluded.
  pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
    if self.patterns.is_empty() {
      return false;
    }

    let Ok(relative) = path.strip_prefix(root) else {
      return false;
    };

    let segment_match = relative.components().any(|component| match component {
      Component::Normal(segment) => self.matches(&segment.to_string_lossy()),
      _ => false,
    });
    if segment_match {
      return true;
    }

    let relative = relative.to_string_lossy().replace('\\', "/");
    !relative.is_empty() && self.matches(&relative)
  }

  fn matches(&self, candidate: &str) -> bool {
    self.patterns.iter().any(|pattern| pattern.matches(candidate))
  }
}
