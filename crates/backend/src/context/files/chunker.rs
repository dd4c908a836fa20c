//! Line-bounded splitting of oversized files.

use crate::domain::blob::Blob;

/// Synthetic path for chunk `index` (1-based) of `total`
pub fn chunk_path(relative_path: &str, index: usize, total: usize) -> String {
  format!("{}#chunk{}of{}", relative_path, index, total)
}

/// Split `content` into blobs of at most `max_lines` lines each.
///
/// Files within the limit come back as a single blob under their own path.
/// Line endings are kept, so concatenating chunk contents in order reproduces
/// the original text exactly.
pub fn split_into_blobs(relative_path: &str, content: &str, max_lines: usize) -> Vec<Blob> {
  let max_lines = max_lines.max(1);
  let lines: Vec<&str> = content.split_inclusive('\n').collect();

  if lines.len() <= max_lines {
    return vec![Blob::new(relative_path, content)];
  }

  let total = lines.len().div_ceil(max_lines);
  lines
    .chunks(max_lines)
    .enumerate()
    .map(|(i, group)| Blob::new(chunk_path(relative_path, i + 1, total), group.concat()))
    .collect()
}
