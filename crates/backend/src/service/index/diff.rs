//! Hash-set difference between a fresh scan and the stored record.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
  /// Hashes present in both the scan and the stored record
  pub unchanged: Vec<String>,
  /// Hashes present only in the scan
  pub new: Vec<String>,
}

/// Partition `current` into unchanged and new relative to `stored`.
///
/// Order follows `current`, duplicates are dropped. Stored hashes missing from
/// `current` are simply not carried forward.
pub fn diff_hashes(current: &[String], stored: &[String]) -> DiffResult {
  let stored: HashSet<&str> = stored.iter().map(String::as_str).collect();
  let mut seen = HashSet::with_capacity(current.len());
  let mut result = DiffResult::default();

  for hash in current {
    if !seen.insert(hash.as_str()) {
      continue;
    }
    if stored.contains(hash.as_str()) {
      result.unchanged.push(hash.clone());
    } else {
      result.new.push(hash.clone());
    }
  }

  result
}
