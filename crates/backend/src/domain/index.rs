//! Outcome of one indexing pass.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
  Success,
  /// At least one batch failed while others succeeded
  PartialSuccess,
  /// No indexing work could be attempted
  Error,
}

impl fmt::Display for IndexStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      IndexStatus::Success => "success",
      IndexStatus::PartialSuccess => "partial_success",
      IndexStatus::Error => "error",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
  /// Unique blobs produced by the scan
  pub total_blobs: usize,
  /// Blobs already present remotely
  pub existing_blobs: usize,
  /// Blobs that needed uploading
  pub new_blobs: usize,
  /// New blobs left unconfirmed because their batch failed
  pub skipped_blobs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResult {
  pub status: IndexStatus,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project_path: Option<String>,
  /// 1-based ordinals of batches that failed
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub failed_batches: Vec<usize>,
  #[serde(default)]
  pub stats: IndexStats,
}

impl IndexResult {
  pub fn error(message: impl Into<String>, project_path: Option<String>) -> Self {
    Self {
      status: IndexStatus::Error,
      message: message.into(),
      project_path,
      failed_batches: Vec::new(),
      stats: IndexStats::default(),
    }
  }

  pub fn is_error(&self) -> bool {
    self.status == IndexStatus::Error
  }
}

impl fmt::Display for IndexResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Status:   {}", self.status)?;
    writeln!(f, "Message:  {}", self.message)?;
    if let Some(ref path) = self.project_path {
      writeln!(f, "Project:  {}", path)?;
    }
    if self.status != IndexStatus::Error {
      writeln!(
        f,
        "Blobs:    {} total, {} existing, {} new, {} skipped",
        self.stats.total_blobs, self.stats.existing_blobs, self.stats.new_blobs, self.stats.skipped_blobs
      )?;
    }
    if !self.failed_batches.is_empty() {
      let ordinals: Vec<String> = self.failed_batches.iter().map(|b| b.to_string()).collect();
      writeln!(f, "Failed:   batches {}", ordinals.join(", "))?;
    }
    Ok(())
  }
}
