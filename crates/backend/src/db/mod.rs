mod projects;

use thiserror::Error;

pub use projects::{ProjectIndexMap, ProjectStore};

#[derive(Error, Debug)]
pub enum DbError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
