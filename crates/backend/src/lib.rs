mod context;
mod db;
mod domain;
mod service;

pub mod dirs;
pub mod remote;

pub use context::files::{CollectError, CollectResult, ExclusionMatcher, collect_blobs, split_into_blobs};
pub use db::{DbError, ProjectIndexMap, ProjectStore};
pub use domain::{blob, config, index, project};
pub use service::{
  index::IndexService,
  search::{NO_RESULTS_MESSAGE, SearchService},
  util::ServiceError,
};
