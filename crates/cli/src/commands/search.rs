//! Search command

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use ctxsync::{IndexService, SearchService, config::Config, project::resolve_project_root};
use tracing::debug;

/// Re-index the project, run the query, and print the retrieved context
pub async fn cmd_search(config: Config, query: &str, project: Option<&Path>) -> Result<()> {
  let root = resolve_project_root(project, config.default_project.as_deref());
  debug!(root = %root.display(), "Searching project");

  let index = IndexService::from_config(config).context("Failed to initialize search")?;
  let search = SearchService::new(Arc::new(index));
  let text = search.search_context(&root, query).await;

  println!("{}", text);

  if text.starts_with("Error:") {
    std::process::exit(1);
  }
  Ok(())
}
