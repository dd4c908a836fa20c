//! Index command

use std::path::Path;

use anyhow::{Context, Result};
use ctxsync::{IndexService, config::Config, project::resolve_project_root};
use tracing::debug;

/// Index a project and print the result
pub async fn cmd_index(config: Config, path: Option<&Path>, json: bool) -> Result<()> {
  let root = resolve_project_root(path, config.default_project.as_deref());
  debug!(root = %root.display(), "Indexing project");

  let service = IndexService::from_config(config).context("Failed to initialize indexing")?;
  let result = service.index_project(&root).await;

  if json {
    println!("{}", serde_json::to_string_pretty(&result)?);
  } else {
    print!("{}", result);
  }

  if result.is_error() {
    std::process::exit(1);
  }
  Ok(())
}
