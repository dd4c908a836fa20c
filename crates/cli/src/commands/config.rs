//! Config commands

use anyhow::Result;
use ctxsync::{config::Config, dirs::settings_file_path};

/// Print the effective configuration with the token masked
pub async fn cmd_config_show(config: &Config) -> Result<()> {
  let settings = settings_file_path();

  if settings.exists() {
    println!("Using settings file: {}", settings.display());
  } else {
    println!("Using default configuration (no settings file at {})", settings.display());
  }
  println!("Project index: {}", config.projects_file().display());
  println!();

  let toml_str = toml::to_string_pretty(&config.redacted())?;
  println!("{}", toml_str);

  if let Err(e) = config.validate() {
    println!("Warning: configuration is incomplete: {}", e);
  }

  Ok(())
}
