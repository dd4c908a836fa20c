/// Get the default base path for ctxsync data
///
/// Respects the following environment variables (in order of precedence):
/// 1. CTXSYNC_DATA_DIR - explicit data directory override
/// 2. XDG_DATA_HOME - standard XDG data home directory
/// 3. dirs::data_local_dir() - platform default
pub fn default_data_dir() -> std::path::PathBuf {
  if let Ok(dir) = std::env::var("CTXSYNC_DATA_DIR") {
    return std::path::PathBuf::from(dir);
  }

  if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
    return std::path::PathBuf::from(xdg_data).join("ctxsync");
  }

  dirs::data_local_dir()
    .unwrap_or_else(|| std::path::PathBuf::from("."))
    .join("ctxsync")
}

/// Get the default config directory
///
/// Respects the following environment variables (in order of precedence):
/// 1. CTXSYNC_CONFIG_DIR - explicit config directory override
/// 2. XDG_CONFIG_HOME - standard XDG config home directory
/// 3. dirs::config_dir() - platform default
pub fn default_config_dir() -> std::path::PathBuf {
  if let Ok(dir) = std::env::var("CTXSYNC_CONFIG_DIR") {
    return std::path::PathBuf::from(dir);
  }

  if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
    return std::path::PathBuf::from(xdg_config).join("ctxsync");
  }

  dirs::config_dir()
    .unwrap_or_else(|| std::path::PathBuf::from("."))
    .join("ctxsync")
}

/// Path of the settings file, `CTXSYNC_CONFIG` wins over the config directory.
pub fn settings_file_path() -> std::path::PathBuf {
  if let Ok(path) = std::env::var("CTXSYNC_CONFIG") {
    return std::path::PathBuf::from(path);
  }
  default_config_dir().join("settings.toml")
}
