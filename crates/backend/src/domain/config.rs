//! Configuration for ctxsync.
//!
//! Priority (highest first): CLI overrides > environment (`CTXSYNC_*`) >
//! settings file (`~/.config/ctxsync/settings.toml`) > built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dirs::{default_data_dir, settings_file_path};

/// Name of the persisted project index inside the data directory
pub const PROJECTS_FILE_NAME: &str = "projects.json";

/// Extensions indexed when the settings file doesn't provide its own list
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
  ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".go", ".rs", ".cpp", ".c", ".h", ".hpp", ".cs", ".rb", ".php",
  ".md", ".txt", ".json", ".yaml", ".yml", ".toml", ".xml", ".html", ".css", ".scss", ".sql", ".sh", ".bash",
];

/// Exclusion patterns applied when the settings file doesn't provide its own list
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
  // Virtual environments
  ".venv",
  "venv",
  ".env",
  "env",
  // Dependencies
  "node_modules",
  // Version control
  ".git",
  ".svn",
  ".hg",
  // Caches
  "__pycache__",
  ".pytest_cache",
  ".mypy_cache",
  ".tox",
  ".eggs",
  "*.egg-info",
  // Build outputs
  "dist",
  "build",
  "target",
  "bin",
  "obj",
  ".gradle",
  // Editors and OS
  ".idea",
  ".vscode",
  ".DS_Store",
  // Compiled python
  "*.pyc",
  "*.pyo",
  "*.pyd",
  ".Python",
  // Coverage
  ".coverage",
  "htmlcov",
  "pip-log.txt",
  "pip-delete-this-directory.txt",
];

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Missing required setting: {0}")]
  Missing(&'static str),
  #[error("Invalid value for {key}: {reason}")]
  Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Retry / timeout settings
// ============================================================================

/// Network retry and timeout settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
  /// Total attempts per request, including the first (default: 3)
  pub max_attempts: u32,
  /// Delay before the first retry; doubles on each subsequent retry (default: 1000)
  pub base_delay_ms: u64,
  /// Per-request timeout for batch uploads (default: 30)
  pub upload_timeout_secs: u64,
  /// Per-request timeout for retrieval queries (default: 60)
  pub retrieval_timeout_secs: u64,
}

impl Default for RetrySettings {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      base_delay_ms: 1000,
      upload_timeout_secs: 30,
      retrieval_timeout_secs: 60,
    }
  }
}

// ============================================================================
// Root configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Base URL of the remote indexing/retrieval service
  pub base_url: String,

  /// Bearer credential for the remote service
  pub token: String,

  /// Maximum blobs per upload request (default: 10)
  pub batch_size: usize,

  /// Files longer than this are split into chunks (default: 800)
  pub max_lines_per_blob: usize,

  /// File extensions that participate in indexing
  pub text_extensions: Vec<String>,

  /// Glob-like patterns (`*`, `?`) matched against path segments and the relative path
  pub exclude_patterns: Vec<String>,

  /// Directory holding `projects.json`
  pub data_dir: PathBuf,

  /// Project used when a command doesn't name one
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default_project: Option<PathBuf>,

  /// Also honour the project's .gitignore files (default: true)
  pub respect_gitignore: bool,

  /// Output length cap passed to retrieval, 0 lets the service decide
  pub max_output_length: usize,

  /// Log level for the CLI subscriber (default: info)
  pub log_level: String,

  #[serde(default)]
  pub retry: RetrySettings,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      base_url: String::new(),
      token: String::new(),
      batch_size: 10,
      max_lines_per_blob: 800,
      text_extensions: DEFAULT_TEXT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
      exclude_patterns: DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()).collect(),
      data_dir: default_data_dir(),
      default_project: None,
      respect_gitignore: true,
      max_output_length: 0,
      log_level: "info".to_string(),
      retry: RetrySettings::default(),
    }
  }
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub base_url: Option<String>,
  pub token: Option<String>,
  pub batch_size: Option<usize>,
  pub max_lines_per_blob: Option<usize>,
  pub data_dir: Option<PathBuf>,
  pub default_project: Option<PathBuf>,
}

impl Config {
  /// Merge every configuration layer. Does not validate.
  pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
    let mut config = Self::from_settings_file(&settings_file_path());
    config.apply_env_from(|key| std::env::var(key).ok())?;
    config.apply_overrides(overrides);
    config.normalize();
    Ok(config)
  }

  /// Read the TOML settings file, falling back to defaults when it is missing or malformed
  pub fn from_settings_file(path: &Path) -> Self {
    if !path.exists() {
      debug!(path = %path.display(), "No settings file, using defaults");
      return Self::default();
    }

    match std::fs::read_to_string(path) {
      Ok(content) => match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
          warn!(path = %path.display(), err = %e, "Malformed settings file, ignoring");
          Self::default()
        }
      },
      Err(e) => {
        warn!(path = %path.display(), err = %e, "Failed to read settings file, ignoring");
        Self::default()
      }
    }
  }

  /// Apply `CTXSYNC_*` variables through `lookup`.
  pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(url) = lookup("CTXSYNC_BASE_URL") {
      self.base_url = url;
    }
    if let Some(token) = lookup("CTXSYNC_TOKEN") {
      self.token = token;
    }
    if let Some(raw) = lookup("CTXSYNC_BATCH_SIZE") {
      self.batch_size = parse_env_number("batch_size", &raw)?;
    }
    if let Some(raw) = lookup("CTXSYNC_MAX_LINES_PER_BLOB") {
      self.max_lines_per_blob = parse_env_number("max_lines_per_blob", &raw)?;
    }
    if let Some(dir) = lookup("CTXSYNC_DATA_DIR") {
      self.data_dir = PathBuf::from(dir);
    }
    if let Some(project) = lookup("CTXSYNC_DEFAULT_PROJECT") {
      self.default_project = Some(PathBuf::from(project));
    }
    if let Some(level) = lookup("CTXSYNC_LOG_LEVEL") {
      self.log_level = level;
    }
    Ok(())
  }

  pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
    if let Some(ref url) = overrides.base_url {
      self.base_url = url.clone();
    }
    if let Some(ref token) = overrides.token {
      self.token = token.clone();
    }
    if let Some(size) = overrides.batch_size {
      self.batch_size = size;
    }
    if let Some(lines) = overrides.max_lines_per_blob {
      self.max_lines_per_blob = lines;
    }
    if let Some(ref dir) = overrides.data_dir {
      self.data_dir = dir.clone();
    }
    if let Some(ref project) = overrides.default_project {
      self.default_project = Some(project.clone());
    }
  }

  fn normalize(&mut self) {
    self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
  }

  /// Fail fast on settings the indexing pass can't run without
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.base_url.trim().is_empty() {
      return Err(ConfigError::Missing("base_url"));
    }
    if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
      return Err(ConfigError::Invalid {
        key: "base_url",
        reason: format!("'{}' is not an http(s) URL", self.base_url),
      });
    }
    if self.token.trim().is_empty() {
      return Err(ConfigError::Missing("token"));
    }
    if self.batch_size == 0 {
      return Err(ConfigError::Invalid {
        key: "batch_size",
        reason: "must be at least 1".to_string(),
      });
    }
    if self.max_lines_per_blob == 0 {
      return Err(ConfigError::Invalid {
        key: "max_lines_per_blob",
        reason: "must be at least 1".to_string(),
      });
    }
    if self.retry.max_attempts == 0 {
      return Err(ConfigError::Invalid {
        key: "retry.max_attempts",
        reason: "must be at least 1".to_string(),
      });
    }
    Ok(())
  }

  /// Location of the persisted project index
  pub fn projects_file(&self) -> PathBuf {
    self.data_dir.join(PROJECTS_FILE_NAME)
  }

  /// Copy safe for display, with the credential masked
  pub fn redacted(&self) -> Self {
    let mut copy = self.clone();
    if !copy.token.is_empty() {
      let visible: String = copy.token.chars().take(4).collect();
      copy.token = format!("{}****", visible);
    }
    copy
  }

  /// Whether `ext` (without the dot) is in the allow-list
  pub fn is_text_extension(&self, ext: &str) -> bool {
    self
      .text_extensions
      .iter()
      .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
  }
}

fn parse_env_number(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
  raw.trim().parse().map_err(|_| ConfigError::Invalid {
    key,
    reason: format!("'{}' is not a number", raw),
  })
}
