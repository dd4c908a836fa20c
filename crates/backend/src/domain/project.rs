use std::path::{Path, PathBuf};

/// Key under which a project's hashes are persisted.
///
/// Canonicalizes when the path exists (resolving symlinks and `..`), otherwise
/// makes it absolute against the current directory. Separators are always `/`.
pub fn normalize_project_path(path: &Path) -> String {
  let resolved = path.canonicalize().unwrap_or_else(|_| absolute(path));
  resolved.to_string_lossy().replace('\\', "/")
}

fn absolute(path: &Path) -> PathBuf {
  if path.is_absolute() {
    return path.to_path_buf();
  }
  std::env::current_dir()
    .map(|cwd| cwd.join(path))
    .unwrap_or_else(|_| path.to_path_buf())
}

/// Pick the project for a command: explicit path, then configured default, then cwd.
pub fn resolve_project_root(explicit: Option<&Path>, default_project: Option<&Path>) -> PathBuf {
  explicit
    .or(default_project)
    .map(Path::to_path_buf)
    .or_else(|| std::env::current_dir().ok())
    .unwrap_or_else(|| PathBuf::from("."))
}
