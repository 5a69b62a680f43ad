use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// User preferences persisted to `prefs.toml` in the platform config dir.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub theme_name: Option<String>,
  pub sort_mode: Option<String>,
  pub category_filter: Option<String>,
  /// Catalog file used when `--catalog` is not given.
  pub catalog_path: Option<PathBuf>,
  pub embed_base: Option<String>,
  pub thumbnail_base: Option<String>,
}

impl Config {
  pub fn path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "reel").map(|dirs| dirs.config_dir().join("prefs.toml"))
  }

  pub fn load() -> Self {
    Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
  }

  /// Missing or unreadable files yield the defaults.
  pub fn load_from(path: &Path) -> Self {
    let Ok(content) = std::fs::read_to_string(path) else {
      return Self::default();
    };
    match toml::from_str(&content) {
      Ok(config) => config,
      Err(e) => {
        warn!(path = %path.display(), err = %e, "config: invalid prefs, using defaults");
        Self::default()
      }
    }
  }

  pub fn save(&self) {
    if let Some(path) = Self::path() {
      self.save_to(&path);
    }
  }

  pub fn save_to(&self, path: &Path) {
    if let Some(dir) = path.parent()
      && std::fs::create_dir_all(dir).is_ok()
      && let Ok(content) = toml::to_string(self)
      && let Err(e) = std::fs::write(path, content)
    {
      warn!(path = %path.display(), err = %e, "config: failed to save prefs");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(Config::load_from(&dir.path().join("prefs.toml")), Config::default());
  }

  #[test]
  fn invalid_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");
    std::fs::write(&path, "theme_name = [").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
  }

  #[test]
  fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.toml");
    let config = Config {
      theme_name: Some("Coral".to_string()),
      sort_mode: Some("newest".to_string()),
      category_filter: Some("Short Film".to_string()),
      catalog_path: Some(PathBuf::from("/tmp/catalog.ron")),
      embed_base: None,
      thumbnail_base: Some("https://cdn.example/thumb".to_string()),
    };
    config.save_to(&path);
    assert_eq!(Config::load_from(&path), config);
  }
}
