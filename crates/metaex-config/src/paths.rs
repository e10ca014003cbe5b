use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BASE_DIR_VAR: &str = "METAEX_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Where metaex keeps its configuration. Created on construction.
#[derive(Debug, Clone)]
pub struct MetaexPaths {
  pub config_dir: PathBuf,
}

impl MetaexPaths {
  /// `$METAEX_BASE_DIR/config` when the variable is set, the platform config directory otherwise.
  pub fn new() -> Result<Self, ConfigError> {
    match std::env::var_os(BASE_DIR_VAR) {
      Some(base) => Self::at(base),
      None => {
        let proj_dirs = ProjectDirs::from("dev", "metaex", "metaex").ok_or(ConfigError::Directories)?;
        Self::in_dir(proj_dirs.config_dir())
      }
    }
  }

  /// Paths rooted at `base`, without consulting the environment.
  pub fn at(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    Self::in_dir(&base.into().join("config"))
  }

  fn in_dir(config_dir: &Path) -> Result<Self, ConfigError> {
    std::fs::create_dir_all(config_dir)?;
    Ok(Self { config_dir: config_dir.to_path_buf() })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("metaex.toml")
  }
}
