use std::collections::BTreeMap;
use std::path::PathBuf;

use metaex_config::{ConfigBackend, ConfigError};
use metaex_fs::DEFAULT_FD_LINK_DIR;
use serde::{Deserialize, Serialize};

const SECTION: &str = "probe";

/// Settings for descriptor resolution and container probing, section `[probe]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
  /// Directory with one symlink per open descriptor.
  #[serde(default = "default_fd_link_dir")]
  pub fd_link_dir: PathBuf,

  /// Demuxer open options such as `probesize` or `analyzeduration`. Empty means library defaults.
  #[serde(default)]
  pub format_options: BTreeMap<String, String>,
}

fn default_fd_link_dir() -> PathBuf {
  PathBuf::from(DEFAULT_FD_LINK_DIR)
}

impl Default for ProbeConfig {
  fn default() -> Self {
    Self { fd_link_dir: default_fd_link_dir(), format_options: BTreeMap::new() }
  }
}

impl ProbeConfig {
  /// Reads `[probe]` from metaex.toml, falling back to defaults when absent.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(metaex_config::config_backend()?)
  }

  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_section_with_default(SECTION)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    self.save_to(metaex_config::config_backend()?)
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }

  pub fn builder() -> ProbeConfigBuilder {
    ProbeConfigBuilder::new()
  }
}

#[derive(Debug, Clone)]
pub struct ProbeConfigBuilder {
  inner: ProbeConfig,
}

impl ProbeConfigBuilder {
  pub fn new() -> Self {
    Self { inner: ProbeConfig::default() }
  }

  pub fn fd_link_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.inner.fd_link_dir = dir.into();
    self
  }

  pub fn format_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.inner.format_options.insert(key.into(), value.into());
    self
  }

  pub fn build(self) -> ProbeConfig {
    self.inner
  }
}

impl Default for ProbeConfigBuilder {
  fn default() -> Self {
    Self::new()
  }
}
