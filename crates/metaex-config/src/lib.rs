mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{ConfigError, MetaexPaths};

use once_cell::sync::OnceCell;

static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Process-wide backend over the detected paths, created on first use.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| MetaexPaths::new().map(TomlConfigBackend::new))
}
