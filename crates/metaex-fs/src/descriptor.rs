use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Where Linux (and Android) expose one symlink per open descriptor of the current process.
pub const DEFAULT_FD_LINK_DIR: &str = "/proc/self/fd";

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("invalid file descriptor: {0}")]
  InvalidDescriptor(i32),

  #[error("cannot read link for fd {fd} ({}): {source}", link.display())]
  ReadLink {
    fd: i32,
    link: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("fd {fd} does not refer to a filesystem path: {}", target.display())]
  NotAPath { fd: i32, target: PathBuf },
}

/// Maps an open file descriptor to the path of the file behind it.
///
/// The lookup goes through the per-descriptor self links of `link_dir`. `read_link`
/// grows its buffer as needed, so target length is not limited here.
#[derive(Debug, Clone)]
pub struct FdResolver {
  link_dir: PathBuf,
}

impl FdResolver {
  pub fn new() -> Self {
    Self::with_link_dir(DEFAULT_FD_LINK_DIR)
  }

  pub fn with_link_dir(link_dir: impl Into<PathBuf>) -> Self {
    Self { link_dir: link_dir.into() }
  }

  pub fn link_dir(&self) -> &Path {
    &self.link_dir
  }

  pub fn resolve(&self, fd: i32) -> Result<PathBuf, ResolveError> {
    if fd < 0 {
      return Err(ResolveError::InvalidDescriptor(fd));
    }

    let link = self.link_dir.join(fd.to_string());
    let target = std::fs::read_link(&link).map_err(|source| ResolveError::ReadLink { fd, link, source })?;

    // pipes, sockets and anon inodes show up as "pipe:[1234]" and friends
    if !target.is_absolute() {
      return Err(ResolveError::NotAPath { fd, target });
    }

    debug!(fd, path = %target.display(), "resolved descriptor");
    Ok(target)
  }
}

impl Default for FdResolver {
  fn default() -> Self {
    Self::new()
  }
}
