use thiserror::Error;

use crate::domain::Status;
use crate::ports::ProbeError;

/// Why an extraction call stopped early.
///
/// The pipeline never hands this to the host directly: it collapses into
/// the matching [`Status`] of an otherwise empty result.
#[derive(Debug, Error)]
pub enum ExtractError {
  #[error("path resolution failed: {0}")]
  PathResolution(String),

  #[error(transparent)]
  Probe(#[from] ProbeError),
}

impl ExtractError {
  pub fn status(&self) -> Status {
    match self {
      ExtractError::PathResolution(_) => Status::PathResolutionError,
      ExtractError::Probe(ProbeError::Open(_)) => Status::OpenError,
      ExtractError::Probe(ProbeError::StreamInfo(_)) => Status::StreamInfoError,
    }
  }
}
