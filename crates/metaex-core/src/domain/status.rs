use serde::{Deserialize, Serialize};

/// Outcome of one extraction call.
///
/// The integer codes are the ones the host application already understands,
/// so they are part of the wire contract and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Status {
  /// The pipeline ran to completion.
  #[default]
  Success,
  /// The descriptor could not be mapped to a filesystem path.
  PathResolutionError,
  /// The demuxer could not open the container at the resolved path.
  OpenError,
  /// The container opened but its streams could not be probed.
  StreamInfoError,
}

impl Status {
  pub const fn code(self) -> i32 {
    match self {
      Status::Success => 0,
      Status::PathResolutionError => 1001,
      Status::OpenError => 1002,
      Status::StreamInfoError => 1003,
    }
  }

  pub const fn is_success(self) -> bool {
    matches!(self, Status::Success)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown status code: {0}")]
pub struct UnknownStatusCode(pub i32);

impl From<Status> for i32 {
  fn from(status: Status) -> Self {
    status.code()
  }
}

impl TryFrom<i32> for Status {
  type Error = UnknownStatusCode;

  fn try_from(code: i32) -> Result<Self, Self::Error> {
    match code {
      0 => Ok(Status::Success),
      1001 => Ok(Status::PathResolutionError),
      1002 => Ok(Status::OpenError),
      1003 => Ok(Status::StreamInfoError),
      other => Err(UnknownStatusCode(other)),
    }
  }
}
