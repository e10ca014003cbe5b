use crate::domain::MetadataResult;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
  #[error("internal error: {0}")]
  Internal(String),
}

/// Port that reads audio metadata from an open file descriptor.
///
/// Pipeline failures are reported through [`MetadataResult::status`]; the error side
/// is reserved for failures of the adapter itself (e.g. a worker thread that died).
#[async_trait::async_trait]
pub trait MetadataExtractor: Send + Sync {
  /// The descriptor must stay open until the returned future completes.
  async fn extract_from_fd(&self, fd: i32) -> Result<MetadataResult, MetadataError>;
}
