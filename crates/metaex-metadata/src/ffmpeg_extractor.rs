use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;
use tracing::warn;

use metaex_core::domain::MetadataResult;
use metaex_core::ports::{MetadataError, MetadataExtractor};
use metaex_fs::FdResolver;

use crate::assembler::MetadataAssembler;
use crate::config::ProbeConfig;
use crate::ffmpeg_probe::FfmpegDemuxer;

/// FFmpeg-backed metadata extractor, the entry point for host applications.
#[derive(Clone)]
pub struct FfmpegProbe {
  assembler: Arc<MetadataAssembler<FfmpegDemuxer>>,
}

impl FfmpegProbe {
  pub fn new() -> Self {
    Self::with_config(&ProbeConfig::default())
  }

  pub fn with_config(config: &ProbeConfig) -> Self {
    if let Err(e) = ffmpeg::init() {
      warn!(error = %e, "ffmpeg initialisation failed");
    }

    let resolver = FdResolver::with_link_dir(&config.fd_link_dir);
    let demuxer = FfmpegDemuxer::with_options(config.format_options.clone());
    Self { assembler: Arc::new(MetadataAssembler::new(resolver, demuxer)) }
  }

  /// Blocking extraction on the current thread.
  pub fn extract_sync(&self, fd: i32) -> MetadataResult {
    self.assembler.extract(fd)
  }

  pub fn extract_path_sync(&self, path: &Path) -> MetadataResult {
    self.assembler.extract_from_path(path)
  }
}

impl Default for FfmpegProbe {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl MetadataExtractor for FfmpegProbe {
  async fn extract_from_fd(&self, fd: i32) -> Result<MetadataResult, MetadataError> {
    let assembler = Arc::clone(&self.assembler);

    // Probing blocks on file I/O; keep it off the async workers.
    tokio::task::spawn_blocking(move || assembler.extract(fd))
      .await
      .map_err(|e| MetadataError::Internal(format!("Tokio Task Join Error: {}", e)))
  }
}
