use std::path::Path;

use crate::domain::RawTagEntry;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
  #[error("could not open container: {0}")]
  Open(String),

  #[error("could not read stream information: {0}")]
  StreamInfo(String),
}

/// Media type of a stream, as classified by the demuxer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
  Audio,
  Video,
  Subtitle,
  Data,
  Attachment,
  Unknown,
}

/// One entry of a container's stream list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
  pub index: usize,
  pub kind: MediaKind,
}

/// Codec parameters of a single stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecDetails {
  pub sample_rate: u32,
  pub channels: u32,
  /// Long name of the registered decoder; `None` when no decoder handles the codec.
  pub decoder_name: Option<String>,
  /// `None` when the media type has no string form.
  pub media_type: Option<String>,
}

/// Port over the demuxing library.
///
/// `open` parses just enough of the file to list streams and tags. A failure after the
/// library handle was created must release it before returning.
pub trait Demuxer: Send + Sync {
  type Container: ProbedContainer;

  fn open(&self, path: &Path) -> Result<Self::Container, ProbeError>;
}

/// An opened, probed container.
///
/// Dropping the value closes the underlying handle, so every exit path closes it exactly once.
pub trait ProbedContainer {
  type Tags<'a>: Iterator<Item = RawTagEntry>
  where
    Self: 'a;

  /// Streams in index order.
  fn streams(&self) -> Vec<StreamSummary>;

  fn codec_details(&self, index: usize) -> Option<CodecDetails>;

  /// Container tags in dictionary order.
  fn container_tags(&self) -> Self::Tags<'_>;

  /// Tags of stream `index` in dictionary order; empty if the index does not exist.
  fn stream_tags(&self, index: usize) -> Self::Tags<'_>;

  fn bit_rate(&self) -> i64;

  fn duration(&self) -> i64;
}
