use serde::{Deserialize, Serialize};

use crate::domain::status::Status;
use crate::domain::tag::CanonicalField;

/// Title, artist, album and genre as resolved from container tags.
///
/// Each slot is written at most once: the first matching tag wins and later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFields {
  pub title: Option<String>,
  pub artist: Option<String>,
  pub album: Option<String>,
  pub genre: Option<String>,
}

impl CanonicalFields {
  pub fn get(&self, field: CanonicalField) -> Option<&str> {
    match field {
      CanonicalField::Title => self.title.as_deref(),
      CanonicalField::Artist => self.artist.as_deref(),
      CanonicalField::Album => self.album.as_deref(),
      CanonicalField::Genre => self.genre.as_deref(),
    }
  }

  /// Stores `value` unless the slot already holds one. Returns whether it was stored.
  pub fn fill(&mut self, field: CanonicalField, value: impl Into<String>) -> bool {
    let slot = match field {
      CanonicalField::Title => &mut self.title,
      CanonicalField::Artist => &mut self.artist,
      CanonicalField::Album => &mut self.album,
      CanonicalField::Genre => &mut self.genre,
    };

    if slot.is_some() {
      return false;
    }
    *slot = Some(value.into());
    true
  }
}

/// Technical details of the selected audio stream.
///
/// Everything stays at its default when the container has no audio stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
  /// Hz.
  pub sample_rate: u32,
  pub channels: u32,
  /// Long name of the decoder registered for the stream's codec.
  pub codec: Option<String>,
  /// Media type string, e.g. `"audio"`.
  pub codec_type: Option<String>,
}

/// Container-wide values, passed through as the demuxer reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
  /// Bits per second. Zero or negative when unknown.
  pub bitrate: i64,
  /// In the demuxer's native time base, not rescaled.
  pub duration: i64,
}

/// Everything one extraction call produces.
///
/// Built once per call and handed to the caller; nothing is cached between calls.
/// When `status` is a failure every other field keeps its default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResult {
  pub status: Status,
  #[serde(flatten)]
  pub container: ContainerInfo,
  #[serde(flatten)]
  pub stream: StreamInfo,
  #[serde(flatten)]
  pub tags: CanonicalFields,
  /// `"key: value"` for every tag that is not a canonical field, container scope first.
  pub extras_raw: Vec<String>,
}

impl MetadataResult {
  /// A result that carries nothing but a failure status.
  pub fn failed(status: Status) -> Self {
    Self { status, ..Self::default() }
  }
}
