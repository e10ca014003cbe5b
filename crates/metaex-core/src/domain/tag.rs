use serde::{Deserialize, Serialize};

/// Which dictionary a tag was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
  /// Tags attached to the whole file.
  Container,
  /// Tags attached to the selected audio stream (e.g. Vorbis comments inside Ogg).
  Stream,
}

/// A key/value pair exactly as the demuxer reported it.
///
/// Keys are compared case-insensitively by the normalizer but are kept verbatim here,
/// and duplicate keys are legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTagEntry {
  pub key: String,
  pub value: String,
}

impl RawTagEntry {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self { key: key.into(), value: value.into() }
  }

  /// `"key: value"`, the form extras are reported in.
  pub fn formatted(&self) -> String {
    format!("{}: {}", self.key, self.value)
  }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for RawTagEntry {
  fn from((key, value): (K, V)) -> Self {
    Self::new(key, value)
  }
}

/// The four tags that get their own field in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
  Title,
  Artist,
  Album,
  Genre,
}
