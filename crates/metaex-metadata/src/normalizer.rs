use metaex_core::domain::{CanonicalFields, RawTagEntry, Scope};
use tracing::trace;

use crate::tag_keys::canonical_field;

/// Folds tag dictionaries into canonical fields plus an ordered list of extras.
///
/// Only container tags are classified. Stream tags always land in the extras, after
/// whatever the container contributed, and never override container metadata.
#[derive(Debug, Default)]
pub struct TagNormalizer {
  fields: CanonicalFields,
  extras: Vec<String>,
}

impl TagNormalizer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn ingest<I>(&mut self, scope: Scope, entries: I)
  where
    I: IntoIterator<Item = RawTagEntry>,
  {
    for entry in entries {
      let field = match scope {
        Scope::Container => canonical_field(&entry.key),
        Scope::Stream => None,
      };

      match field {
        Some(field) => {
          if !self.fields.fill(field, entry.value) {
            trace!(key = %entry.key, "canonical field already set, ignoring");
          }
        }
        None => self.extras.push(entry.formatted()),
      }
    }
  }

  pub fn fields(&self) -> &CanonicalFields {
    &self.fields
  }

  pub fn extras(&self) -> &[String] {
    &self.extras
  }

  pub fn finish(self) -> (CanonicalFields, Vec<String>) {
    (self.fields, self.extras)
  }
}
