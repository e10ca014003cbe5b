use metaex_core::domain::CanonicalField;

/// Container tag keys that feed a canonical field, in check order.
///
/// Matching is ASCII case-insensitive. Aliases share their field's slot.
pub const CANONICAL_KEYS: &[(&str, CanonicalField)] = &[
  ("title", CanonicalField::Title),
  ("artist", CanonicalField::Artist),
  ("artists", CanonicalField::Artist),
  ("album", CanonicalField::Album),
  ("genre", CanonicalField::Genre),
];

pub fn canonical_field(key: &str) -> Option<CanonicalField> {
  CANONICAL_KEYS.iter().find(|(name, _)| name.eq_ignore_ascii_case(key)).map(|(_, field)| *field)
}
