//! Derivation of playback and preview URLs from a video's source link.
//!
//! Source links look like `https://drive.google.com/file/d/<ID>/view?usp=sharing`.
//! The `<ID>` segment is substituted into fixed templates:
//!
//! - embed:     `<embed-base>/<ID>/preview`
//! - thumbnail: `<thumb-base>?id=<ID>&sz=<size>`
//!
//! Links without a `/d/<ID>` segment are returned unchanged.

use crate::constants::constants;

const ID_MARKER: &str = "/d/";

/// Base URLs the file identifier is substituted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplates {
  pub embed_base: String,
  pub thumbnail_base: String,
  pub thumbnail_size: String,
}

impl Default for LinkTemplates {
  fn default() -> Self {
    let c = constants();
    Self {
      embed_base: c.embed_base.clone(),
      thumbnail_base: c.thumbnail_base.clone(),
      thumbnail_size: c.thumbnail_size.clone(),
    }
  }
}

impl LinkTemplates {
  /// Defaults with optional base overrides (from user config).
  pub fn with_overrides(embed_base: Option<&str>, thumbnail_base: Option<&str>) -> Self {
    let mut templates = Self::default();
    if let Some(base) = embed_base {
      templates.embed_base = base.trim_end_matches('/').to_string();
    }
    if let Some(base) = thumbnail_base {
      templates.thumbnail_base = base.to_string();
    }
    templates
  }

  pub fn embed_link(&self, source_link: &str) -> String {
    match extract_file_id(source_link) {
      Some(id) => format!("{}/{}/preview", self.embed_base, id),
      None => source_link.to_string(),
    }
  }

  pub fn thumbnail(&self, source_link: &str) -> String {
    match extract_file_id(source_link) {
      Some(id) => format!("{}?id={}&sz={}", self.thumbnail_base, id, self.thumbnail_size),
      None => source_link.to_string(),
    }
  }
}

/// Extract the opaque file identifier following the first `/d/` marker that
/// is followed by at least one non-`/` character.
pub fn extract_file_id(source_link: &str) -> Option<&str> {
  source_link.match_indices(ID_MARKER).find_map(|(idx, _)| {
    let rest = &source_link[idx + ID_MARKER.len()..];
    let end = rest.find('/').unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
  })
}

/// Embed link using the built-in templates.
pub fn derive_embed_link(source_link: &str) -> String {
  LinkTemplates::default().embed_link(source_link)
}

/// Thumbnail link using the built-in templates.
pub fn derive_thumbnail(source_link: &str) -> String {
  LinkTemplates::default().thumbnail(source_link)
}
