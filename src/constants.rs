//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available;
//! parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub portfolio_title: String,
  pub portfolio_tagline: String,

  // Embedded player links
  pub embed_base: String,
  pub thumbnail_base: String,
  pub thumbnail_size: String,

  // Gallery
  pub featured_count: usize,
  /// Terminals narrower than this get a full-bleed modal instead of a 16:9 box.
  pub narrow_width: u16,

  // Event loop
  pub poll_interval_ms: u64,
  pub error_dismiss_secs: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; a malformed file fails the first test run.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
