//! The "currently open video" state machine.
//!
//! ```text
//!   Closed --open(item)--> Loading --ready(item.id)--> Ready
//!      ^                      |                          |
//!      +-------close / Esc----+--------------------------+
//! ```
//!
//! Ready signals carry the id of the item they were mounted for and the
//! generation of that mount. A signal for anything other than the current
//! mount is stale and ignored, including one left over from an earlier
//! mount of the same item.

use tracing::{debug, info};

use crate::catalog::VideoItem;
use crate::page::{Page, ScrollLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
  Closed,
  Loading,
  Ready,
}

/// Completion signal from the embedded player, tagged with the mount it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSignal {
  pub item_id: u32,
  /// Bumped on every open, so reopening an item never accepts the old mount's signal.
  pub generation: u64,
}

#[derive(Debug, Default)]
pub struct Modal {
  selected: Option<VideoItem>,
  embed_loading: bool,
  generation: u64,
  scroll_lock: Option<ScrollLock>,
}

impl Modal {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn phase(&self) -> ModalPhase {
    match (&self.selected, self.embed_loading) {
      (None, _) => ModalPhase::Closed,
      (Some(_), true) => ModalPhase::Loading,
      (Some(_), false) => ModalPhase::Ready,
    }
  }

  pub fn is_open(&self) -> bool {
    self.selected.is_some()
  }

  pub fn selected(&self) -> Option<&VideoItem> {
    self.selected.as_ref()
  }

  pub fn is_embed_loading(&self) -> bool {
    self.embed_loading
  }

  /// Open `item`, replacing any current selection. Returns the signal that
  /// will move this mount to `Ready`.
  pub fn open(&mut self, item: VideoItem, page: &Page) -> LoadSignal {
    self.generation += 1;
    let signal = LoadSignal { item_id: item.id, generation: self.generation };
    info!(id = item.id, generation = self.generation, title = %item.title, "modal: open");
    // Take the new lock before the old one drops so scrolling never resumes in between.
    let lock = page.lock_scroll();
    self.scroll_lock = Some(lock);
    self.selected = Some(item);
    self.embed_loading = true;
    signal
  }

  /// Apply a load-completion signal. Returns `true` if it moved the modal to `Ready`.
  pub fn ready(&mut self, signal: LoadSignal) -> bool {
    match (&self.selected, self.embed_loading) {
      (Some(item), true) if item.id == signal.item_id && self.generation == signal.generation => {
        debug!(id = signal.item_id, "modal: embed ready");
        self.embed_loading = false;
        true
      }
      _ => {
        debug!(
          id = signal.item_id,
          generation = signal.generation,
          phase = ?self.phase(),
          "modal: stale load signal ignored"
        );
        false
      }
    }
  }

  /// Close the modal. Returns `true` if it was open; closing twice is a no-op.
  pub fn close(&mut self) -> bool {
    let Some(item) = self.selected.take() else {
      return false;
    };
    info!(id = item.id, "modal: close");
    self.embed_loading = false;
    self.scroll_lock = None;
    true
  }
}
