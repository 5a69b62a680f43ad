//! Page-wide resources shared by every component on screen.
//!
//! Two resources live here: the background scroll lock and the Escape key
//! listeners. Both are handed out as guards that release on drop, so a
//! component that goes away without cleaning up cannot leave the page locked
//! or keep a listener alive.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct PageState {
  scroll_locks: usize,
  /// Owner name -> registration id. Re-installing under the same owner replaces the entry.
  escape_listeners: HashMap<&'static str, u64>,
  next_listener_id: u64,
}

/// Cheap, cloneable handle to the page resources.
#[derive(Debug, Clone, Default)]
pub struct Page {
  inner: Arc<StdMutex<PageState>>,
}

impl Page {
  pub fn new() -> Self {
    Self::default()
  }

  fn state(&self) -> MutexGuard<'_, PageState> {
    // A panic while holding the lock cannot leave the counters half-updated.
    self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  // --- Scroll lock ---

  /// Suspend background scrolling until the returned guard is dropped.
  pub fn lock_scroll(&self) -> ScrollLock {
    let mut state = self.state();
    state.scroll_locks += 1;
    debug!(locks = state.scroll_locks, "page: scroll locked");
    ScrollLock { page: self.clone() }
  }

  pub fn scroll_suspended(&self) -> bool {
    self.state().scroll_locks > 0
  }

  // --- Escape listeners ---

  pub fn install_escape_listener(&self, owner: &'static str) -> ListenerGuard {
    let mut state = self.state();
    let id = state.next_listener_id;
    state.next_listener_id += 1;
    if state.escape_listeners.insert(owner, id).is_some() {
      debug!(owner, "page: escape listener replaced");
    } else {
      debug!(owner, "page: escape listener installed");
    }
    ListenerGuard { page: self.clone(), owner, id }
  }

  pub fn escape_listener_installed(&self, owner: &str) -> bool {
    self.state().escape_listeners.contains_key(owner)
  }

  pub fn escape_listener_count(&self) -> usize {
    self.state().escape_listeners.len()
  }
}

/// Holds background scrolling suspended while alive.
#[derive(Debug)]
pub struct ScrollLock {
  page: Page,
}

impl Drop for ScrollLock {
  fn drop(&mut self) {
    let mut state = self.page.state();
    state.scroll_locks = state.scroll_locks.saturating_sub(1);
    debug!(locks = state.scroll_locks, "page: scroll lock released");
  }
}

/// Keeps an Escape listener registered while alive.
#[derive(Debug)]
pub struct ListenerGuard {
  page: Page,
  owner: &'static str,
  id: u64,
}

impl Drop for ListenerGuard {
  fn drop(&mut self) {
    let mut state = self.page.state();
    // Only remove our own registration; a newer install under the same owner stays.
    if state.escape_listeners.get(self.owner) == Some(&self.id) {
      state.escape_listeners.remove(self.owner);
      debug!(owner = self.owner, "page: escape listener removed");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scroll_lock_released_on_drop() {
    let page = Page::new();
    assert!(!page.scroll_suspended());
    let lock = page.lock_scroll();
    assert!(page.scroll_suspended());
    drop(lock);
    assert!(!page.scroll_suspended());
  }

  #[test]
  fn overlapping_scroll_locks() {
    let page = Page::new();
    let first = page.lock_scroll();
    let second = page.lock_scroll();
    drop(first);
    assert!(page.scroll_suspended());
    drop(second);
    assert!(!page.scroll_suspended());
  }

  #[test]
  fn listener_removed_on_drop() {
    let page = Page::new();
    let guard = page.install_escape_listener("gallery");
    assert!(page.escape_listener_installed("gallery"));
    drop(guard);
    assert!(!page.escape_listener_installed("gallery"));
    assert_eq!(page.escape_listener_count(), 0);
  }

  #[test]
  fn reinstall_replaces_and_stale_guard_keeps_new_listener() {
    let page = Page::new();
    let old = page.install_escape_listener("gallery");
    let new = page.install_escape_listener("gallery");
    assert_eq!(page.escape_listener_count(), 1);
    drop(old);
    assert!(page.escape_listener_installed("gallery"));
    drop(new);
    assert!(!page.escape_listener_installed("gallery"));
  }

  #[test]
  fn repeated_cycles_do_not_leak() {
    let page = Page::new();
    for _ in 0..10 {
      let _listener = page.install_escape_listener("gallery");
      let _lock = page.lock_scroll();
    }
    assert_eq!(page.escape_listener_count(), 0);
    assert!(!page.scroll_suspended());
  }
}
