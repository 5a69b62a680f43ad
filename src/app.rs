use image::DynamicImage;
use rand::{SeedableRng, rngs::StdRng};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::catalog::{Catalog, VideoItem};
use crate::config::Config;
use crate::constants::constants;
use crate::display::DisplayMode;
use crate::gallery::{CategoryFilter, Gallery, SortMode};
use crate::links::LinkTemplates;
use crate::modal::ModalPhase;
use crate::page::Page;
use crate::player::{self, EmbeddedPlayer};
use crate::theme::{self, THEMES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  /// Navigating the portfolio grid.
  Grid,
  /// Typing into the search box.
  Search,
}

/// Startup options that come from the command line rather than prefs.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
  pub display_mode: DisplayMode,
  /// Seed for the featured sample; `None` draws from entropy.
  pub seed: Option<u64>,
  pub fetch_previews: bool,
  /// Write preference changes back to `prefs.toml`.
  pub persist_config: bool,
}

/// Modal preview resized for the current area: (item id, cols, rows, image).
#[derive(Default)]
pub struct PreviewCache {
  pub resized: Option<(u32, u16, u16, DynamicImage)>,
}

pub struct App {
  pub gallery: Gallery,
  pub page: Page,
  pub player: EmbeddedPlayer,
  pub mode: AppMode,
  pub theme_index: usize,
  pub display_mode: DisplayMode,
  /// Random pick shown in the side panel.
  pub featured: Vec<VideoItem>,
  rng: StdRng,
  /// Cursor position within the search input (char index).
  pub search_cursor: usize,
  /// Horizontal scroll offset for the search input.
  pub search_scroll: usize,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub should_quit: bool,
  pub preview_cache: PreviewCache,
  config: Config,
  persist_config: bool,
  /// When the last error was set, for auto-dismiss.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(catalog: Catalog, config: Config, options: AppOptions) -> Self {
    let templates = LinkTemplates::with_overrides(config.embed_base.as_deref(), config.thumbnail_base.as_deref());
    let rng = match options.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };

    let page = Page::new();
    let mut gallery = Gallery::new(catalog);
    if let Some(ref mode) = config.sort_mode {
      gallery.set_sort(SortMode::from_config(mode));
    }
    if let Some(ref filter) = config.category_filter {
      let filter = CategoryFilter::from_config(filter);
      // A remembered category may be gone from a different catalog.
      if gallery.filters().contains(&filter) {
        gallery.set_filter(filter);
      }
    }
    gallery.mount(&page);

    let mut app = Self {
      gallery,
      page,
      player: EmbeddedPlayer::new(templates, options.fetch_previews),
      mode: AppMode::Grid,
      theme_index: theme::theme_index(config.theme_name.as_deref()),
      display_mode: options.display_mode,
      featured: Vec::new(),
      rng,
      search_cursor: 0,
      search_scroll: 0,
      last_error: None,
      status_message: None,
      should_quit: false,
      preview_cache: PreviewCache::default(),
      config,
      persist_config: options.persist_config,
      error_time: None,
    };
    app.reshuffle_featured();
    app
  }

  pub fn theme(&self) -> &'static theme::Theme {
    // Safety: theme_index is bounded by theme_index() on init and modular arithmetic in next_theme().
    &THEMES[self.theme_index]
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after `error_dismiss_secs`.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_dismiss_secs)
    {
      self.clear_error();
    }
  }

  fn save_config(&mut self) {
    self.config.theme_name = Some(self.theme().name.to_string());
    self.config.sort_mode = Some(self.gallery.sort().label().to_string());
    self.config.category_filter = Some(self.gallery.filter().label().to_string());
    if self.persist_config {
      self.config.save();
    }
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  pub fn cycle_sort(&mut self) {
    self.gallery.cycle_sort();
    info!(sort = self.gallery.sort().label(), "sort changed");
    self.save_config();
  }

  pub fn cycle_filter(&mut self, forward: bool) {
    self.gallery.cycle_filter(forward);
    self.save_config();
  }

  pub fn reshuffle_featured(&mut self) {
    self.featured = self.gallery.catalog().random_sample(constants().featured_count, &mut self.rng);
    let ids: Vec<u32> = self.featured.iter().map(|v| v.id).collect();
    debug!(ids = ?ids, "featured reshuffled");
  }

  // --- Modal ---

  pub fn modal_open(&self) -> bool {
    self.gallery.modal().is_open()
  }

  /// Open the grid item under the cursor and mount it in the embedded player.
  pub fn open_selected(&mut self) {
    let Some((item, signal)) = self.gallery.open_selected(&self.page) else { return };
    self.clear_error();
    self.preview_cache.resized = None;
    self.player.mount(&item, signal);
    self.status_message = Some(format!("Loading '{}'…", item.title));
  }

  /// Close button. Closing an already-closed modal does nothing.
  pub fn close_modal(&mut self) {
    if self.gallery.close() {
      self.after_close();
    }
  }

  pub fn escape_modal(&mut self) {
    if self.gallery.escape(&self.page) {
      self.after_close();
    }
  }

  fn after_close(&mut self) {
    self.player.teardown();
    self.preview_cache.resized = None;
    self.status_message = None;
  }

  /// Hand the open video's source link to the system browser.
  pub fn open_source_link(&mut self) {
    let Some(item) = self.gallery.modal().selected() else { return };
    let url = item.source_link.clone();
    if let Err(e) = player::open_in_browser(&url) {
      self.set_error(format!("Failed to open browser: {:#}", e));
    }
  }

  /// Apply load signals queued by the embedded player. Stale signals are dropped.
  pub fn check_pending(&mut self) {
    while let Some(event) = self.player.try_next_event() {
      let id = event.signal.item_id;
      if self.gallery.handle_load_signal(event.signal) {
        let has_preview = event.preview.is_some();
        self.player.accept(event);
        self.status_message = None;
        if !has_preview {
          info!(id = id, "embedded player ready without preview");
        }
      } else {
        debug!(id = id, "dropped stale player signal");
      }
    }
  }

  /// Release page resources before exit.
  pub fn shutdown(&mut self) {
    self.gallery.unmount();
    self.player.teardown();
    self.save_config();
  }

  pub fn modal_phase(&self) -> ModalPhase {
    self.gallery.modal_phase()
  }
}
