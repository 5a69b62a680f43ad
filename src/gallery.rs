use ratatui::widgets::ListState;
use tracing::{debug, info};

use crate::catalog::{Catalog, Category, VideoItem};
use crate::modal::{LoadSignal, Modal, ModalPhase};
use crate::page::{ListenerGuard, Page};
use crate::query::{self, SortOrder};

/// Category selector above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(Category),
}

impl CategoryFilter {
  pub fn label(self) -> &'static str {
    match self {
      CategoryFilter::All => "All",
      CategoryFilter::Only(c) => c.label(),
    }
  }

  pub fn from_config(s: &str) -> Self {
    s.parse::<Category>().map_or(CategoryFilter::All, CategoryFilter::Only)
  }
}

/// Optional year ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
  /// Catalog (authoring) order.
  #[default]
  Catalog,
  Newest,
  Oldest,
}

impl SortMode {
  pub const ALL: [SortMode; 3] = [SortMode::Catalog, SortMode::Newest, SortMode::Oldest];

  pub fn label(self) -> &'static str {
    match self {
      SortMode::Catalog => "catalog",
      SortMode::Newest => "newest",
      SortMode::Oldest => "oldest",
    }
  }

  pub fn from_config(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "newest" => SortMode::Newest,
      "oldest" => SortMode::Oldest,
      _ => SortMode::Catalog,
    }
  }

  fn order(self) -> Option<SortOrder> {
    match self {
      SortMode::Catalog => None,
      SortMode::Newest => Some(SortOrder::Desc),
      SortMode::Oldest => Some(SortOrder::Asc),
    }
  }
}

/// The filterable portfolio grid plus the modal for inspecting one item.
pub struct Gallery {
  catalog: Catalog,
  filter: CategoryFilter,
  /// Search text narrowing the grid by title/description.
  pub search: String,
  sort: SortMode,
  /// Videos currently shown, recomputed whenever filter/search/sort change.
  view: Vec<VideoItem>,
  pub list_state: ListState,
  modal: Modal,
  escape_listener: Option<ListenerGuard>,
}

impl Gallery {
  /// Owner name of the gallery's Escape listener.
  pub const LISTENER: &'static str = "gallery";

  pub fn new(catalog: Catalog) -> Self {
    let mut gallery = Self {
      catalog,
      filter: CategoryFilter::All,
      search: String::new(),
      sort: SortMode::Catalog,
      view: Vec::new(),
      list_state: ListState::default(),
      modal: Modal::new(),
      escape_listener: None,
    };
    gallery.recompute_view();
    gallery
  }

  // --- Lifetime ---

  /// Install the Escape listener. Mounting twice replaces the registration.
  pub fn mount(&mut self, page: &Page) {
    self.escape_listener = Some(page.install_escape_listener(Self::LISTENER));
  }

  /// Close any open modal and remove the Escape listener.
  pub fn unmount(&mut self) {
    self.modal.close();
    self.escape_listener = None;
  }

  pub fn is_mounted(&self) -> bool {
    self.escape_listener.is_some()
  }

  // --- Accessors ---

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn filter(&self) -> CategoryFilter {
    self.filter
  }

  pub fn sort(&self) -> SortMode {
    self.sort
  }

  pub fn view(&self) -> &[VideoItem] {
    &self.view
  }

  pub fn modal(&self) -> &Modal {
    &self.modal
  }

  pub fn modal_phase(&self) -> ModalPhase {
    self.modal.phase()
  }

  pub fn selected_in_grid(&self) -> Option<&VideoItem> {
    self.list_state.selected().and_then(|i| self.view.get(i))
  }

  /// Filters offered above the grid: `All`, then the categories present in the catalog.
  pub fn filters(&self) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::All)
      .chain(self.catalog.categories().into_iter().map(CategoryFilter::Only))
      .collect()
  }

  // --- View ---

  /// Rebuild the displayed set: category view, then search, then optional year sort.
  /// Clamps the grid selection to the new range.
  pub fn recompute_view(&mut self) {
    let base = match self.filter {
      CategoryFilter::All => self.catalog.all_videos().to_vec(),
      CategoryFilter::Only(category) => self.catalog.videos_by_category(category),
    };
    let searched = if self.search.is_empty() { base } else { query::search(&base, &self.search) };
    self.view = match self.sort.order() {
      Some(order) => query::sort_by_year(&searched, order),
      None => searched,
    };

    if self.view.is_empty() {
      self.list_state.select(None);
    } else {
      let sel = self.list_state.selected().unwrap_or(0);
      self.list_state.select(Some(sel.min(self.view.len() - 1)));
    }
  }

  pub fn set_filter(&mut self, filter: CategoryFilter) {
    if self.filter != filter {
      debug!(filter = filter.label(), "gallery: filter changed");
      self.filter = filter;
      self.list_state.select(Some(0));
      self.recompute_view();
    }
  }

  /// Step through `filters()`; `forward == false` walks backwards.
  pub fn cycle_filter(&mut self, forward: bool) {
    let filters = self.filters();
    let idx = filters.iter().position(|f| *f == self.filter).unwrap_or(0);
    let next = if forward { (idx + 1) % filters.len() } else { (idx + filters.len() - 1) % filters.len() };
    self.set_filter(filters[next]);
  }

  pub fn set_search(&mut self, search: &str) {
    self.search = search.to_string();
    self.recompute_view();
  }

  pub fn set_sort(&mut self, sort: SortMode) {
    self.sort = sort;
    self.recompute_view();
  }

  pub fn cycle_sort(&mut self) {
    let idx = SortMode::ALL.iter().position(|m| *m == self.sort).unwrap_or(0);
    self.set_sort(SortMode::ALL[(idx + 1) % SortMode::ALL.len()]);
  }

  // --- Grid navigation ---

  /// Move the grid selection, wrapping at both ends. Ignored while the page scroll is locked.
  pub fn move_selection(&mut self, page: &Page, delta: isize) {
    let count = self.view.len();
    if count == 0 || page.scroll_suspended() {
      return;
    }
    let current = self.list_state.selected().unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(count as isize) as usize;
    self.list_state.select(Some(next));
  }

  // --- Modal ---

  /// Open the video under the grid cursor. Returns the opened item and the
  /// signal its player must send back.
  pub fn open_selected(&mut self, page: &Page) -> Option<(VideoItem, LoadSignal)> {
    let item = self.selected_in_grid()?.clone();
    let signal = self.open(item.clone(), page);
    Some((item, signal))
  }

  pub fn open(&mut self, item: VideoItem, page: &Page) -> LoadSignal {
    self.modal.open(item, page)
  }

  pub fn handle_load_signal(&mut self, signal: LoadSignal) -> bool {
    self.modal.ready(signal)
  }

  /// Close button. Idempotent.
  pub fn close(&mut self) -> bool {
    self.modal.close()
  }

  /// Escape key. Only acts while the gallery's listener is installed.
  pub fn escape(&mut self, page: &Page) -> bool {
    if !page.escape_listener_installed(Self::LISTENER) || !self.is_mounted() {
      return false;
    }
    let closed = self.modal.close();
    if closed {
      info!("gallery: modal dismissed with Escape");
    }
    closed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::tests::video;

  fn gallery() -> Gallery {
    let catalog = Catalog::new(vec![
      video(1, "Cinematic Wedding Film", Category::Wedding, "2024"),
      video(2, "Corporate Promo", Category::Advertisement, "2022"),
      video(3, "Travel Vlog", Category::Blog, "2023"),
      video(4, "Vows at Dawn", Category::Wedding, "2021"),
    ])
    .unwrap();
    Gallery::new(catalog)
  }

  fn view_ids(g: &Gallery) -> Vec<u32> {
    g.view().iter().map(|v| v.id).collect()
  }

  // --- view ---

  #[test]
  fn all_filter_shows_catalog_order() {
    let g = gallery();
    assert_eq!(view_ids(&g), vec![1, 2, 3, 4]);
    assert_eq!(g.list_state.selected(), Some(0));
  }

  #[test]
  fn category_filter_matches_query() {
    let mut g = gallery();
    g.set_filter(CategoryFilter::Only(Category::Wedding));
    assert_eq!(g.view(), g.catalog().videos_by_category(Category::Wedding).as_slice());
    assert_eq!(view_ids(&g), vec![1, 4]);
  }

  #[test]
  fn filters_list_present_categories() {
    let g = gallery();
    assert_eq!(
      g.filters(),
      vec![
        CategoryFilter::All,
        CategoryFilter::Only(Category::Wedding),
        CategoryFilter::Only(Category::Advertisement),
        CategoryFilter::Only(Category::Blog),
      ]
    );
  }

  #[test]
  fn cycle_filter_wraps_both_ways() {
    let mut g = gallery();
    g.cycle_filter(false);
    assert_eq!(g.filter(), CategoryFilter::Only(Category::Blog));
    g.cycle_filter(true);
    assert_eq!(g.filter(), CategoryFilter::All);
    g.cycle_filter(true);
    assert_eq!(g.filter(), CategoryFilter::Only(Category::Wedding));
  }

  #[test]
  fn search_and_sort_compose_with_filter() {
    let mut g = gallery();
    g.set_filter(CategoryFilter::Only(Category::Wedding));
    g.set_sort(SortMode::Oldest);
    assert_eq!(view_ids(&g), vec![4, 1]);
    g.set_search("DAWN");
    assert_eq!(view_ids(&g), vec![4]);
    g.set_search("");
    g.set_sort(SortMode::Catalog);
    assert_eq!(view_ids(&g), vec![1, 4]);
  }

  #[test]
  fn empty_view_clears_selection() {
    let mut g = gallery();
    g.set_search("nothing matches this");
    assert!(g.view().is_empty());
    assert_eq!(g.list_state.selected(), None);
    assert!(g.open_selected(&Page::new()).is_none());
  }

  #[test]
  fn selection_clamped_when_view_shrinks() {
    let mut g = gallery();
    g.list_state.select(Some(3));
    g.set_search("o");
    assert!(g.list_state.selected().unwrap() < g.view().len());
  }

  #[test]
  fn sort_mode_from_config() {
    assert_eq!(SortMode::from_config("Newest"), SortMode::Newest);
    assert_eq!(SortMode::from_config("oldest"), SortMode::Oldest);
    assert_eq!(SortMode::from_config("whatever"), SortMode::Catalog);
  }

  #[test]
  fn category_filter_from_config() {
    assert_eq!(CategoryFilter::from_config("Short Film"), CategoryFilter::Only(Category::ShortFilm));
    assert_eq!(CategoryFilter::from_config("All"), CategoryFilter::All);
  }

  // --- navigation ---

  #[test]
  fn move_selection_wraps() {
    let page = Page::new();
    let mut g = gallery();
    g.move_selection(&page, -1);
    assert_eq!(g.list_state.selected(), Some(3));
    g.move_selection(&page, 1);
    assert_eq!(g.list_state.selected(), Some(0));
  }

  #[test]
  fn scroll_lock_freezes_grid() {
    let page = Page::new();
    let mut g = gallery();
    g.mount(&page);
    g.open_selected(&page);
    g.move_selection(&page, 1);
    assert_eq!(g.list_state.selected(), Some(0));
    g.close();
    g.move_selection(&page, 1);
    assert_eq!(g.list_state.selected(), Some(1));
  }

  // --- modal lifecycle ---

  #[test]
  fn open_escape_releases_scroll() {
    let page = Page::new();
    let mut g = gallery();
    g.mount(&page);
    g.list_state.select(Some(2));
    let opened = g.open_selected(&page).map(|(v, _)| v.id);
    assert_eq!(opened, Some(3));
    assert_eq!(g.modal_phase(), ModalPhase::Loading);
    assert!(page.scroll_suspended());

    assert!(g.escape(&page));
    assert_eq!(g.modal_phase(), ModalPhase::Closed);
    assert!(g.modal().selected().is_none());
    assert!(!page.scroll_suspended());
  }

  #[test]
  fn stale_signal_after_switching_items() {
    let page = Page::new();
    let mut g = gallery();
    g.mount(&page);
    let (_, first) = g.open_selected(&page).unwrap();
    g.list_state.select(Some(2));
    let (_, third) = g.open_selected(&page).unwrap();
    assert_eq!(third.item_id, 3);

    assert!(!g.handle_load_signal(first));
    assert_eq!(g.modal_phase(), ModalPhase::Loading);
    assert!(g.handle_load_signal(third));
    assert_eq!(g.modal_phase(), ModalPhase::Ready);
    assert!(!g.handle_load_signal(first));
    assert_eq!(g.modal().selected().map(|v| v.id), Some(3));
  }

  #[test]
  fn escape_ignored_when_unmounted() {
    let page = Page::new();
    let mut g = gallery();
    g.open_selected(&page);
    assert!(!g.escape(&page));
    assert_eq!(g.modal_phase(), ModalPhase::Loading);
    g.close();
  }

  #[test]
  fn escape_and_close_are_idempotent() {
    let page = Page::new();
    let mut g = gallery();
    g.mount(&page);
    assert!(!g.escape(&page));
    assert!(!g.close());
    g.open_selected(&page);
    assert!(g.close());
    assert!(!g.close());
    assert!(!g.escape(&page));
    assert_eq!(g.modal_phase(), ModalPhase::Closed);
  }

  #[test]
  fn unmount_removes_listener_and_closes() {
    let page = Page::new();
    let mut g = gallery();
    g.mount(&page);
    g.mount(&page);
    assert_eq!(page.escape_listener_count(), 1);
    g.open_selected(&page);
    g.unmount();
    assert_eq!(page.escape_listener_count(), 0);
    assert!(!page.scroll_suspended());
    assert_eq!(g.modal_phase(), ModalPhase::Closed);
  }

  #[test]
  fn dropping_gallery_releases_page_resources() {
    let page = Page::new();
    let mut g = gallery();
    g.mount(&page);
    g.open_selected(&page);
    drop(g);
    assert_eq!(page.escape_listener_count(), 0);
    assert!(!page.scroll_suspended());
  }
}
