use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, AppMode};
use crate::constants::constants;
use crate::gallery::{CategoryFilter, SortMode};
use crate::graphics::{PreviewWidget, fit_to_cells};
use crate::modal::ModalPhase;
use crate::theme::Theme;

/// Rows below the preview reserved for the video details.
const MODAL_INFO_ROWS: u16 = 7;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// Where the modal goes: the whole screen on narrow terminals, otherwise a
/// centered box whose preview keeps a 16:9 picture (cells are twice as tall as wide).
pub fn modal_area(area: Rect, narrow_width: u16) -> Rect {
  if area.width < narrow_width {
    return area;
  }
  let width = (u32::from(area.width) * 7 / 10) as u16;
  let preview_rows = (u32::from(width) * 9 / 32) as u16;
  // Borders (2) + preview + details.
  let height = (preview_rows + MODAL_INFO_ROWS + 2).min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

fn rounded(theme: &Theme) -> Block<'static> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, tabs_area, main_area, status_area, search_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_tabs(frame, app, tabs_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_search(frame, app, search_area);
  render_footer(frame, app, footer_area);

  if app.modal_open() {
    render_modal(frame, app);
  }
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let c = constants();
  let left = Line::from(vec![
    Span::styled(
      format!(" ▶ {} ", c.portfolio_title.to_uppercase()),
      Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ),
    Span::styled(c.portfolio_tagline.as_str(), Style::default().fg(theme.muted)),
  ]);
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let counts = app.gallery.catalog().counts_by_category();
  let current = app.gallery.filter();

  let mut spans = vec![Span::raw(" ")];
  for filter in app.gallery.filters() {
    let count = match filter {
      CategoryFilter::All => app.gallery.catalog().len(),
      CategoryFilter::Only(category) => counts.get(&category).copied().unwrap_or(0),
    };
    let label = format!(" {} {} ", filter.label().to_uppercase(), count);
    let style = if filter == current {
      Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(theme.muted)
    };
    spans.push(Span::styled(label, style));
    spans.push(Span::raw(" "));
  }
  frame.render_widget(Line::from(spans), area);

  if app.gallery.sort() != SortMode::Catalog {
    let sort_label = format!("sorted: {} ", app.gallery.sort().label());
    let right = Line::from(Span::styled(&sort_label, Style::default().fg(theme.muted)));
    let right_area =
      Rect { x: area.x + area.width.saturating_sub(sort_label.len() as u16), width: sort_label.len() as u16, ..area };
    frame.render_widget(right, right_area);
  }
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  if area.width < constants().narrow_width || app.featured.is_empty() {
    render_grid(frame, app, area);
    return;
  }
  let [grid_area, featured_area] =
    Layout::horizontal([Constraint::Percentage(68), Constraint::Percentage(32)]).areas(area);
  render_grid(frame, app, grid_area);
  render_featured(frame, app, featured_area);
}

fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let block = rounded(theme)
    .title(" My Work ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

  if app.gallery.view().is_empty() {
    let text = if app.gallery.catalog().is_empty() { "The catalog is empty." } else { "No videos match." };
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, Style::default().fg(theme.muted)))])
      .alignment(Alignment::Center)
      .block(block);
    frame.render_widget(paragraph, area);
    return;
  }

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;
  let selected = app.gallery.list_state.selected();

  let items: Vec<ListItem> = app
    .gallery
    .view()
    .iter()
    .enumerate()
    .map(|(i, video)| {
      let is_selected = Some(i) == selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let right = format!("{}  {}", video.category.label(), video.year);
      let right_w = right.chars().count();
      let title = truncate_str(&video.title, inner_w.saturating_sub(right_w + 2));
      let gap = inner_w.saturating_sub(title.chars().count() + right_w);
      let line = Line::from(vec![
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.gallery.list_state);
}

fn render_featured(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let inner_w = area.width.saturating_sub(4) as usize;
  let mut lines = vec![Line::from("")];
  for video in &app.featured {
    lines.push(Line::from(Span::styled(
      truncate_str(&video.title, inner_w),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
      format!("{} · {}", video.category.label(), video.year),
      Style::default().fg(theme.muted),
    )));
    lines.push(Line::from(""));
  }
  let block = rounded(theme)
    .title(" Featured ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .padding(Padding::horizontal(1));
  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_modal(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  let area = modal_area(frame.area(), constants().narrow_width);
  let Some(item) = app.gallery.modal().selected().cloned() else { return };

  frame.render_widget(Clear, area);
  let block = rounded(theme)
    .border_style(Style::default().fg(theme.accent))
    .title(Line::from(vec![
      Span::styled(format!(" {} ", item.category.label().to_uppercase()), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
      Span::styled(format!(" {} ", item.year), Style::default().fg(theme.muted)),
    ]))
    .title_bottom(Line::from(Span::styled(" Esc close · o open source ", Style::default().fg(theme.muted))))
    .style(Style::default().bg(theme.overlay_bg));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let [preview_area, info_area] =
    Layout::vertical([Constraint::Min(1), Constraint::Length(MODAL_INFO_ROWS)]).areas(inner);

  match app.modal_phase() {
    ModalPhase::Loading => {
      let spinner = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("◌ Loading player…", Style::default().fg(theme.status))),
      ])
      .alignment(Alignment::Center);
      frame.render_widget(spinner, preview_area);
    }
    ModalPhase::Ready => render_preview(frame, app, item.id, preview_area),
    ModalPhase::Closed => {}
  }

  let embed = app.player.embed_url.clone().unwrap_or_default();
  let inner_w = info_area.width.saturating_sub(2) as usize;
  let info = Paragraph::new(vec![
    Line::from(Span::styled(
      truncate_str(&item.title, inner_w),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    Line::from(Span::styled(item.description.clone(), Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&embed, inner_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
  ])
  .wrap(Wrap { trim: true })
  .block(Block::default().padding(Padding::horizontal(1)));
  frame.render_widget(info, info_area);
}

fn render_preview(frame: &mut Frame, app: &mut App, item_id: u32, area: Rect) {
  let theme = app.theme();
  let Some((ref preview_id, ref image)) = app.player.preview else {
    let text = Paragraph::new(vec![
      Line::from(""),
      Line::from(Span::styled("Preview unavailable", Style::default().fg(theme.muted))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(text, area);
    return;
  };
  if *preview_id != item_id {
    return;
  }

  let needs_resize = match &app.preview_cache.resized {
    Some((id, w, h, _)) => *id != item_id || *w != area.width || *h != area.height,
    None => true,
  };
  if needs_resize {
    let resized = fit_to_cells(image, area.width, area.height, app.display_mode);
    app.preview_cache.resized = Some((item_id, area.width, area.height, resized));
  }
  if let Some((_, _, _, ref resized)) = app.preview_cache.resized {
    frame.render_widget(PreviewWidget { image: resized, display_mode: app.display_mode }, area);
  }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else {
    let shown = app.gallery.view().len();
    let total = app.gallery.catalog().len();
    (format!(" {} of {} videos", shown, total), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_search(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let active = app.mode == AppMode::Search && !app.modal_open();
  let border_color = if active { theme.accent } else { theme.border };
  let block = Block::bordered()
    .title(" Search title or description ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.gallery.search, app.search_cursor);

  if cursor_col < app.search_scroll {
    app.search_scroll = cursor_col;
  } else if cursor_col >= app.search_scroll + inner_w {
    app.search_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .gallery
    .search
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.search_scroll)
    .take_while(|(start, _, _)| *start < app.search_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  frame.render_widget(Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(block), area);

  if active {
    let cursor_x = area.x + 2 + (cursor_col - app.search_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = if app.modal_open() {
    vec![("Esc", "Close"), ("x", "Close"), ("o", "Open source")]
  } else {
    match app.mode {
      AppMode::Grid => vec![
        ("Enter", "Play"),
        ("j/k", "Navigate"),
        ("Tab", "Category"),
        ("/", "Search"),
        ("s", "Sort"),
        ("r", "Shuffle"),
        ("^t", "Theme"),
        ("q", "Quit"),
      ],
      AppMode::Search => vec![("Enter", "Done"), ("↑/↓", "Navigate"), ("Esc", "Clear")],
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();
  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} | {} ", app.display_mode.label(), theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app::AppOptions;
  use crate::catalog::tests::video;
  use crate::catalog::{Catalog, Category};
  use crate::config::Config;
  use crate::display::DisplayMode;
  use ratatui::{Terminal, backend::TestBackend};

  #[test]
  fn truncate_keeps_short_strings() {
    assert_eq!(truncate_str("abc", 5), "abc");
    assert_eq!(truncate_str("abcdef", 4), "abc…");
  }

  #[test]
  fn display_width_counts_wide_chars() {
    assert_eq!(display_width("日本", 2), 4);
    assert_eq!(display_width("ab", 1), 1);
  }

  #[test]
  fn narrow_modal_is_full_bleed() {
    let area = Rect::new(0, 0, 80, 30);
    assert_eq!(modal_area(area, 100), area);
  }

  #[test]
  fn wide_modal_keeps_aspect() {
    let area = Rect::new(0, 0, 160, 50);
    let m = modal_area(area, 100);
    assert_eq!(m.width, 112);
    // 112 * 9 / 32 = 31 preview rows + details + borders
    assert_eq!(m.height, 31 + MODAL_INFO_ROWS + 2);
    assert_eq!(m.x, 24);
  }

  #[test]
  fn wide_modal_clamped_to_screen_height() {
    let area = Rect::new(0, 0, 200, 20);
    assert_eq!(modal_area(area, 100).height, 20);
  }

  fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
  }

  #[tokio::test]
  async fn renders_grid_and_modal() {
    let catalog = Catalog::new(vec![
      video(1, "Cinematic Wedding Film", Category::Wedding, "2024"),
      video(2, "Corporate Promo", Category::Advertisement, "2022"),
    ])
    .unwrap();
    let options =
      AppOptions { display_mode: DisplayMode::Ascii, seed: Some(1), fetch_previews: false, persist_config: false };
    let mut app = App::new(catalog, Config::default(), options);
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

    terminal.draw(|frame| ui(frame, &mut app)).unwrap();
    let screen = screen_text(&terminal);
    assert!(screen.contains("Cinematic Wedding Film"));
    assert!(screen.contains("WEDDING 1"));

    app.open_selected();
    terminal.draw(|frame| ui(frame, &mut app)).unwrap();
    let screen = screen_text(&terminal);
    assert!(screen.contains("Loading player"));
  }
}
