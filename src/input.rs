use anyhow::Result;
use ratatui::crossterm::event::{self, KeyCode, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, AppMode};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) -> Result<()> {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return Ok(());
  }

  // The open modal owns the keyboard.
  if app.modal_open() {
    handle_modal_key(app, key);
    return Ok(());
  }

  match app.mode {
    AppMode::Grid => handle_grid_key(app, key),
    AppMode::Search => handle_search_key(app, key),
  }
  Ok(())
}

fn handle_modal_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Esc => {
      app.escape_modal();
    }
    KeyCode::Char('x') | KeyCode::Char('q') | KeyCode::Backspace => {
      app.close_modal();
    }
    KeyCode::Char('o') => {
      app.open_source_link();
    }
    _ => {}
  }
}

fn handle_grid_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.open_selected();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.gallery.move_selection(&app.page, 1);
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.gallery.move_selection(&app.page, -1);
    }
    KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
      app.cycle_filter(true);
    }
    KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
      app.cycle_filter(false);
    }
    KeyCode::Char('/') => {
      app.search_cursor = app.gallery.search.chars().count();
      app.mode = AppMode::Search;
    }
    KeyCode::Char('s') => {
      app.cycle_sort();
    }
    KeyCode::Char('r') => {
      app.reshuffle_featured();
    }
    KeyCode::Char('q') => {
      app.should_quit = true;
    }
    KeyCode::Esc => {
      if !app.gallery.search.is_empty() {
        clear_search(app);
      } else {
        app.should_quit = true;
      }
    }
    _ => {}
  }
}

fn handle_search_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.gallery.search, app.search_cursor);
      app.gallery.search.insert(byte_idx, c);
      app.search_cursor += 1;
      app.gallery.recompute_view();
    }
    KeyCode::Backspace => {
      if app.search_cursor > 0 {
        app.search_cursor -= 1;
        let byte_idx = char_to_byte_index(&app.gallery.search, app.search_cursor);
        app.gallery.search.remove(byte_idx);
        app.gallery.recompute_view();
      }
    }
    KeyCode::Delete => {
      if app.search_cursor < app.gallery.search.chars().count() {
        let byte_idx = char_to_byte_index(&app.gallery.search, app.search_cursor);
        app.gallery.search.remove(byte_idx);
        app.gallery.recompute_view();
      }
    }
    KeyCode::Left => {
      app.search_cursor = app.search_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.search_cursor < app.gallery.search.chars().count() {
        app.search_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.search_cursor = 0;
    }
    KeyCode::End => {
      app.search_cursor = app.gallery.search.chars().count();
    }
    KeyCode::Down => {
      app.gallery.move_selection(&app.page, 1);
    }
    KeyCode::Up => {
      app.gallery.move_selection(&app.page, -1);
    }
    KeyCode::Enter => {
      // Keep the query and go back to the grid
      app.mode = AppMode::Grid;
    }
    KeyCode::Esc => {
      clear_search(app);
      app.mode = AppMode::Grid;
    }
    _ => {}
  }
}

fn clear_search(app: &mut App) {
  app.gallery.set_search("");
  app.search_cursor = 0;
  app.search_scroll = 0;
}

/// Wheel scrolling moves the grid unless the page scroll is locked.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
  match mouse.kind {
    MouseEventKind::ScrollDown => app.gallery.move_selection(&app.page, 1),
    MouseEventKind::ScrollUp => app.gallery.move_selection(&app.page, -1),
    _ => {}
  }
}
