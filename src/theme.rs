use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  pub overlay_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "Coral",
    bg: Color::Rgb(5, 5, 8),
    fg: Color::Rgb(230, 230, 235),
    accent: Color::Rgb(255, 99, 74),
    muted: Color::Rgb(128, 128, 140),
    border: Color::Rgb(60, 60, 72),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(255, 99, 74),
    stripe_bg: Color::Rgb(12, 12, 20),
    status: Color::Rgb(255, 122, 92),
    error: Color::Rgb(255, 80, 80),
    key_fg: Color::Rgb(5, 5, 8),
    key_bg: Color::Rgb(255, 99, 74),
    overlay_bg: Color::Rgb(0, 0, 0),
  },
  Theme {
    name: "Paper",
    bg: Color::Rgb(250, 250, 250),
    fg: Color::Rgb(20, 20, 24),
    accent: Color::Rgb(214, 72, 50),
    muted: Color::Rgb(110, 110, 118),
    border: Color::Rgb(200, 200, 205),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(214, 72, 50),
    stripe_bg: Color::Rgb(240, 240, 242),
    status: Color::Rgb(180, 60, 40),
    error: Color::Rgb(200, 30, 30),
    key_fg: Color::Rgb(255, 255, 255),
    key_bg: Color::Rgb(20, 20, 24),
    overlay_bg: Color::Rgb(255, 255, 255),
  },
  Theme {
    name: "Terminal",
    bg: Color::Reset,
    fg: Color::Reset,
    accent: Color::LightRed,
    muted: Color::DarkGray,
    border: Color::Gray,
    highlight_fg: Color::Black,
    highlight_bg: Color::LightRed,
    stripe_bg: Color::Reset,
    status: Color::Yellow,
    error: Color::Red,
    key_fg: Color::Black,
    key_bg: Color::Gray,
    overlay_bg: Color::Reset,
  },
];

/// Index of the theme called `name`, falling back to the first one.
pub fn theme_index(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name.eq_ignore_ascii_case(n))).unwrap_or(0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn theme_lookup_by_name() {
    assert_eq!(theme_index(Some("paper")), 1);
    assert_eq!(theme_index(Some("missing")), 0);
    assert_eq!(theme_index(None), 0);
  }
}
